use std::io::Write;
use std::sync::Arc;

use gwaei_config::Preferences;
use gwaei_core::{
    Dictionary, EngineKind, OutputTarget, Relevance, ResultRecord, ResultSink, SearchStatus,
};
use gwaei_search::{Query, SearchSession, SessionState, StepOutcome};

/// Sink that records everything the driver reports, in order.
#[derive(Default)]
struct RecordingSink {
    started: usize,
    finished: Vec<SearchStatus>,
    results: Vec<(ResultRecord, Relevance, bool)>,
    progress: Vec<(usize, usize)>,
    no_results: usize,
    more_header: Option<usize>,
    less_header: Option<usize>,
    errors: Vec<String>,
}

impl ResultSink for RecordingSink {
    fn search_started(&mut self) {
        self.started += 1;
    }

    fn progress(&mut self, current_line: usize, total_lines: usize) {
        self.progress.push((current_line, total_lines));
    }

    fn more_relevant_header(&mut self, count: usize) {
        self.more_header = Some(count);
    }

    fn less_relevant_header(&mut self, count: usize) {
        self.less_header = Some(count);
    }

    fn result(&mut self, record: &ResultRecord, relevance: Relevance, duplicate: bool) {
        self.results.push((record.clone(), relevance, duplicate));
    }

    fn no_results(&mut self) {
        self.no_results += 1;
    }

    fn search_finished(&mut self, status: SearchStatus) {
        self.finished.push(status);
    }

    fn collaborator_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}

fn write_dictionary(lines: &[&str]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file.flush().unwrap();
    file
}

fn dictionary(file: &tempfile::NamedTempFile, kind: EngineKind) -> Arc<Dictionary> {
    Arc::new(Dictionary::new("test", kind, file.path(), 0).unwrap())
}

fn session_for(
    file: &tempfile::NamedTempFile,
    kind: EngineKind,
    raw: &str,
    prefs: Preferences,
) -> SearchSession {
    let dict = dictionary(file, kind);
    let query = Query::build(raw, kind, &prefs, false).unwrap();
    SearchSession::new(dict, query, OutputTarget::Console, prefs)
}

const EDICT_LINES: &[&str] = &[
    "# EDICT sample header",
    "English /(n) a language/",
    "英会話 [えいかいわ] /(n) English conversation/",
    "国語 [こくご] /(n) national language/",
    "犬 [いぬ] /(n) dog/",
];

#[test]
fn edict_scenario_single_high_result() {
    let file = write_dictionary(&["English /(n) a language/"]);
    let mut session = session_for(&file, EngineKind::Edict, "English", Preferences::new());
    let mut sink = RecordingSink::default();

    session.start(&mut sink).unwrap();
    let status = session.run_to_completion(&mut sink);

    assert_eq!(status, SearchStatus::Completed);
    assert_eq!(sink.results.len(), 1);
    let (record, relevance, duplicate) = &sink.results[0];
    assert_eq!(*relevance, Relevance::High);
    assert!(!duplicate);
    match record {
        ResultRecord::Edict(r) => {
            assert_eq!(r.headword, "English");
            assert_eq!(r.definitions, vec!["(n) a language"]);
        }
        other => panic!("expected an EDICT record, got {:?}", other),
    }
    assert_eq!(session.total_results(), 1);
    assert_eq!(session.relevant_count(), 1);
    assert_eq!(session.state(), SessionState::Idle);
}

#[test]
fn rechunking_does_not_change_output() {
    let run = |chunk_size: usize| -> (Vec<(ResultRecord, Relevance, bool)>, usize, usize) {
        let file = write_dictionary(EDICT_LINES);
        let mut prefs = Preferences::new();
        prefs.chunk_size = chunk_size;
        let mut session = session_for(&file, EngineKind::Edict, "language", prefs);
        let mut sink = RecordingSink::default();
        session.start(&mut sink).unwrap();
        session.run_to_completion(&mut sink);
        (
            sink.results,
            session.total_results(),
            session.irrelevant_count(),
        )
    };

    let (one_by_one, total_a, irrelevant_a) = run(1);
    let (all_at_once, total_b, irrelevant_b) = run(100_000);

    assert_eq!(total_a, total_b);
    assert_eq!(irrelevant_a, irrelevant_b);
    assert_eq!(one_by_one.len(), all_at_once.len());
    for (a, b) in one_by_one.iter().zip(all_at_once.iter()) {
        assert_eq!(a, b);
    }
}

#[test]
fn comment_lines_are_never_results() {
    let file = write_dictionary(&["# English appears here too", "English /(n) a language/"]);
    let mut session = session_for(&file, EngineKind::Edict, "English", Preferences::new());
    let mut sink = RecordingSink::default();
    session.start(&mut sink).unwrap();
    session.run_to_completion(&mut sink);
    assert_eq!(sink.results.len(), 1);
}

#[test]
fn medium_and_low_results_are_drained_after_high() {
    let file = write_dictionary(&[
        "cat /(n) a cat/",
        "猫車 [ねこぐるま] /(n) wheelbarrow shaped like a cat basket/",
        "分類 [ぶんるい] /(n) categorization/",
    ]);
    let mut session = session_for(&file, EngineKind::Edict, "cat", Preferences::new());
    let mut sink = RecordingSink::default();
    session.start(&mut sink).unwrap();
    session.run_to_completion(&mut sink);

    let tiers: Vec<Relevance> = sink.results.iter().map(|(_, tier, _)| *tier).collect();
    assert_eq!(
        tiers,
        vec![Relevance::High, Relevance::Medium, Relevance::Low]
    );
    assert_eq!(sink.more_header, Some(1));
    assert_eq!(sink.less_header, Some(2));
    assert_eq!(session.total_results(), 3);
    assert_eq!(session.relevant_count(), 1);
    assert_eq!(session.irrelevant_count(), 2);
}

#[test]
fn exact_mode_suppresses_the_drain() {
    let file = write_dictionary(&[
        "cat /(n) a cat/",
        "分類 [ぶんるい] /(n) categorization/",
    ]);
    let mut prefs = Preferences::new();
    prefs.show_less_relevant = false;
    let mut session = session_for(&file, EngineKind::Edict, "cat", prefs);
    let mut sink = RecordingSink::default();
    session.start(&mut sink).unwrap();
    session.run_to_completion(&mut sink);

    assert_eq!(sink.results.len(), 1);
    assert_eq!(sink.results[0].1, Relevance::High);
    assert_eq!(sink.less_header, None);
}

#[test]
fn low_queue_cap_bounds_emission() {
    let mut lines: Vec<String> = Vec::new();
    for i in 0..60 {
        // "cat" only as a substring: low relevance
        lines.push(format!("語{} [ご] /(n) categorization {}x/", i, i));
    }
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    let file = write_dictionary(&refs);

    let mut prefs = Preferences::new();
    prefs.max_low_results = 50;
    let mut session = session_for(&file, EngineKind::Edict, "cat", prefs);
    let mut sink = RecordingSink::default();
    session.start(&mut sink).unwrap();
    session.run_to_completion(&mut sink);

    assert_eq!(sink.results.len(), 50);
    assert_eq!(session.irrelevant_count(), 50);
    assert_eq!(session.total_results(), 50);
}

#[test]
fn cancellation_stops_before_the_next_line() {
    let mut lines: Vec<String> = Vec::new();
    for i in 0..50 {
        lines.push(format!("dog /(n) dog variant {}/", i));
    }
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    let file = write_dictionary(&refs);

    let mut prefs = Preferences::new();
    prefs.chunk_size = 10;
    let mut session = session_for(&file, EngineKind::Edict, "dog", prefs);
    let mut sink = RecordingSink::default();
    session.start(&mut sink).unwrap();

    assert_eq!(session.step(&mut sink), StepOutcome::MoreWork);
    let emitted_before_cancel = sink.results.len();
    session.cancel();
    let outcome = session.step(&mut sink);

    assert_eq!(outcome, StepOutcome::Finished(SearchStatus::Canceled));
    // Nothing may be emitted after the flag is observed
    assert_eq!(sink.results.len(), emitted_before_cancel);
    assert_eq!(sink.finished, vec![SearchStatus::Canceled]);
    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(sink.no_results, 0);
}

#[test]
fn no_results_is_signaled_for_console_target() {
    let file = write_dictionary(&["犬 [いぬ] /(n) dog/"]);
    let mut session = session_for(&file, EngineKind::Edict, "zebra", Preferences::new());
    let mut sink = RecordingSink::default();
    session.start(&mut sink).unwrap();
    let status = session.run_to_completion(&mut sink);

    assert_eq!(status, SearchStatus::Completed);
    assert_eq!(sink.no_results, 1);
    assert!(sink.results.is_empty());
}

#[test]
fn no_results_is_not_signaled_for_kanji_sidebar() {
    let file = write_dictionary(&["語 B149 S14 G2 ゴ {word}"]);
    let kind = EngineKind::Kanjidict;
    let dict = dictionary(&file, kind);
    let prefs = Preferences::new();
    let query = Query::build("水", kind, &prefs, false).unwrap();
    let mut session = SearchSession::new(dict, query, OutputTarget::KanjiSidebar, prefs);
    let mut sink = RecordingSink::default();
    session.start(&mut sink).unwrap();
    session.run_to_completion(&mut sink);

    assert_eq!(sink.no_results, 0);
}

#[test]
fn duplicate_adjacent_entries_are_flagged() {
    let file = write_dictionary(&[
        "English /(n) a language/",
        "English /(n) a language/",
        "犬 [いぬ] /(n) dog/",
    ]);
    let mut session = session_for(&file, EngineKind::Edict, "English", Preferences::new());
    let mut sink = RecordingSink::default();
    session.start(&mut sink).unwrap();
    session.run_to_completion(&mut sink);

    assert_eq!(sink.results.len(), 2);
    assert!(!sink.results[0].2);
    assert!(sink.results[1].2, "second identical entry must carry the duplicate hint");
}

#[test]
fn continuation_lines_are_joined_before_classification() {
    let file = write_dictionary(&[
        "A: 彼は学生です。\tHe is a student. #ID=303",
        "A: 彼 は 学生",
    ]);
    let kind = EngineKind::Examples;
    let dict = dictionary(&file, kind);
    let prefs = Preferences::new();
    let query = Query::build("student", kind, &prefs, false).unwrap();
    let mut session = SearchSession::new(dict, query, OutputTarget::Console, prefs);
    let mut sink = RecordingSink::default();
    session.start(&mut sink).unwrap();
    session.run_to_completion(&mut sink);

    // The two physical lines form one logical line, so one result
    let high_or_drained = sink.results.len();
    assert_eq!(high_or_drained, 1);
    match &sink.results[0].0 {
        ResultRecord::Example(r) => {
            assert_eq!(r.primary.len(), 2);
            assert!(r.primary[0].contains("He is a student."));
            // The trailing comment on the first line was stripped
            assert!(!r.primary[0].contains("#ID"));
        }
        other => panic!("expected an example record, got {:?}", other),
    }
    assert_eq!(session.total_results(), 1);
}

#[test]
fn starting_twice_without_finishing_is_a_caller_error() {
    let file = write_dictionary(&["犬 [いぬ] /(n) dog/"]);
    let mut session = session_for(&file, EngineKind::Edict, "dog", Preferences::new());
    let mut sink = RecordingSink::default();
    session.start(&mut sink).unwrap();
    assert!(session.start(&mut sink).is_err());
}

#[test]
fn missing_file_reports_collaborator_error() {
    let kind = EngineKind::Edict;
    let dict;
    {
        let file = write_dictionary(&["犬 [いぬ] /(n) dog/"]);
        dict = dictionary(&file, kind);
        // file is dropped and deleted here
    }
    let prefs = Preferences::new();
    let query = Query::build("dog", kind, &prefs, false).unwrap();
    let mut session = SearchSession::new(dict, query, OutputTarget::Console, prefs);
    let mut sink = RecordingSink::default();

    assert!(session.start(&mut sink).is_err());
    assert_eq!(sink.errors.len(), 1);
    assert_eq!(session.state(), SessionState::Idle);
}

#[test]
fn progress_is_reported_between_chunks() {
    let mut lines: Vec<String> = Vec::new();
    for i in 0..25 {
        lines.push(format!("entry{} /(n) filler/", i));
    }
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    let file = write_dictionary(&refs);

    let mut prefs = Preferences::new();
    prefs.chunk_size = 10;
    let mut session = session_for(&file, EngineKind::Edict, "zebra", prefs);
    let mut sink = RecordingSink::default();
    session.start(&mut sink).unwrap();
    session.run_to_completion(&mut sink);

    assert_eq!(sink.progress, vec![(10, 25), (20, 25)]);
}
