use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::mem;
use std::sync::Arc;

use gwaei_config::Preferences;
use gwaei_core::{
    Archivable, Dictionary, OutputTarget, Relevance, ResultRecord, ResultSink, SearchError,
    SearchStatus,
};

use crate::classify;
use crate::parse::parse_line;
use crate::query::Query;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Searching,
    Canceling,
}

/// Where the driver is inside one SEARCHING episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Scanning,
    DrainMedium,
    DrainLow,
}

/// What one driver invocation reports back to the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Re-invoke to continue; progress was reported to the sink
    MoreWork,
    Finished(SearchStatus),
}

/// One in-flight or completed search of one dictionary with one query.
///
/// The driver is cooperative: `step` processes a bounded chunk and
/// returns, so a single-threaded event loop can interleave searches with
/// everything else. Cancellation is observed only at the top of the
/// per-line loop, never mid-line.
pub struct SearchSession {
    dictionary: Arc<Dictionary>,
    query: Query,
    target: OutputTarget,
    prefs: Preferences,

    state: SessionState,
    phase: Phase,
    reader: Option<BufReader<File>>,
    /// One raw line of lookahead for continuation joining
    pending_line: Option<String>,
    current_line: usize,

    total_results: usize,
    relevant_count: usize,
    irrelevant_count: usize,

    medium_queue: VecDeque<String>,
    low_queue: VecDeque<String>,

    /// Ping-pong record slots for duplicate-adjacent suppression
    current: Option<ResultRecord>,
    previous: Option<ResultRecord>,
}

impl SearchSession {
    pub fn new(
        dictionary: Arc<Dictionary>,
        query: Query,
        target: OutputTarget,
        prefs: Preferences,
    ) -> Self {
        Self {
            dictionary,
            query,
            target,
            prefs,
            state: SessionState::Idle,
            phase: Phase::Scanning,
            reader: None,
            pending_line: None,
            current_line: 0,
            total_results: 0,
            relevant_count: 0,
            irrelevant_count: 0,
            medium_queue: VecDeque::new(),
            low_queue: VecDeque::new(),
            current: None,
            previous: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn target(&self) -> OutputTarget {
        self.target
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn total_results(&self) -> usize {
        self.total_results
    }

    pub fn relevant_count(&self) -> usize {
        self.relevant_count
    }

    pub fn irrelevant_count(&self) -> usize {
        self.irrelevant_count
    }

    /// Fraction of the dictionary scanned so far, for progress bars
    pub fn progress_ratio(&self) -> f64 {
        let total = self.dictionary.total_lines();
        if total == 0 {
            1.0
        } else {
            (self.current_line as f64 / total as f64).min(1.0)
        }
    }

    /// IDLE → SEARCHING. Opens the dictionary file (idempotent if a
    /// handle is already held), resets all counters and scratch buffers.
    /// An unopenable file is a fatal precondition for this session and is
    /// reported to the sink once.
    pub fn start(&mut self, sink: &mut dyn ResultSink) -> Result<(), SearchError> {
        if self.state != SessionState::Idle {
            return Err(SearchError::Busy);
        }

        if self.reader.is_none() {
            let file = match File::open(self.dictionary.path()) {
                Ok(file) => file,
                Err(e) => {
                    sink.collaborator_error(&format!(
                        "could not open {}: {}",
                        self.dictionary.path().display(),
                        e
                    ));
                    return Err(SearchError::Io(e));
                }
            };
            self.reader = Some(BufReader::new(file));
        }

        self.pending_line = None;
        self.current_line = 0;
        self.total_results = 0;
        self.relevant_count = 0;
        self.irrelevant_count = 0;
        self.medium_queue.clear();
        self.low_queue.clear();
        self.current = None;
        self.previous = None;
        self.phase = Phase::Scanning;
        self.state = SessionState::Searching;

        tracing::debug!(
            "Search started: {:?} in {} ({} lines)",
            self.query.canonical(),
            self.dictionary.name(),
            self.dictionary.total_lines()
        );
        sink.search_started();
        Ok(())
    }

    /// Request cooperative cancellation; takes effect at the next
    /// per-line loop top.
    pub fn cancel(&mut self) {
        if self.state == SessionState::Searching {
            self.state = SessionState::Canceling;
        }
    }

    /// One cooperative scheduler invocation: process up to one chunk of
    /// lines (or drained queue entries) and yield.
    pub fn step(&mut self, sink: &mut dyn ResultSink) -> StepOutcome {
        if self.state == SessionState::Idle {
            return StepOutcome::Finished(SearchStatus::Completed);
        }

        match self.phase {
            Phase::Scanning => self.step_scanning(sink),
            Phase::DrainMedium => self.step_drain(sink, Relevance::Medium),
            Phase::DrainLow => self.step_drain(sink, Relevance::Low),
        }
    }

    /// Drive the session to its terminal state in a tight loop. This is
    /// the non-interactive mode; interactive callers re-invoke `step`
    /// from their own scheduler instead.
    pub fn run_to_completion(&mut self, sink: &mut dyn ResultSink) -> SearchStatus {
        loop {
            if let StepOutcome::Finished(status) = self.step(sink) {
                return status;
            }
        }
    }

    fn step_scanning(&mut self, sink: &mut dyn ResultSink) -> StepOutcome {
        for _ in 0..self.prefs.chunk_size {
            // Cancellation is only observed here, between lines
            if self.state == SessionState::Canceling {
                return self.finish(sink, SearchStatus::Canceled);
            }

            match self.read_logical_line() {
                Some(line) => self.process_line(&line, sink),
                None => return self.begin_drain(sink),
            }
        }

        sink.progress(self.current_line, self.dictionary.total_lines());
        StepOutcome::MoreWork
    }

    /// End of file: report the relevant-results header, then hand off to
    /// the drain phases (or straight to completion when draining is
    /// suppressed or there is nothing queued).
    fn begin_drain(&mut self, sink: &mut dyn ResultSink) -> StepOutcome {
        if self.relevant_count > 0 {
            sink.more_relevant_header(self.relevant_count);
        }

        let queued = self.medium_queue.len() + self.low_queue.len();
        if !self.prefs.show_less_relevant || queued == 0 {
            return self.finish(sink, SearchStatus::Completed);
        }

        sink.less_relevant_header(queued);
        self.phase = Phase::DrainMedium;
        StepOutcome::MoreWork
    }

    /// Drain one pending queue in chunks, feeding each raw line through
    /// the same parse/ping-pong/emit path as an immediate result.
    fn step_drain(&mut self, sink: &mut dyn ResultSink, relevance: Relevance) -> StepOutcome {
        for _ in 0..self.prefs.chunk_size {
            if self.state == SessionState::Canceling {
                return self.finish(sink, SearchStatus::Canceled);
            }

            let queue = match relevance {
                Relevance::Medium => &mut self.medium_queue,
                _ => &mut self.low_queue,
            };
            match queue.pop_front() {
                Some(line) => {
                    self.total_results += 1;
                    self.emit(&line, relevance, sink);
                }
                None => {
                    return match relevance {
                        Relevance::Medium => {
                            self.phase = Phase::DrainLow;
                            StepOutcome::MoreWork
                        }
                        _ => self.finish(sink, SearchStatus::Completed),
                    };
                }
            }
        }
        StepOutcome::MoreWork
    }

    fn process_line(&mut self, line: &str, sink: &mut dyn ResultSink) {
        if classify::is_skippable(line) {
            return;
        }
        if !classify::exists(&self.query, line) {
            return;
        }

        match classify::classify_relevance(&self.query, line) {
            Relevance::High => {
                self.total_results += 1;
                self.relevant_count += 1;
                self.emit(line, Relevance::High, sink);
            }
            Relevance::Medium => {
                // Kanji dictionary volumes are bounded by the kanji set,
                // so those queues are uncapped
                if self.query.engine().is_kanji()
                    || self.medium_queue.len() < self.prefs.max_medium_results
                {
                    self.medium_queue.push_back(line.to_string());
                    self.irrelevant_count += 1;
                }
            }
            Relevance::Low => {
                if self.query.engine().is_kanji()
                    || self.low_queue.len() < self.prefs.max_low_results
                {
                    self.low_queue.push_back(line.to_string());
                    self.irrelevant_count += 1;
                }
            }
        }
    }

    /// Swap the ping-pong slots, parse into the now-current one, and
    /// emit with a duplicate-of-previous hint so the sink can merge the
    /// display of repeated headwords.
    fn emit(&mut self, line: &str, relevance: Relevance, sink: &mut dyn ResultSink) {
        mem::swap(&mut self.current, &mut self.previous);
        let record = parse_line(self.dictionary.kind(), line);
        let duplicate = self
            .previous
            .as_ref()
            .is_some_and(|previous| previous.same_entry_as(&record));
        sink.result(&record, relevance, duplicate);
        self.current = Some(record);
    }

    /// Read the next logical line, joining `A:` continuation lines onto
    /// their predecessor (with the predecessor's trailing `#` comment
    /// stripped). Returns None at end of file.
    fn read_logical_line(&mut self) -> Option<String> {
        let mut line = self.read_raw_line()?;
        while let Some(next) = self.peek_raw_line() {
            if !next.starts_with("A:") {
                break;
            }
            if let Some(comment) = line.find('#') {
                line.truncate(comment);
            }
            let trimmed = line.trim_end().len();
            line.truncate(trimmed);
            line.push('\n');
            // The peek is guaranteed present; consume it
            if let Some(joined) = self.read_raw_line() {
                line.push_str(&joined);
            }
        }
        Some(line)
    }

    fn peek_raw_line(&mut self) -> Option<&String> {
        if self.pending_line.is_none() {
            self.pending_line = self.read_from_file();
        }
        self.pending_line.as_ref()
    }

    fn read_raw_line(&mut self) -> Option<String> {
        let line = match self.pending_line.take() {
            Some(line) => Some(line),
            None => self.read_from_file(),
        };
        if line.is_some() {
            self.current_line += 1;
        }
        line
    }

    /// Pull one raw line, decoding leniently: a mangled line surfaces
    /// with U+FFFD markers and gets skipped by the classifier rather than
    /// aborting the whole search.
    fn read_from_file(&mut self) -> Option<String> {
        let reader = self.reader.as_mut()?;
        let mut bytes = Vec::new();
        match reader.read_until(b'\n', &mut bytes) {
            Ok(0) => None,
            Ok(_) => {
                let mut line = String::from_utf8_lossy(&bytes).into_owned();
                while line.ends_with('\n') || line.ends_with('\r') {
                    line.pop();
                }
                Some(line)
            }
            Err(e) => {
                tracing::warn!("Read error in {}: {}", self.dictionary.name(), e);
                None
            }
        }
    }

    /// The single terminal path back to IDLE; runs exactly once per
    /// SEARCHING episode whether the search completed or was canceled.
    fn finish(&mut self, sink: &mut dyn ResultSink, status: SearchStatus) -> StepOutcome {
        if status == SearchStatus::Completed
            && self.total_results == 0
            && self.target != OutputTarget::KanjiSidebar
        {
            sink.no_results();
        }
        sink.search_finished(status);

        self.reader = None;
        self.pending_line = None;
        self.medium_queue.clear();
        self.low_queue.clear();
        self.current = None;
        self.previous = None;
        self.state = SessionState::Idle;
        self.phase = Phase::Scanning;

        tracing::debug!(
            "Search finished ({:?}): {} results, {} relevant",
            status,
            self.total_results,
            self.relevant_count
        );
        StepOutcome::Finished(status)
    }
}

impl Archivable for SearchSession {
    fn has_results(&self) -> bool {
        self.total_results > 0
    }
}
