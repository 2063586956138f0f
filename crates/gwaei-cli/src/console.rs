use gwaei_core::{Relevance, ResultRecord, ResultSink, SearchStatus};

/// Renders search output to stdout. Progress goes to stderr and only
/// when it is a terminal, so piped output stays clean.
pub struct ConsoleSink {
    quiet: bool,
    show_progress: bool,
    progress_drawn: bool,
}

impl ConsoleSink {
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            show_progress: !quiet && atty::is(atty::Stream::Stderr),
            progress_drawn: false,
        }
    }

    fn clear_progress(&mut self) {
        if self.progress_drawn {
            eprint!("\r\x1b[2K");
            self.progress_drawn = false;
        }
    }

    fn render(record: &ResultRecord) -> String {
        match record {
            ResultRecord::Edict(r) => {
                let mut out = r.headword.clone();
                if let Some(furigana) = &r.furigana {
                    out.push_str(&format!(" [{}]", furigana));
                }
                if r.is_common {
                    out.push_str(" (P)");
                }
                for (i, definition) in r.definitions.iter().enumerate() {
                    out.push_str(&format!("\n  {}. {}", i + 1, definition));
                }
                out
            }
            ResultRecord::Kanji(r) => {
                let mut out = r.kanji.clone();
                if let Some(strokes) = r.strokes {
                    out.push_str(&format!(" strokes:{}", strokes));
                }
                if let Some(grade) = r.grade {
                    out.push_str(&format!(" grade:{}", grade));
                }
                if let Some(frequency) = r.frequency {
                    out.push_str(&format!(" freq:{}", frequency));
                }
                if let Some(jlpt) = r.jlpt {
                    out.push_str(&format!(" jlpt:{}", jlpt));
                }
                if !r.readings.is_empty() {
                    out.push_str(&format!("\n  readings: {}", r.readings.join(" ")));
                }
                if !r.meanings.is_empty() {
                    out.push_str(&format!("\n  meanings: {}", r.meanings.join("; ")));
                }
                out
            }
            ResultRecord::Example(r) => {
                let mut out = r.primary.join("\n  ");
                for extra in &r.supplementary {
                    out.push_str(&format!("\n  ({})", extra));
                }
                out
            }
            ResultRecord::Plain(line) => line.clone(),
        }
    }
}

impl ResultSink for ConsoleSink {
    fn progress(&mut self, current_line: usize, total_lines: usize) {
        if self.show_progress && total_lines > 0 {
            eprint!(
                "\r\x1b[2KSearching... {}%",
                current_line * 100 / total_lines
            );
            self.progress_drawn = true;
        }
    }

    fn less_relevant_header(&mut self, count: usize) {
        self.clear_progress();
        if !self.quiet {
            println!("\n*** Other results ({}) ***", count);
        }
    }

    fn result(&mut self, record: &ResultRecord, _relevance: Relevance, duplicate: bool) {
        self.clear_progress();
        // Same headword as the line before: already on screen
        if duplicate {
            return;
        }
        println!("{}", Self::render(record));
    }

    fn no_results(&mut self) {
        self.clear_progress();
        println!("No results found!");
    }

    fn search_finished(&mut self, _status: SearchStatus) {
        self.clear_progress();
    }

    fn collaborator_error(&mut self, message: &str) {
        self.clear_progress();
        eprintln!("Error: {}", message);
    }
}
