use crate::record::{Relevance, ResultRecord};

/// Which output consumer a search feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputTarget {
    Results,
    KanjiSidebar,
    Console,
}

/// How a SEARCHING episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    Completed,
    Canceled,
}

/// Receiver for incremental search output. The sink owns all rendering;
/// the driver only reports. Lifecycle methods default to no-ops so simple
/// consumers implement `result` alone.
pub trait ResultSink {
    fn search_started(&mut self) {}

    fn progress(&mut self, current_line: usize, total_lines: usize) {
        let _ = (current_line, total_lines);
    }

    /// Scanning finished and `count` high-relevance results were emitted
    fn more_relevant_header(&mut self, count: usize) {
        let _ = count;
    }

    /// The medium/low drain is about to emit `count` further results
    fn less_relevant_header(&mut self, count: usize) {
        let _ = count;
    }

    fn result(&mut self, record: &ResultRecord, relevance: Relevance, duplicate_of_previous: bool);

    fn no_results(&mut self) {}

    fn search_finished(&mut self, status: SearchStatus) {
        let _ = status;
    }

    /// A collaborator-level failure (e.g. the dictionary file vanished);
    /// reported once, never retried by the search core.
    fn collaborator_error(&mut self, message: &str) {
        let _ = message;
    }
}
