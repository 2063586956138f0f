use gwaei_core::{DictionaryRegistry, HistoryList, OutputTarget};

use crate::session::{SearchSession, SessionState};

/// Application-wide search state, constructed once at startup and passed
/// by reference wherever it is needed. Holds the dictionary registry and
/// the per-target search histories.
pub struct AppContext {
    pub registry: DictionaryRegistry,
    pub results_history: HistoryList<SearchSession>,
    pub kanji_history: HistoryList<SearchSession>,
}

impl AppContext {
    pub fn new(registry: DictionaryRegistry) -> Self {
        Self {
            registry,
            results_history: HistoryList::default(),
            kanji_history: HistoryList::default(),
        }
    }

    /// The history list feeding a given output target. Console searches
    /// share the results-pane history.
    pub fn history_for_mut(&mut self, target: OutputTarget) -> &mut HistoryList<SearchSession> {
        match target {
            OutputTarget::KanjiSidebar => &mut self.kanji_history,
            OutputTarget::Results | OutputTarget::Console => &mut self.results_history,
        }
    }

    /// Ask the current session for a target to stop. The session must
    /// still be stepped by its scheduler until it observes the flag and
    /// cleans up; only one session per target is ever active.
    pub fn cancel_current(&mut self, target: OutputTarget) {
        if let Some(session) = self.history_for_mut(target).current_mut() {
            session.cancel();
        }
    }

    /// Archive a finished session as the new current entry for its
    /// target. The previous current must already be idle.
    pub fn install_session(&mut self, session: SearchSession) {
        let history = self.history_for_mut(session.target());
        debug_assert!(
            history
                .current()
                .map(|prior| prior.state() == SessionState::Idle)
                .unwrap_or(true),
            "previous session must finish or cancel before a new one is installed"
        );
        history.push(session);
    }
}
