pub mod classify;
pub mod context;
pub mod parse;
pub mod query;
pub mod session;

pub use context::AppContext;
pub use query::{Query, QueryTerm, TermKind};
pub use session::{SearchSession, SessionState, StepOutcome};
