pub mod dictionary;
pub mod error;
pub mod history;
pub mod record;
pub mod sink;

pub use dictionary::{Dictionary, DictionaryRegistry, EngineKind};
pub use error::SearchError;
pub use history::{Archivable, HistoryList};
pub use record::{EdictRecord, ExampleRecord, KanjiRecord, Relevance, ResultRecord};
pub use sink::{OutputTarget, ResultSink, SearchStatus};
