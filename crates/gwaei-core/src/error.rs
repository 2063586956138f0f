/// Errors that can prevent a search session from being built or started.
///
/// Malformed dictionary content is never an error; the parser yields
/// absent fields instead (see the parse module in gwaei-search).
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("query is empty after normalization")]
    EmptyQuery,

    #[error("query pattern failed to compile: {0}")]
    Pattern(#[from] regex::Error),

    #[error("dictionary file could not be opened: {0}")]
    Io(#[from] std::io::Error),

    #[error("a search is already in progress; finish or cancel it first")]
    Busy,
}
