use crate::DocId;

/// Errors returned by the search core.
///
/// Every error is raised synchronously by the call that violated a
/// precondition; the index is left exactly as it was before the call.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Negative or duplicate document id, unknown id on removal, malformed stop words.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A document or query word is malformed.
    #[error("invalid word: {0:?}")]
    InvalidWord(String),
    /// Lookup of a document id that is not indexed.
    #[error("document not found: {0}")]
    OutOfRange(DocId),
}

pub type Result<T> = std::result::Result<T, SearchError>;
