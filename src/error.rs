use thiserror::Error;

/// Boundary errors for the RSE core.
///
/// `EmptyInput` is intentionally not a variant here: per the spec, a ranked
/// result set with nothing in it is a normal outcome, not a failure, and
/// `extract_segments` reports it by returning an empty segment list.
#[derive(Debug, Error, PartialEq)]
pub enum RseError {
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("inconsistent ranked result for doc `{doc_id}`: chunk_index {chunk_index} is negative")]
    InconsistentResult { doc_id: String, chunk_index: i64 },
}
