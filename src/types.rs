use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::RseError;

/// One retrieval hit for a single query: a chunk, its document, and how
/// similar the retriever judged it to the query.
///
/// Position within the containing [`RankedResultList`] is the result's
/// `rank` (0-based) and is not stored on the struct itself — it is implicit
/// in list order, matching how the retrieval layer hands these back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedResult {
    pub doc_id: String,
    pub chunk_index: usize,
    pub similarity: f32,
}

impl RankedResult {
    /// Construct a result, rejecting a negative `chunk_index` at the
    /// boundary rather than silently truncating or wrapping it.
    pub fn new(doc_id: impl Into<String>, chunk_index: i64, similarity: f32) -> Result<Self, RseError> {
        let doc_id = doc_id.into();
        if chunk_index < 0 {
            return Err(RseError::InconsistentResult { doc_id, chunk_index });
        }
        Ok(Self {
            doc_id,
            chunk_index: chunk_index as usize,
            similarity,
        })
    }
}

/// An ordered sequence of [`RankedResult`]s for one search query, sorted by
/// descending similarity. The core does not itself verify the sort order or
/// the no-duplicate-`(doc_id, chunk_index)` invariant — both are guaranteed
/// by the upstream retriever and are documented preconditions.
pub type RankedResultList = Vec<RankedResult>;

/// The meta-document coordinate space built by the meta-document builder
/// (component A): a virtual concatenation of the unique documents seen
/// across all query result lists, laid out so the optimizer can work over a
/// single flat index range.
#[derive(Debug, Clone, Default)]
pub struct MetaDocumentLayout {
    /// Documents in meta-document order (first-seen, left-to-right scan).
    pub unique_doc_ids: Vec<String>,
    /// `doc_id` -> offset of that document's chunk 0 in the meta-document.
    pub document_start_points: HashMap<String, usize>,
    /// Non-inclusive end offset of each document, aligned with `unique_doc_ids`.
    pub document_splits: Vec<usize>,
}

impl MetaDocumentLayout {
    /// Total length of the meta-document, i.e. one past the last valid index.
    pub fn len(&self) -> usize {
        self.document_splits.last().copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.document_splits.is_empty()
    }
}

/// A resolved segment, returned without its chunk text: populating `text` is
/// the job of an external [`crate::collaborators::SegmentTextFetcher`], not
/// the core.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SegmentInfo {
    pub doc_id: String,
    pub chunk_start: usize,
    pub chunk_end: usize,
    pub score: f32,
    #[serde(default)]
    pub text: Option<String>,
}
