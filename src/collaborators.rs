//! Narrow trait seams for the two things the *enclosing* query pipeline
//! supplies around the RSE core (spec §6): retrieval itself, and fetching
//! the text of a segment the core selected. Neither is implemented here —
//! the core needs none of these capabilities itself, it only names the
//! shape an application wires in.

use anyhow::Result;

use crate::types::{RankedResultList, SegmentInfo};

/// Runs a batch of search queries against whatever vector store / reranker
/// the enclosing application uses, returning one ranked result list per
/// query in the same order as `queries`.
pub trait ResultSearcher: Send + Sync {
    fn search(&self, queries: &[String]) -> Result<Vec<RankedResultList>>;
}

/// Fetches the chunk text for a segment the optimizer selected, so callers
/// can populate [`SegmentInfo::text`] after [`crate::extract_segments`]
/// returns it empty.
pub trait SegmentTextFetcher: Send + Sync {
    fn fetch_segment_text(&self, doc_id: &str, chunk_start: usize, chunk_end: usize) -> Result<String>;

    /// Populate `text` on every segment in place, in order. Stops at the
    /// first fetch failure.
    fn populate(&self, segments: &mut [SegmentInfo]) -> Result<()> {
        for segment in segments.iter_mut() {
            segment.text = Some(self.fetch_segment_text(
                &segment.doc_id,
                segment.chunk_start,
                segment.chunk_end,
            )?);
        }
        Ok(())
    }
}
