//! Relevant Segment Extraction (RSE) core.
//!
//! Given multiple ranked retrieval result lists (one per search query) over
//! a shared corpus of chunked documents, [`extract_segments`] selects a
//! small set of non-overlapping contiguous segments that jointly maximize
//! aggregate relevance subject to length and quality constraints.
//!
//! The core is a pure, synchronous, single-threaded computation: no I/O, no
//! shared mutable state, no retrieval, no ranking. It consumes pre-ranked
//! result lists (§6 of the spec) and emits segment descriptors; populating
//! segment text and running the underlying search are the job of the
//! [`collaborators::ResultSearcher`] and [`collaborators::SegmentTextFetcher`]
//! traits, implemented by the enclosing application.

pub mod collaborators;
pub mod config;
pub mod error;
pub mod eval;
pub mod meta_document;
pub mod optimizer;
pub mod relevance;
pub mod types;

pub use config::RseParams;
pub use error::RseError;
pub use types::{MetaDocumentLayout, RankedResult, RankedResultList, SegmentInfo};

/// Select relevant segments across a batch of per-query ranked result
/// lists.
///
/// Returns an empty list (not an error) when none of the `ranked_results`
/// lists contain any result — spec §7 treats this as a normal "no relevant
/// segments" outcome, not an `EmptyInput` failure propagated to the caller.
///
/// # Errors
///
/// Returns [`RseError::InvalidParameter`] if `params` is out of its declared
/// domain. Individual [`RankedResult`]s are validated at construction time
/// ([`RseError::InconsistentResult`]), not here.
pub fn extract_segments(
    ranked_results: &[RankedResultList],
    params: &RseParams,
) -> Result<Vec<SegmentInfo>, RseError> {
    params.validate()?;

    let layout = meta_document::build_meta_document(ranked_results, params.top_k_for_document_selection);
    if layout.is_empty() {
        tracing::debug!("no results in any query list; returning empty segment set");
        return Ok(Vec::new());
    }

    let relevance_vectors = relevance::build_relevance_vectors(
        ranked_results,
        &layout,
        params.irrelevant_chunk_penalty,
        params.decay_rate,
    );

    let segments = optimizer::select_segments(&relevance_vectors, &layout, params);
    tracing::info!(
        queries = ranked_results.len(),
        documents = layout.unique_doc_ids.len(),
        segments = segments.len(),
        "extract_segments completed"
    );

    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(doc_id: &str, chunk_index: i64, similarity: f32) -> RankedResult {
        RankedResult::new(doc_id, chunk_index, similarity).unwrap()
    }

    #[test]
    fn empty_input_returns_empty_output_not_an_error() {
        let segments = extract_segments(&[], &RseParams::default()).unwrap();
        assert!(segments.is_empty());

        let segments = extract_segments(&[vec![]], &RseParams::default()).unwrap();
        assert!(segments.is_empty());
    }

    #[test]
    fn invalid_parameter_is_rejected_at_the_boundary() {
        let mut params = RseParams::default();
        params.max_length = 0;
        let err = extract_segments(&[], &params).unwrap_err();
        assert!(matches!(err, RseError::InvalidParameter { name: "max_length", .. }));
    }

    #[test]
    fn negative_chunk_index_is_rejected_at_construction() {
        let err = RankedResult::new("A", -1, 0.5).unwrap_err();
        assert!(matches!(err, RseError::InconsistentResult { .. }));
    }

    #[test]
    fn end_to_end_single_query_single_document() {
        let list: Vec<RankedResult> = (0..10)
            .map(|rank| result("A", rank, 1.0 - 0.08 * rank as f32))
            .collect();
        let segments = extract_segments(&[list], &RseParams::default()).unwrap();
        assert!(!segments.is_empty());
        assert_eq!(segments[0].doc_id, "A");
        assert!(segments[0].score >= RseParams::default().minimum_value);
    }

    #[test]
    fn determinism_across_repeated_calls() {
        let list: Vec<RankedResult> = (0..10)
            .map(|rank| result("A", rank, 1.0 - 0.08 * rank as f32))
            .collect();
        let params = RseParams::default();
        let first = extract_segments(&[list.clone()], &params).unwrap();
        let second = extract_segments(&[list], &params).unwrap();
        assert_eq!(first, second);
    }
}
