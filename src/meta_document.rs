//! Component A: meta-document builder.
//!
//! Unions the top-K documents across all query result lists and lays them
//! out end-to-end in a single flat coordinate space, so the optimizer can
//! reason about one 1-D index range instead of per-document ones.

use std::collections::{HashMap, HashSet};

use crate::types::{MetaDocumentLayout, RankedResultList};

/// Build the meta-document layout for a batch of per-query ranked result
/// lists.
///
/// Returns an empty layout (`unique_doc_ids` empty, `document_splits`
/// empty) when no list contains any result — the empty-input case is
/// handled by the caller, which treats it as "no relevant segments" rather
/// than an error (spec §4.A, §7).
///
/// Meta-document order is first-seen, left-to-right across the query lists:
/// this is the explicit, deterministic tie-break the spec's Design Notes
/// call for in place of relying on hash-set iteration order.
pub fn build_meta_document(
    ranked_results: &[RankedResultList],
    top_k_for_document_selection: usize,
) -> MetaDocumentLayout {
    let mut unique_doc_ids = Vec::new();
    let mut seen = HashSet::new();

    for list in ranked_results {
        for result in list.iter().take(top_k_for_document_selection) {
            if seen.insert(result.doc_id.clone()) {
                unique_doc_ids.push(result.doc_id.clone());
            }
        }
    }

    if unique_doc_ids.is_empty() {
        return MetaDocumentLayout::default();
    }

    let mut document_splits = Vec::with_capacity(unique_doc_ids.len());
    let mut document_start_points = HashMap::with_capacity(unique_doc_ids.len());
    let mut previous_split_end = 0usize;

    for doc_id in &unique_doc_ids {
        let max_chunk_index = ranked_results
            .iter()
            .flat_map(|list| list.iter())
            .filter(|r| &r.doc_id == doc_id)
            .map(|r| r.chunk_index)
            .max()
            .expect("doc_id came from a result in one of these lists");

        document_start_points.insert(doc_id.clone(), previous_split_end);
        previous_split_end += max_chunk_index + 1;
        document_splits.push(previous_split_end);
    }

    MetaDocumentLayout {
        unique_doc_ids,
        document_start_points,
        document_splits,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RankedResult;

    fn result(doc_id: &str, chunk_index: i64, similarity: f32) -> RankedResult {
        RankedResult::new(doc_id, chunk_index, similarity).unwrap()
    }

    #[test]
    fn empty_input_yields_empty_layout() {
        let layout = build_meta_document(&[], 7);
        assert!(layout.is_empty());
        assert_eq!(layout.len(), 0);

        let layout = build_meta_document(&[vec![]], 7);
        assert!(layout.is_empty());
    }

    #[test]
    fn single_document_spans_its_max_chunk_index() {
        let list = vec![
            result("A", 0, 0.9),
            result("A", 1, 0.8),
            result("A", 4, 0.5),
        ];
        let layout = build_meta_document(&[list], 7);
        assert_eq!(layout.unique_doc_ids, vec!["A".to_string()]);
        assert_eq!(layout.document_start_points["A"], 0);
        assert_eq!(layout.document_splits, vec![5]);
        assert_eq!(layout.len(), 5);
    }

    #[test]
    fn multiple_documents_are_concatenated_in_first_seen_order() {
        let q0 = vec![result("B", 0, 0.9), result("A", 0, 0.8)];
        let q1 = vec![result("A", 2, 0.7)];
        let layout = build_meta_document(&[q0, q1], 7);

        // B seen first in q0, then A.
        assert_eq!(layout.unique_doc_ids, vec!["B".to_string(), "A".to_string()]);
        assert_eq!(layout.document_start_points["B"], 0);
        assert_eq!(layout.document_splits[0], 1); // B: max chunk_index 0 -> len 1
        assert_eq!(layout.document_start_points["A"], 1);
        assert_eq!(layout.document_splits[1], 1 + 3); // A: max chunk_index 2 -> len 3
    }

    #[test]
    fn only_top_k_documents_are_selected_but_all_their_results_count() {
        // B only appears beyond top_k_for_document_selection = 1, so it is
        // excluded from unique_doc_ids even though a result for it exists.
        let q0 = vec![result("A", 0, 0.9), result("B", 0, 0.8)];
        let layout = build_meta_document(&[q0], 1);
        assert_eq!(layout.unique_doc_ids, vec!["A".to_string()]);
    }

    #[test]
    fn max_chunk_index_considers_all_lists_not_just_top_k_hits() {
        // A qualifies for the meta-document via q0's top-K hit at chunk 0,
        // but q1 has a later chunk of A outside q0's top-K window; the
        // document's span must still extend to cover it.
        let q0 = vec![result("A", 0, 0.9)];
        let q1 = vec![result("Z", 0, 0.5), result("A", 9, 0.1)];
        let layout = build_meta_document(&[q0, q1], 1);
        let a_index = layout.unique_doc_ids.iter().position(|d| d == "A").unwrap();
        let a_start = layout.document_start_points["A"];
        assert_eq!(layout.document_splits[a_index] - a_start, 10);
    }

    #[test]
    fn determinism_across_repeated_calls() {
        let q0 = vec![result("B", 0, 0.9), result("A", 0, 0.8), result("C", 0, 0.7)];
        let first = build_meta_document(&[q0.clone()], 7);
        let second = build_meta_document(&[q0], 7);
        assert_eq!(first.unique_doc_ids, second.unique_doc_ids);
        assert_eq!(first.document_splits, second.document_splits);
    }
}
