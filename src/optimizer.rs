//! Component C: segment optimizer.
//!
//! Greedily selects non-overlapping segments by round-robining over the
//! queries, picking each query's single best remaining window per turn,
//! until the total budget is spent or every query has been exhausted.

use crate::config::RseParams;
use crate::relevance::RelevanceVector;
use crate::types::{MetaDocumentLayout, SegmentInfo};

/// A segment in meta-document coordinates plus its score, before
/// back-translation to document-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Candidate {
    start: usize,
    end: usize,
    score: f32,
}

/// Prefix sums over a relevance vector: `prefix[i]` is the sum of
/// `values[0..i]`, so any window sum is `prefix[end] - prefix[start]` in
/// O(1).
fn prefix_sums(values: &RelevanceVector) -> Vec<f32> {
    let mut prefix = Vec::with_capacity(values.len() + 1);
    prefix.push(0.0);
    let mut running = 0.0;
    for &v in values {
        running += v;
        prefix.push(running);
    }
    prefix
}

fn window_sum(prefix: &[f32], start: usize, end: usize) -> f32 {
    prefix[end] - prefix[start]
}

/// True if a candidate `[start, end)` strictly overlaps any chosen segment.
fn overlaps_chosen(start: usize, end: usize, chosen: &[Candidate]) -> bool {
    chosen.iter().any(|c| start < c.end && end > c.start)
}

/// True if any document split falls strictly inside `(start, end)`.
fn straddles_split(start: usize, end: usize, document_splits: &[usize]) -> bool {
    document_splits.iter().any(|&split| start < split && split < end)
}

/// Find the best candidate window for one query's relevance vector, or
/// `None` if no window satisfies the structural constraints.
///
/// Ties are broken by scanning `start` ascending then `end` ascending and
/// keeping the first candidate with a strictly greater score, which is
/// exactly "smallest `start` wins, then shortest segment wins" without
/// needing an explicit secondary comparison.
fn best_candidate(
    values: &RelevanceVector,
    prefix: &[f32],
    max_length: usize,
    document_splits: &[usize],
    chosen: &[Candidate],
    remaining_budget: usize,
) -> Option<Candidate> {
    let n = values.len();
    let mut best: Option<Candidate> = None;

    for start in 0..n {
        if values[start] < 0.0 {
            continue;
        }
        let max_end = (start + max_length).min(n);
        for end in (start + 1)..=max_end {
            if values[end - 1] < 0.0 {
                continue;
            }
            let length = end - start;
            if length > remaining_budget {
                continue;
            }
            if overlaps_chosen(start, end, chosen) {
                continue;
            }
            if straddles_split(start, end, document_splits) {
                continue;
            }

            let score = window_sum(prefix, start, end);
            let is_better = match best {
                None => true,
                Some(b) => score > b.score,
            };
            if is_better {
                best = Some(Candidate { start, end, score });
            }
        }
    }

    best
}

/// Select non-overlapping segments across all queries, fairly interleaved,
/// subject to `params`. Returns segments in selection order together with
/// their scores, in meta-document coordinates.
fn select_in_meta_coordinates(
    relevance_vectors: &[RelevanceVector],
    document_splits: &[usize],
    params: &RseParams,
) -> Vec<Candidate> {
    let num_queries = relevance_vectors.len();
    if num_queries == 0 {
        return Vec::new();
    }

    let effective_overall_max_length = params.effective_overall_max_length(num_queries);
    let prefixes: Vec<Vec<f32>> = relevance_vectors.iter().map(prefix_sums).collect();

    let mut chosen: Vec<Candidate> = Vec::new();
    let mut total_length = 0usize;
    let mut query_cursor = 0usize;
    let mut exhausted = vec![false; num_queries];
    let mut exhausted_count = 0usize;

    while total_length < effective_overall_max_length && exhausted_count < num_queries {
        if exhausted[query_cursor] {
            query_cursor = (query_cursor + 1) % num_queries;
            continue;
        }

        let remaining_budget = effective_overall_max_length - total_length;
        let candidate = best_candidate(
            &relevance_vectors[query_cursor],
            &prefixes[query_cursor],
            params.max_length,
            document_splits,
            &chosen,
            remaining_budget,
        );

        match candidate {
            Some(c) if c.score >= params.minimum_value => {
                total_length += c.end - c.start;
                chosen.push(c);
                query_cursor = (query_cursor + 1) % num_queries;
            }
            _ => {
                tracing::debug!(query = query_cursor, "no acceptable segment left; query exhausted");
                exhausted[query_cursor] = true;
                exhausted_count += 1;
                query_cursor = (query_cursor + 1) % num_queries;
            }
        }
    }

    chosen
}

/// Locate the document containing meta-document index `start` and translate
/// a meta-document `[start, end)` candidate into a document-local
/// [`SegmentInfo`].
fn translate(candidate: Candidate, layout: &MetaDocumentLayout) -> SegmentInfo {
    let doc_index = layout
        .document_splits
        .iter()
        .position(|&split| candidate.start < split)
        .expect("candidate was validated against these splits during selection");

    let doc_id = layout.unique_doc_ids[doc_index].clone();
    let doc_start = layout.document_start_points[&doc_id];

    SegmentInfo {
        doc_id,
        chunk_start: candidate.start - doc_start,
        chunk_end: candidate.end - doc_start,
        score: candidate.score,
        text: None,
    }
}

/// Select segments and translate them back into document-local coordinates,
/// ready to be returned from [`crate::extract_segments`].
pub fn select_segments(
    relevance_vectors: &[RelevanceVector],
    layout: &MetaDocumentLayout,
    params: &RseParams,
) -> Vec<SegmentInfo> {
    let chosen = select_in_meta_coordinates(relevance_vectors, &layout.document_splits, params);
    tracing::info!(segments = chosen.len(), "segment optimizer selected segments");
    chosen.into_iter().map(|c| translate(c, layout)).collect()
}
