//! Component B: chunk value mapper.
//!
//! Converts each query's ranked result list into a dense relevance vector
//! over the meta-document, blending rank decay with absolute similarity and
//! subtracting a flat penalty so that chunks with no evidence of relevance
//! repel segment inclusion rather than merely failing to attract it.

use crate::types::{MetaDocumentLayout, RankedResultList};

/// One query's relevance value at every meta-document position.
pub type RelevanceVector = Vec<f32>;

/// The value contributed by a chunk with no result in a given query's list:
/// equivalent to `rank = 1000, similarity = 0.0` in the per-chunk formula.
fn missing_chunk_value(irrelevant_chunk_penalty: f32) -> f32 {
    -irrelevant_chunk_penalty
}

/// `v = exp(-rank / decay_rate) * similarity - irrelevant_chunk_penalty`.
fn chunk_value(rank: usize, similarity: f32, irrelevant_chunk_penalty: f32, decay_rate: usize) -> f32 {
    let decay = (-(rank as f32) / decay_rate as f32).exp();
    decay * similarity - irrelevant_chunk_penalty
}

/// Build one [`RelevanceVector`] per query, each of length
/// `layout.len()` (the meta-document length).
pub fn build_relevance_vectors(
    ranked_results: &[RankedResultList],
    layout: &MetaDocumentLayout,
    irrelevant_chunk_penalty: f32,
    decay_rate: usize,
) -> Vec<RelevanceVector> {
    let meta_len = layout.len();

    ranked_results
        .iter()
        .map(|list| {
            let mut values = vec![missing_chunk_value(irrelevant_chunk_penalty); meta_len];

            for (rank, result) in list.iter().enumerate() {
                let Some(&doc_start) = layout.document_start_points.get(&result.doc_id) else {
                    continue; // doc_id not selected into the meta-document
                };
                let meta_index = doc_start + result.chunk_index;
                if meta_index < meta_len {
                    values[meta_index] =
                        chunk_value(rank, result.similarity, irrelevant_chunk_penalty, decay_rate);
                }
            }

            values
        })
        .collect()
}
