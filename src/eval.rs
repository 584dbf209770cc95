//! Component D: evaluation harness.
//!
//! Scores runs of [`crate::extract_segments`] against labeled queries using
//! the same IR metrics (Recall@K, Precision@K, MRR, nDCG@K, Hit Rate@K) the
//! host engine's general retrieval evaluator computes, but scoped to
//! segment output so an RSE parameter change (e.g. the FinanceBench
//! profile) can be regression-tested on its own.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::types::SegmentInfo;

/// A single evaluation query with its expected relevant document IDs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalQuery {
    /// The search queries fed into `extract_segments` for this case.
    pub queries: Vec<String>,
    /// IDs of documents that are relevant to this case.
    /// For graded relevance, use `graded_relevance` instead.
    pub relevant_ids: HashSet<String>,
    /// Optional graded relevance: doc_id -> relevance score (0.0 to 1.0).
    /// If empty, binary relevance from `relevant_ids` is used.
    #[serde(default)]
    pub graded_relevance: HashMap<String, f32>,
}

/// One retrieved item for evaluation: a document judged relevant by its
/// best-scoring segment.
#[derive(Debug, Clone)]
struct EvalResult {
    doc_id: String,
    score: f32,
}

/// Aggregated metrics across an evaluation set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalMetrics {
    pub num_queries: usize,
    pub mrr: f64,
    pub recall_at: HashMap<usize, f64>,
    pub precision_at: HashMap<usize, f64>,
    pub ndcg_at: HashMap<usize, f64>,
    pub hit_rate_at: HashMap<usize, f64>,
    pub per_query: Vec<QueryMetrics>,
}

/// Metrics for a single evaluation case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryMetrics {
    pub reciprocal_rank: f64,
    pub recall_at_k: HashMap<usize, f64>,
    pub precision_at_k: HashMap<usize, f64>,
    pub ndcg_at_k: HashMap<usize, f64>,
    pub num_relevant: usize,
    pub num_retrieved_relevant: usize,
}

/// Collapse a batch of segments into one ranked item per document, taking
/// each document's best segment score and ranking highest-score first.
/// `extract_segments` itself returns segments in round-robin selection
/// order, not sorted by score, so the harness re-ranks before scoring —
/// exactly what a downstream consumer sorting by score would see.
fn segments_to_eval_results(segments: &[SegmentInfo]) -> Vec<EvalResult> {
    let mut best_by_doc: HashMap<String, f32> = HashMap::new();
    for segment in segments {
        best_by_doc
            .entry(segment.doc_id.clone())
            .and_modify(|s| *s = s.max(segment.score))
            .or_insert(segment.score);
    }

    let mut results: Vec<EvalResult> = best_by_doc
        .into_iter()
        .map(|(doc_id, score)| EvalResult { doc_id, score })
        .collect();
    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    results
}

/// Evaluate RSE output quality across a set of labeled queries.
///
/// `k_values` specifies which K values to compute metrics at (e.g. `[1, 3,
/// 5, 10]`). `run` is called once per [`EvalQuery`] and should execute the
/// full retrieval + `extract_segments` pipeline for that case's `queries`.
pub fn evaluate<F>(eval_set: &[EvalQuery], k_values: &[usize], mut run: F) -> EvalMetrics
where
    F: FnMut(&[String]) -> Vec<SegmentInfo>,
{
    let mut per_query = Vec::with_capacity(eval_set.len());
    let mut mrr_sum = 0.0;
    let mut recall_sums: HashMap<usize, f64> = k_values.iter().map(|&k| (k, 0.0)).collect();
    let mut precision_sums: HashMap<usize, f64> = k_values.iter().map(|&k| (k, 0.0)).collect();
    let mut ndcg_sums: HashMap<usize, f64> = k_values.iter().map(|&k| (k, 0.0)).collect();
    let mut hit_sums: HashMap<usize, f64> = k_values.iter().map(|&k| (k, 0.0)).collect();

    for eval_query in eval_set {
        let segments = run(&eval_query.queries);
        let results = segments_to_eval_results(&segments);
        let qm = evaluate_single(eval_query, &results, k_values);

        mrr_sum += qm.reciprocal_rank;
        for &k in k_values {
            if let Some(&v) = qm.recall_at_k.get(&k) {
                *recall_sums.get_mut(&k).unwrap() += v;
            }
            if let Some(&v) = qm.precision_at_k.get(&k) {
                *precision_sums.get_mut(&k).unwrap() += v;
            }
            if let Some(&v) = qm.ndcg_at_k.get(&k) {
                *ndcg_sums.get_mut(&k).unwrap() += v;
            }
            let retrieved_in_k = results.iter().take(k).any(|r| is_relevant(eval_query, &r.doc_id));
            if retrieved_in_k {
                *hit_sums.get_mut(&k).unwrap() += 1.0;
            }
        }
        per_query.push(qm);
    }

    let n = eval_set.len().max(1) as f64;
    EvalMetrics {
        num_queries: eval_set.len(),
        mrr: mrr_sum / n,
        recall_at: recall_sums.into_iter().map(|(k, v)| (k, v / n)).collect(),
        precision_at: precision_sums.into_iter().map(|(k, v)| (k, v / n)).collect(),
        ndcg_at: ndcg_sums.into_iter().map(|(k, v)| (k, v / n)).collect(),
        hit_rate_at: hit_sums.into_iter().map(|(k, v)| (k, v / n)).collect(),
        per_query,
    }
}

fn is_relevant(eval_query: &EvalQuery, doc_id: &str) -> bool {
    eval_query.relevant_ids.contains(doc_id) || eval_query.graded_relevance.contains_key(doc_id)
}

fn relevance_of(eval_query: &EvalQuery, doc_id: &str) -> f64 {
    if let Some(&grade) = eval_query.graded_relevance.get(doc_id) {
        grade as f64
    } else if eval_query.relevant_ids.contains(doc_id) {
        1.0
    } else {
        0.0
    }
}

fn evaluate_single(eval_query: &EvalQuery, results: &[EvalResult], k_values: &[usize]) -> QueryMetrics {
    let num_relevant = if eval_query.graded_relevance.is_empty() {
        eval_query.relevant_ids.len()
    } else {
        eval_query.graded_relevance.len()
    };

    let reciprocal_rank = results
        .iter()
        .position(|r| is_relevant(eval_query, &r.doc_id))
        .map(|idx| 1.0 / (idx as f64 + 1.0))
        .unwrap_or(0.0);

    let mut recall_at_k = HashMap::new();
    let mut precision_at_k = HashMap::new();
    let mut ndcg_at_k = HashMap::new();
    let mut num_retrieved_relevant = 0usize;

    for &k in k_values {
        let top_k = &results[..results.len().min(k)];
        let retrieved_relevant = top_k.iter().filter(|r| is_relevant(eval_query, &r.doc_id)).count();
        num_retrieved_relevant = num_retrieved_relevant.max(retrieved_relevant);

        let recall = if num_relevant == 0 { 0.0 } else { retrieved_relevant as f64 / num_relevant as f64 };
        let precision = if top_k.is_empty() { 0.0 } else { retrieved_relevant as f64 / top_k.len() as f64 };
        recall_at_k.insert(k, recall);
        precision_at_k.insert(k, precision);

        let dcg: f64 = top_k
            .iter()
            .enumerate()
            .map(|(i, r)| relevance_of(eval_query, &r.doc_id) / ((i as f64 + 2.0).log2()))
            .sum();

        let mut ideal_gains: Vec<f64> = if eval_query.graded_relevance.is_empty() {
            eval_query.relevant_ids.iter().map(|_| 1.0).collect()
        } else {
            eval_query.graded_relevance.values().copied().map(f64::from).collect()
        };
        ideal_gains.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
        let idcg: f64 = ideal_gains
            .iter()
            .take(k)
            .enumerate()
            .map(|(i, &g)| g / ((i as f64 + 2.0).log2()))
            .sum();

        ndcg_at_k.insert(k, if idcg > 0.0 { dcg / idcg } else { 0.0 });
    }

    QueryMetrics {
        reciprocal_rank,
        recall_at_k,
        precision_at_k,
        ndcg_at_k,
        num_relevant,
        num_retrieved_relevant,
    }
}
