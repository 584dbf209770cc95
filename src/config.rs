use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::RseError;

/// Tunable parameters for [`crate::extract_segments`].
///
/// Mirrors the host RAG engine's `RAGConfig`: a plain, `serde`-serializable
/// struct with a sensible [`Default`] and a [`RseParams::validate`] boundary
/// check, rather than a free-form option bag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RseParams {
    /// Cap on chunks per segment.
    pub max_length: usize,
    /// Base total-chunk budget across all returned segments, before the
    /// per-extra-query extension in [`RseParams::effective_overall_max_length`].
    pub overall_max_length: usize,
    /// Added to the budget for each query beyond the first.
    pub overall_max_length_extension: usize,
    /// Per-segment score floor; a candidate scoring below this is rejected.
    pub minimum_value: f32,
    /// Per-chunk subtractive penalty in `[0, 1]`. Higher values shorten
    /// segments: see the penalty/length table in the module docs.
    pub irrelevant_chunk_penalty: f32,
    /// Rank-decay time constant.
    pub decay_rate: usize,
    /// Number of top-ranked documents considered per query when building the
    /// meta-document.
    pub top_k_for_document_selection: usize,
}

impl Default for RseParams {
    fn default() -> Self {
        Self {
            max_length: 12,
            overall_max_length: 30,
            overall_max_length_extension: 6,
            minimum_value: 0.7,
            irrelevant_chunk_penalty: 0.18,
            decay_rate: 20,
            top_k_for_document_selection: 7,
        }
    }
}

impl RseParams {
    /// The profile used for the FinanceBench evaluation harness (§6).
    pub fn finance_bench() -> Self {
        Self {
            max_length: 10,
            overall_max_length: 20,
            overall_max_length_extension: 5,
            minimum_value: 0.8,
            irrelevant_chunk_penalty: 0.18,
            ..Self::default()
        }
    }

    /// Validate parameter domains, rejecting clearly broken configurations
    /// at the boundary instead of letting them misbehave downstream.
    pub fn validate(&self) -> Result<(), RseError> {
        if self.max_length == 0 {
            return Err(RseError::InvalidParameter {
                name: "max_length",
                reason: "must be > 0".into(),
            });
        }
        if self.overall_max_length == 0 {
            return Err(RseError::InvalidParameter {
                name: "overall_max_length",
                reason: "must be > 0".into(),
            });
        }
        if self.decay_rate == 0 {
            return Err(RseError::InvalidParameter {
                name: "decay_rate",
                reason: "must be > 0".into(),
            });
        }
        if self.top_k_for_document_selection == 0 {
            return Err(RseError::InvalidParameter {
                name: "top_k_for_document_selection",
                reason: "must be > 0".into(),
            });
        }
        if !(0.0..=1.0).contains(&self.irrelevant_chunk_penalty) {
            return Err(RseError::InvalidParameter {
                name: "irrelevant_chunk_penalty",
                reason: "must be in [0, 1]".into(),
            });
        }
        Ok(())
    }

    /// The total-chunk budget actually enforced by the optimizer once the
    /// per-extra-query extension (§4.C) is applied.
    pub fn effective_overall_max_length(&self, num_queries: usize) -> usize {
        let extra_queries = num_queries.saturating_sub(1);
        self.overall_max_length + extra_queries * self.overall_max_length_extension
    }

    /// Parse parameters from a JSON document, validating before returning —
    /// the same from-file-then-validate shape as the host engine's
    /// `RAGConfig::from_file`, minus the filesystem read (the core takes the
    /// document as a string so it stays free of any I/O dependency).
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let params: Self = serde_json::from_str(json).context("failed to parse RseParams JSON")?;
        params.validate()?;
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_table() {
        let p = RseParams::default();
        assert_eq!(p.max_length, 12);
        assert_eq!(p.overall_max_length, 30);
        assert_eq!(p.overall_max_length_extension, 6);
        assert_eq!(p.minimum_value, 0.7);
        assert_eq!(p.irrelevant_chunk_penalty, 0.18);
        assert_eq!(p.decay_rate, 20);
        assert_eq!(p.top_k_for_document_selection, 7);
    }

    #[test]
    fn effective_budget_extends_per_extra_query() {
        let p = RseParams::default();
        assert_eq!(p.effective_overall_max_length(1), 30);
        assert_eq!(p.effective_overall_max_length(3), 30 + 2 * 6);
    }

    #[test]
    fn rejects_zero_max_length() {
        let mut p = RseParams::default();
        p.max_length = 0;
        assert!(p.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_penalty() {
        let mut p = RseParams::default();
        p.irrelevant_chunk_penalty = 1.5;
        assert!(p.validate().is_err());
    }

    #[test]
    fn from_json_str_round_trips_and_validates() {
        let json = serde_json::to_string(&RseParams::finance_bench()).unwrap();
        let parsed = RseParams::from_json_str(&json).unwrap();
        assert_eq!(parsed, RseParams::finance_bench());
    }

    #[test]
    fn from_json_str_rejects_invalid_values() {
        let json = r#"{"max_length":0,"overall_max_length":30,"overall_max_length_extension":6,"minimum_value":0.7,"irrelevant_chunk_penalty":0.18,"decay_rate":20,"top_k_for_document_selection":7}"#;
        assert!(RseParams::from_json_str(json).is_err());
    }

    #[test]
    fn finance_bench_profile_matches_spec() {
        let p = RseParams::finance_bench();
        assert_eq!(p.max_length, 10);
        assert_eq!(p.overall_max_length, 20);
        assert_eq!(p.overall_max_length_extension, 5);
        assert_eq!(p.irrelevant_chunk_penalty, 0.18);
        assert_eq!(p.minimum_value, 0.8);
    }
}
