//! Correlation/threading windows, thresholds, and evidence weights.

use serde::{Deserialize, Serialize};

/// Per-reason-code evidence weights.
///
/// Each co-firing piece of evidence contributes its weight to the pair
/// score, which is then clamped to [0, 1]. Weights are sized so that a
/// single weak signal stays below the default edge threshold while any
/// strong signal, or two weak ones, crosses it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvidenceWeights {
    pub shared_actor_handle: f64,
    pub shared_poi_hit: f64,
    pub shared_non_actor_entity: f64,
    pub matched_term_temporal_overlap: f64,
    pub shared_source_fingerprint: f64,
    pub cross_source_corroboration: f64,
    pub tight_temporal_proximity: f64,
    pub linguistic_overlap_medium: f64,
    pub linguistic_overlap_high: f64,
}

impl Default for EvidenceWeights {
    fn default() -> Self {
        EvidenceWeights {
            shared_actor_handle: 0.45,
            shared_poi_hit: 0.40,
            shared_non_actor_entity: 0.30,
            matched_term_temporal_overlap: 0.25,
            shared_source_fingerprint: 0.15,
            cross_source_corroboration: 0.15,
            tight_temporal_proximity: 0.10,
            linguistic_overlap_medium: 0.10,
            linguistic_overlap_high: 0.20,
        }
    }
}

/// Correlation engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrelationConfig {
    /// Sliding window for pairwise evaluation.
    pub window_hours: f64,
    /// Tighter window for matched-term temporal overlap.
    pub term_overlap_hours: f64,
    /// Sub-window for the tight-temporal-proximity bonus.
    pub tight_proximity_hours: f64,
    /// Similarity bands for the linguistic-overlap bonus.
    pub linguistic_medium_threshold: f64,
    pub linguistic_high_threshold: f64,
    /// Minimum pair score for a pair to count as linked.
    pub edge_threshold: f64,
    /// Components below this size are not reported as threads.
    pub min_cluster_size: usize,
    /// Alert-count cap per window; excess input is truncated
    /// most-recent-first with a reported flag.
    pub max_alerts: usize,
    /// Total pairwise-evaluation budget per run.
    pub max_pair_checks: usize,
    /// Maximum threads returned, highest-risk first.
    pub max_threads: usize,
    pub evidence: EvidenceWeights,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        CorrelationConfig {
            window_hours: 72.0,
            term_overlap_hours: 24.0,
            tight_proximity_hours: 6.0,
            linguistic_medium_threshold: 0.5,
            linguistic_high_threshold: 0.75,
            edge_threshold: 0.35,
            min_cluster_size: 2,
            max_alerts: 500,
            max_pair_checks: 25_000,
            max_threads: 50,
            evidence: EvidenceWeights::default(),
        }
    }
}
