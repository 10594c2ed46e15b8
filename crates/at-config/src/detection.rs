//! Dedup, frequency-anomaly, and Monte Carlo sampling parameters.

use serde::{Deserialize, Serialize};

/// Deduplication thresholds and bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    /// Minimum fuzzy title-similarity ratio to mark a duplicate.
    pub fuzzy_threshold: f64,
    /// Cap on the same-day candidate pool, most-recent-first.
    pub max_candidates: usize,
    /// Normalized text is truncated to this many characters before
    /// hashing and comparison.
    pub normalized_prefix_chars: usize,
}

impl Default for DedupConfig {
    fn default() -> Self {
        DedupConfig {
            fuzzy_threshold: 0.85,
            max_candidates: 200,
            normalized_prefix_chars: 200,
        }
    }
}

/// Frequency anomaly detector parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrequencyConfig {
    /// Rolling baseline window, excluding today.
    pub window_days: u32,
    /// Floor on the baseline standard deviation; prevents explosive z
    /// on near-constant low-volume keywords.
    pub std_floor: f64,
    /// Z value at which the multiplier saturates.
    pub z_cap: f64,
    /// Multiplier at the z cap.
    pub factor_cap: f64,
    /// Below this many days of history, fall back to the simple ratio.
    pub min_history_days: usize,
}

impl Default for FrequencyConfig {
    fn default() -> Self {
        FrequencyConfig {
            window_days: 7,
            std_floor: 0.5,
            z_cap: 4.0,
            factor_cap: 4.0,
            min_history_days: 3,
        }
    }
}

/// Monte Carlo uncertainty-engine parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UncertaintyConfig {
    /// Samples drawn when the caller does not specify a count.
    pub default_samples: usize,
    /// Hard upper bound on the sampling loop.
    pub max_samples: usize,
    /// Std of the Normal perturbation applied to the keyword weight.
    pub keyword_sigma: f64,
    /// Half-width of the uniform relative jitter applied to the
    /// frequency factor, reflecting the z-score's sampling error.
    pub frequency_jitter: f64,
}

impl Default for UncertaintyConfig {
    fn default() -> Self {
        UncertaintyConfig {
            default_samples: 500,
            max_samples: 100_000,
            keyword_sigma: 0.25,
            frequency_jitter: 0.10,
        }
    }
}
