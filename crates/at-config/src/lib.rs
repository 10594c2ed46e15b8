//! Alert Triage configuration.
//!
//! Every computation in the core takes an immutable configuration
//! snapshot as an explicit argument; there is no ambient global state.
//! Deployments deserialize one `EngineConfig` and pass it (or its
//! sections) into the engines.

pub mod correlation;
pub mod detection;
pub mod scoring;
pub mod validate;

pub use correlation::{CorrelationConfig, EvidenceWeights};
pub use detection::{DedupConfig, FrequencyConfig, UncertaintyConfig};
pub use scoring::{ScoringConfig, TasConfig};
pub use validate::{
    validate_config, validate_keyword, KEYWORD_WEIGHT_MAX, KEYWORD_WEIGHT_MIN,
};

use serde::{Deserialize, Serialize};

/// Schema version for serialized configuration snapshots.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";

/// Complete engine configuration snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub schema_version: String,

    /// Symmetric, mildly informative Beta prior for new sources.
    /// Avoids zero/one credibility on the first observation.
    pub credibility_prior_alpha: f64,
    pub credibility_prior_beta: f64,

    /// Bounded optimistic-retry budget for concurrent credibility
    /// updates; exhaustion surfaces an error instead of spinning.
    pub max_update_retries: u32,

    pub scoring: ScoringConfig,
    pub tas: TasConfig,
    pub frequency: FrequencyConfig,
    pub dedup: DedupConfig,
    pub uncertainty: UncertaintyConfig,
    pub correlation: CorrelationConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            schema_version: CONFIG_SCHEMA_VERSION.to_string(),
            credibility_prior_alpha: 2.0,
            credibility_prior_beta: 2.0,
            max_update_retries: 8,
            scoring: ScoringConfig::default(),
            tas: TasConfig::default(),
            frequency: FrequencyConfig::default(),
            dedup: DedupConfig::default(),
            uncertainty: UncertaintyConfig::default(),
            correlation: CorrelationConfig::default(),
        }
    }
}
