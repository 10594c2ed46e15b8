//! Semantic validation for configuration snapshots and keyword input.
//!
//! Out-of-range values are rejected at the boundary; the core never
//! silently coerces them.

use crate::EngineConfig;
use at_common::{Error, Keyword, Result};

/// Valid keyword weight range, shared with the uncertainty sampler's
/// re-clamp of perturbed weights.
pub const KEYWORD_WEIGHT_MIN: f64 = 0.1;
pub const KEYWORD_WEIGHT_MAX: f64 = 5.0;

/// Validate a keyword configuration snapshot before scoring with it.
pub fn validate_keyword(keyword: &Keyword) -> Result<()> {
    if !keyword.weight.is_finite()
        || keyword.weight < KEYWORD_WEIGHT_MIN
        || keyword.weight > KEYWORD_WEIGHT_MAX
    {
        return Err(Error::InvalidKeywordWeight {
            term: keyword.term.clone(),
            weight: keyword.weight,
        });
    }
    Ok(())
}

/// Validate an engine configuration snapshot.
pub fn validate_config(config: &EngineConfig) -> Result<()> {
    if config.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(Error::Config(format!(
            "schema version mismatch: expected {}, got {}",
            crate::CONFIG_SCHEMA_VERSION,
            config.schema_version
        )));
    }
    if config.credibility_prior_alpha <= 0.0 || config.credibility_prior_beta <= 0.0 {
        return Err(Error::InvalidPosterior {
            alpha: config.credibility_prior_alpha,
            beta: config.credibility_prior_beta,
        });
    }
    if config.max_update_retries == 0 {
        return Err(Error::Config(
            "max_update_retries must be at least 1".to_string(),
        ));
    }
    if config.frequency.std_floor <= 0.0 {
        return Err(Error::Config(
            "frequency.std_floor must be positive".to_string(),
        ));
    }
    if config.frequency.z_cap <= 0.0 || config.frequency.factor_cap < 1.0 {
        return Err(Error::Config(
            "frequency z_cap must be positive and factor_cap at least 1.0".to_string(),
        ));
    }
    if !(0.0..=1.0).contains(&config.dedup.fuzzy_threshold) {
        return Err(Error::Config(format!(
            "dedup.fuzzy_threshold must be in [0, 1], got {}",
            config.dedup.fuzzy_threshold
        )));
    }
    if config.dedup.max_candidates == 0 {
        return Err(Error::Config(
            "dedup.max_candidates must be at least 1".to_string(),
        ));
    }
    if config.uncertainty.default_samples == 0
        || config.uncertainty.default_samples > config.uncertainty.max_samples
    {
        return Err(Error::Config(format!(
            "uncertainty.default_samples must be in 1..={}, got {}",
            config.uncertainty.max_samples, config.uncertainty.default_samples
        )));
    }
    if config.uncertainty.keyword_sigma < 0.0 || config.uncertainty.frequency_jitter < 0.0 {
        return Err(Error::Config(
            "uncertainty perturbation parameters must be non-negative".to_string(),
        ));
    }
    if !(0.0..=1.0).contains(&config.correlation.edge_threshold) {
        return Err(Error::Config(format!(
            "correlation.edge_threshold must be in [0, 1], got {}",
            config.correlation.edge_threshold
        )));
    }
    if config.correlation.min_cluster_size < 2 {
        return Err(Error::Config(
            "correlation.min_cluster_size must be at least 2".to_string(),
        ));
    }
    if config.correlation.max_alerts == 0 || config.correlation.max_pair_checks == 0 {
        return Err(Error::Config(
            "correlation input caps must be at least 1".to_string(),
        ));
    }
    let weights = [
        config.correlation.evidence.shared_actor_handle,
        config.correlation.evidence.shared_poi_hit,
        config.correlation.evidence.shared_non_actor_entity,
        config.correlation.evidence.matched_term_temporal_overlap,
        config.correlation.evidence.shared_source_fingerprint,
        config.correlation.evidence.cross_source_corroboration,
        config.correlation.evidence.tight_temporal_proximity,
        config.correlation.evidence.linguistic_overlap_medium,
        config.correlation.evidence.linguistic_overlap_high,
    ];
    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err(Error::Config(
            "correlation evidence weights must be finite and non-negative".to_string(),
        ));
    }
    Ok(())
}
