//! Risk and threat-assessment scoring parameters.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Operational Risk Score parameters.
///
/// The multiplicative core is
/// `keyword_weight * frequency_factor * source_credibility * base_multiplier`
/// plus a weighted recency term; contextual factors are additive bonuses
/// with fixed per-factor caps so no single contextual signal can
/// dominate the core term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Multiplier applied to the keyword/frequency/credibility product.
    pub base_multiplier: f64,
    /// Weight applied to the recency factor.
    pub recency_weight: f64,
    /// Recency decays linearly to the floor over this window.
    pub recency_window_hours: f64,
    /// Floor for the recency factor.
    pub recency_floor: f64,
    /// Additive boost per keyword category.
    pub category_boosts: BTreeMap<String, f64>,
    /// Caps for the additive contextual factors.
    pub category_cap: f64,
    pub proximity_cap: f64,
    pub event_cap: f64,
    pub poi_cap: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let mut category_boosts = BTreeMap::new();
        category_boosts.insert("protective_intel".to_string(), 10.0);
        category_boosts.insert("poi".to_string(), 9.0);
        category_boosts.insert("insider_workplace".to_string(), 8.0);
        category_boosts.insert("protest_disruption".to_string(), 7.0);
        category_boosts.insert("travel_risk".to_string(), 6.0);
        category_boosts.insert("threat_actor".to_string(), 2.5);
        category_boosts.insert("malware".to_string(), 2.5);
        category_boosts.insert("vulnerability".to_string(), 2.5);
        category_boosts.insert("cti_optional".to_string(), 2.0);
        category_boosts.insert("ioc".to_string(), 1.5);

        ScoringConfig {
            base_multiplier: 20.0,
            recency_weight: 10.0,
            recency_window_hours: 168.0,
            recency_floor: 0.1,
            category_boosts,
            category_cap: 10.0,
            proximity_cap: 15.0,
            event_cap: 8.0,
            poi_cap: 12.0,
        }
    }
}

/// Threat Assessment Score flag weights.
///
/// Five independent behavioral flags; the TAS is their weighted sum,
/// bounded to 0-100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TasConfig {
    pub fixation_weight: f64,
    pub energy_burst_weight: f64,
    pub leakage_weight: f64,
    pub pathway_weight: f64,
    pub targeting_weight: f64,
    /// Z-score threshold for the energy-burst flag.
    pub energy_z_threshold: f64,
    /// Minimum distinct days of same-subject mentions for fixation.
    pub fixation_min_days: usize,
}

impl Default for TasConfig {
    fn default() -> Self {
        TasConfig {
            fixation_weight: 25.0,
            energy_burst_weight: 20.0,
            leakage_weight: 20.0,
            pathway_weight: 20.0,
            targeting_weight: 15.0,
            energy_z_threshold: 2.0,
            fixation_min_days: 2,
        }
    }
}

impl TasConfig {
    /// Maximum attainable TAS under this configuration.
    pub fn max_score(&self) -> f64 {
        (self.fixation_weight
            + self.energy_burst_weight
            + self.leakage_weight
            + self.pathway_weight
            + self.targeting_weight)
            .min(100.0)
    }
}
