//! Additive contextual score factors.
//!
//! Signals from contextual collaborators (protected-location distance,
//! scheduled-event adjacency, matched protectees) each contribute a
//! bounded additive bonus. The caps live in [`ScoringConfig`] so no
//! single contextual signal can dominate the multiplicative core.

use at_config::ScoringConfig;
use serde::{Deserialize, Serialize};

/// Distance of an alert's resolved location to one protected location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProximitySignal {
    pub distance_miles: f64,
    /// Whether the location fell inside the protected radius.
    pub within_radius: bool,
}

/// Contextual inputs for one scoring pass, resolved upstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreContext {
    /// Distances to protected locations, if the alert geocoded.
    pub proximity: Vec<ProximitySignal>,
    /// Distances (miles) to scheduled events inside the lookahead
    /// window.
    pub upcoming_event_distances_miles: Vec<f64>,
    /// Number of protectee/POI matches in the alert text.
    pub poi_hit_count: u32,
}

/// Additive boost for the keyword's category.
pub fn category_factor(category: &str, config: &ScoringConfig) -> f64 {
    let key = category.trim().to_lowercase();
    config
        .category_boosts
        .get(&key)
        .copied()
        .unwrap_or(0.0)
        .min(config.category_cap)
}

/// Additive boost for proximity to a protected location.
pub fn proximity_factor(context: &ScoreContext, config: &ScoringConfig) -> f64 {
    if context.proximity.is_empty() {
        return 0.0;
    }
    if context.proximity.iter().any(|p| p.within_radius) {
        return config.proximity_cap;
    }
    let min_distance = context
        .proximity
        .iter()
        .map(|p| p.distance_miles)
        .fold(f64::INFINITY, f64::min);
    let factor: f64 = if min_distance <= 5.0 {
        10.0
    } else if min_distance <= 15.0 {
        6.0
    } else if min_distance <= 30.0 {
        3.0
    } else {
        0.0
    };
    factor.min(config.proximity_cap)
}

/// Additive boost for adjacency to an upcoming scheduled event.
pub fn event_factor(context: &ScoreContext, config: &ScoringConfig) -> f64 {
    if context.upcoming_event_distances_miles.is_empty() {
        return 0.0;
    }
    let min_distance = context
        .upcoming_event_distances_miles
        .iter()
        .copied()
        .fold(f64::INFINITY, f64::min);
    let factor: f64 = if min_distance <= 10.0 {
        8.0
    } else if min_distance <= 25.0 {
        4.0
    } else {
        0.0
    };
    factor.min(config.event_cap)
}

/// Additive boost for protectee/POI mentions.
pub fn poi_factor(context: &ScoreContext, config: &ScoringConfig) -> f64 {
    if context.poi_hit_count == 0 {
        return 0.0;
    }
    (6.0 + context.poi_hit_count as f64 * 2.0).min(config.poi_cap)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_category_contributes_nothing() {
        let config = ScoringConfig::default();
        assert_eq!(category_factor("unheard_of", &config), 0.0);
        assert_eq!(category_factor("", &config), 0.0);
    }

    #[test]
    fn category_lookup_normalizes_case() {
        let config = ScoringConfig::default();
        assert_eq!(category_factor(" Protective_Intel ", &config), 10.0);
    }

    #[test]
    fn within_radius_hits_the_cap() {
        let config = ScoringConfig::default();
        let context = ScoreContext {
            proximity: vec![ProximitySignal {
                distance_miles: 40.0,
                within_radius: true,
            }],
            ..Default::default()
        };
        assert_eq!(proximity_factor(&context, &config), 15.0);
    }

    #[test]
    fn proximity_tiers_step_down_with_distance() {
        let config = ScoringConfig::default();
        let at = |miles: f64| ScoreContext {
            proximity: vec![ProximitySignal {
                distance_miles: miles,
                within_radius: false,
            }],
            ..Default::default()
        };
        assert_eq!(proximity_factor(&at(3.0), &config), 10.0);
        assert_eq!(proximity_factor(&at(12.0), &config), 6.0);
        assert_eq!(proximity_factor(&at(28.0), &config), 3.0);
        assert_eq!(proximity_factor(&at(100.0), &config), 0.0);
        assert_eq!(proximity_factor(&ScoreContext::default(), &config), 0.0);
    }

    #[test]
    fn event_factor_uses_nearest_event() {
        let config = ScoringConfig::default();
        let context = ScoreContext {
            upcoming_event_distances_miles: vec![60.0, 9.0, 22.0],
            ..Default::default()
        };
        assert_eq!(event_factor(&context, &config), 8.0);
        assert_eq!(event_factor(&ScoreContext::default(), &config), 0.0);
    }

    #[test]
    fn poi_factor_saturates_at_cap() {
        let config = ScoringConfig::default();
        let with = |count: u32| ScoreContext {
            poi_hit_count: count,
            ..Default::default()
        };
        assert_eq!(poi_factor(&with(0), &config), 0.0);
        assert_eq!(poi_factor(&with(1), &config), 8.0);
        assert_eq!(poi_factor(&with(2), &config), 10.0);
        assert_eq!(poi_factor(&with(10), &config), 12.0);
    }
}
