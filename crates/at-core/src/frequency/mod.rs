//! Keyword frequency anomaly detection.
//!
//! A keyword's activity baseline is its last 7 days of daily match
//! counts, excluding today. Today's count is compared to that baseline
//! with a population Z-score (std floored at 0.5 to keep near-constant
//! low-volume keywords from exploding), then mapped to a bounded
//! multiplier by piecewise-linear interpolation. With under 3 days of
//! history the detector takes a distinct fallback path: a simple ratio
//! against the mean so far.
//!
//! Given the same bucket history, every function here is pure and
//! reproducible.

use at_common::{Keyword, KeywordId};
use at_config::FrequencyConfig;
use at_math::{mean, population_std};
use serde::{Deserialize, Serialize};

/// How a frequency factor was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyMethod {
    /// Z-score against a full baseline.
    ZScore,
    /// Ratio fallback under `min_history_days` of history.
    Ratio,
}

/// Frequency factor plus the statistics behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencySignal {
    /// Spike multiplier in [1.0, factor_cap] for the z path; the ratio
    /// path is floored at 1.0 but uncapped.
    pub factor: f64,
    /// Z-score, absent on the ratio fallback path.
    pub z_score: Option<f64>,
    pub baseline_mean: f64,
    pub method: FrequencyMethod,
}

/// Population Z-score of `today` against `baseline`, with std floor.
pub fn z_score(baseline: &[f64], today: f64, std_floor: f64) -> f64 {
    let std = population_std(baseline).max(std_floor);
    (today - mean(baseline)) / std
}

/// Map a Z-score to a spike multiplier.
///
/// z <= 0 -> 1.0; z >= z_cap -> factor_cap; linear in between.
pub fn factor_from_z(z: f64, config: &FrequencyConfig) -> f64 {
    if z <= 0.0 {
        return 1.0;
    }
    if z >= config.z_cap {
        return config.factor_cap;
    }
    1.0 + (config.factor_cap - 1.0) * z / config.z_cap
}

/// Compute the frequency signal for a keyword.
///
/// `baseline` holds the daily counts observed inside the rolling
/// window, excluding today; absent days are absent, not zero-filled.
pub fn frequency_signal(
    baseline: &[u32],
    today_count: u32,
    config: &FrequencyConfig,
) -> FrequencySignal {
    let counts: Vec<f64> = baseline.iter().map(|c| *c as f64).collect();
    let baseline_mean = mean(&counts);

    if counts.len() < config.min_history_days {
        // Insufficient sample for a stable std estimate.
        let factor = (today_count as f64 / baseline_mean.max(1.0)).max(1.0);
        return FrequencySignal {
            factor,
            z_score: None,
            baseline_mean,
            method: FrequencyMethod::Ratio,
        };
    }

    let z = z_score(&counts, today_count as f64, config.std_floor);
    FrequencySignal {
        factor: factor_from_z(z, config),
        z_score: Some(z),
        baseline_mean,
        method: FrequencyMethod::ZScore,
    }
}

/// Convenience wrapper returning only the multiplier.
pub fn frequency_factor(baseline: &[u32], today_count: u32, config: &FrequencyConfig) -> f64 {
    frequency_signal(baseline, today_count, config).factor
}

/// One keyword flagged by the spike scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpikeReport {
    pub keyword_id: KeywordId,
    pub term: String,
    pub category: String,
    pub today_count: u32,
    pub baseline_mean: f64,
    pub spike_ratio: f64,
    pub z_score: Option<f64>,
}

/// Scan keyword histories for unusual activity.
///
/// Flags keywords whose today count exceeds their baseline mean by at
/// least `threshold_ratio`, sorted by ratio descending (ties broken by
/// term for determinism).
pub fn detect_spikes(
    histories: &[(Keyword, Vec<u32>, u32)],
    threshold_ratio: f64,
    config: &FrequencyConfig,
) -> Vec<SpikeReport> {
    let mut spikes: Vec<SpikeReport> = histories
        .iter()
        .filter_map(|(keyword, baseline, today_count)| {
            let signal = frequency_signal(baseline, *today_count, config);
            let ratio = *today_count as f64 / signal.baseline_mean.max(1.0);
            if ratio < threshold_ratio {
                return None;
            }
            Some(SpikeReport {
                keyword_id: keyword.id,
                term: keyword.term.clone(),
                category: keyword.category.clone(),
                today_count: *today_count,
                baseline_mean: signal.baseline_mean,
                spike_ratio: ratio,
                z_score: signal.z_score,
            })
        })
        .collect();
    spikes.sort_by(|a, b| {
        b.spike_ratio
            .partial_cmp(&a.spike_ratio)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.term.cmp(&b.term))
    });
    spikes
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn constant_history_uses_std_floor() {
        let config = FrequencyConfig::default();
        let signal = frequency_signal(&[2, 2, 2, 2, 2, 2, 2], 10, &config);
        // std is 0, floored to 0.5: z = (10 - 2) / 0.5 = 16, clamps at cap.
        assert_eq!(signal.method, FrequencyMethod::ZScore);
        assert_eq!(signal.z_score, Some(16.0));
        assert_eq!(signal.factor, 4.0);
    }

    #[test]
    fn quiet_day_maps_to_unit_factor() {
        let config = FrequencyConfig::default();
        let signal = frequency_signal(&[5, 6, 5, 7, 6, 5, 6], 4, &config);
        assert!(signal.z_score.unwrap() < 0.0);
        assert_eq!(signal.factor, 1.0);
    }

    #[test]
    fn factor_interpolates_between_bounds() {
        let config = FrequencyConfig::default();
        assert_eq!(factor_from_z(0.0, &config), 1.0);
        assert_eq!(factor_from_z(4.0, &config), 4.0);
        assert_eq!(factor_from_z(2.0, &config), 2.5);
        assert_eq!(factor_from_z(-3.0, &config), 1.0);
        assert_eq!(factor_from_z(9.0, &config), 4.0);
    }

    #[test]
    fn short_history_takes_ratio_fallback() {
        let config = FrequencyConfig::default();
        let signal = frequency_signal(&[1, 2], 6, &config);
        assert_eq!(signal.method, FrequencyMethod::Ratio);
        assert_eq!(signal.z_score, None);
        assert_eq!(signal.factor, 4.0); // 6 / 1.5
    }

    #[test]
    fn empty_history_ratio_uses_count_floor() {
        let config = FrequencyConfig::default();
        let signal = frequency_signal(&[], 3, &config);
        assert_eq!(signal.method, FrequencyMethod::Ratio);
        assert_eq!(signal.factor, 3.0); // 3 / max(0, 1)
    }

    #[test]
    fn ratio_fallback_floors_at_one() {
        let config = FrequencyConfig::default();
        let signal = frequency_signal(&[9, 9], 1, &config);
        assert_eq!(signal.factor, 1.0);
    }

    #[test]
    fn spike_scan_sorts_by_ratio() {
        let config = FrequencyConfig::default();
        let kw = |term: &str| Keyword {
            id: KeywordId::new(),
            term: term.into(),
            weight: 1.0,
            category: "ioc".into(),
        };
        let histories = vec![
            (kw("quiet"), vec![5, 5, 5, 5, 5, 5, 5], 5),
            (kw("loud"), vec![1, 1, 1, 1, 1, 1, 1], 9),
            (kw("medium"), vec![2, 2, 2, 2, 2, 2, 2], 6),
        ];
        let spikes = detect_spikes(&histories, 2.0, &config);
        assert_eq!(spikes.len(), 2);
        assert_eq!(spikes[0].term, "loud");
        assert_eq!(spikes[0].spike_ratio, 9.0);
        assert_eq!(spikes[1].term, "medium");
    }

    proptest! {
        #[test]
        fn factor_is_always_bounded_on_z_path(
            baseline in prop::collection::vec(0u32..50, 3..14),
            today in 0u32..500,
        ) {
            let config = FrequencyConfig::default();
            let signal = frequency_signal(&baseline, today, &config);
            prop_assert!(signal.factor >= 1.0);
            prop_assert!(signal.factor <= config.factor_cap);
            prop_assert!(signal.factor.is_finite());
        }
    }
}
