//! Property-based tests for scoring and credibility invariants.

use at_common::{
    Alert, AlertId, FeedbackOutcome, Keyword, KeywordId, Severity, Source, SourceId,
};
use at_config::{EngineConfig, FrequencyConfig, ScoringConfig, UncertaintyConfig};
use at_core::credibility;
use at_core::frequency::frequency_signal;
use at_core::scoring::{score_alert, ScoreContext};
use at_core::store::MemorySourceStore;
use at_core::uncertainty::{score_interval, IntervalInputs};
use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

fn test_alert(hours_old: i64) -> Alert {
    let now = Utc.with_ymd_and_hms(2026, 8, 20, 12, 0, 0).unwrap();
    Alert {
        id: AlertId::new(),
        title: "headline".into(),
        content: "body".into(),
        source_id: SourceId::new(),
        published_at: now - Duration::hours(hours_old),
        content_hash: String::new(),
        matched_term: None,
        entities: Default::default(),
        is_duplicate_of: None,
    }
}

proptest! {
    #[test]
    fn ors_is_always_in_band_and_severity_matches(
        weight in 0.1f64..=5.0,
        credibility in 0.001f64..0.999,
        factor in 1.0f64..=4.0,
        hours_old in 0i64..1000,
    ) {
        let config = ScoringConfig::default();
        let now = Utc.with_ymd_and_hms(2026, 8, 20, 12, 0, 0).unwrap();
        let keyword = Keyword {
            id: KeywordId::new(),
            term: "term".into(),
            weight,
            category: "ioc".into(),
        };
        let breakdown = score_alert(
            &test_alert(hours_old),
            &keyword,
            credibility,
            factor,
            &ScoreContext::default(),
            &config,
            now,
        )
        .unwrap();

        prop_assert!((0.0..=100.0).contains(&breakdown.final_score));
        prop_assert_eq!(breakdown.severity, Severity::from_score(breakdown.final_score));
        prop_assert!(breakdown.recency_factor >= config.recency_floor);
        prop_assert!(breakdown.recency_factor <= 1.0);
    }

    #[test]
    fn credibility_stays_in_open_unit_interval_under_any_feedback(
        outcomes in prop::collection::vec(prop::bool::ANY, 0..40),
    ) {
        let config = EngineConfig::default();
        let source = Source {
            id: SourceId::new(),
            name: "feed".into(),
            source_type: "rss".into(),
            credibility_alpha: config.credibility_prior_alpha,
            credibility_beta: config.credibility_prior_beta,
        };
        let store = MemorySourceStore::with_sources([source.clone()]);

        let mut previous = credibility::credibility(&source).unwrap();
        for is_true_positive in outcomes {
            let outcome = if is_true_positive {
                FeedbackOutcome::TruePositive
            } else {
                FeedbackOutcome::FalsePositive
            };
            let updated =
                credibility::classify_feedback(&store, source.id, outcome, 8).unwrap();
            let current = credibility::credibility(&updated).unwrap();
            prop_assert!(current > 0.0 && current < 1.0);
            if is_true_positive {
                prop_assert!(current > previous);
            } else {
                prop_assert!(current < previous);
            }
            previous = current;
        }
    }

    #[test]
    fn frequency_factor_never_divides_by_zero(
        baseline in prop::collection::vec(0u32..100, 0..14),
        today in 0u32..1000,
    ) {
        let config = FrequencyConfig::default();
        let signal = frequency_signal(&baseline, today, &config);
        prop_assert!(signal.factor.is_finite());
        prop_assert!(signal.factor >= 1.0);
    }

    #[test]
    fn intervals_are_ordered_for_any_posterior(
        alpha in 0.5f64..200.0,
        beta in 0.5f64..200.0,
        weight in 0.1f64..=5.0,
        factor in 1.0f64..=4.0,
        seed in prop::num::u64::ANY,
    ) {
        let inputs = IntervalInputs {
            keyword_weight: weight,
            frequency_factor: factor,
            credibility_alpha: alpha,
            credibility_beta: beta,
            recency_factor: 0.5,
            context_bonus: 0.0,
        };
        let interval = score_interval(
            &inputs,
            64,
            Some(seed),
            &ScoringConfig::default(),
            &UncertaintyConfig::default(),
        )
        .unwrap();
        prop_assert!(interval.p05 <= interval.p50);
        prop_assert!(interval.p50 <= interval.p95);
        prop_assert!(interval.std >= 0.0);
        prop_assert!(interval.p05 >= 0.0 && interval.p95 <= 100.0);
    }
}
