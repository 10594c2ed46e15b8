//! Integration tests for the ingest → score → interval → correlation
//! pipeline, driven through the engine facade.

use at_common::{
    Alert, AlertId, Entity, EntityType, FeedbackOutcome, Keyword, KeywordId, ReasonCode,
    Severity, Source, SourceId,
};
use at_config::EngineConfig;
use at_core::correlation::CorrelationAlert;
use at_core::scoring::ScoreContext;
use at_core::store::{MemoryFrequencyStore, MemorySourceStore, SourceStore};
use at_core::{CorrelationParams, NewAlert, TriageEngine};
use chrono::{DateTime, Duration, TimeZone, Utc};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 20, 12, 0, 0).unwrap()
}

fn engine() -> TriageEngine<MemorySourceStore, MemoryFrequencyStore> {
    TriageEngine::new(
        EngineConfig::default(),
        MemorySourceStore::new(),
        MemoryFrequencyStore::new(),
    )
    .expect("default config is valid")
}

fn seeded_engine(
    source: Source,
    keyword: &Keyword,
    baseline: &[(i64, u32)],
    today_count: u32,
) -> TriageEngine<MemorySourceStore, MemoryFrequencyStore> {
    let frequency = MemoryFrequencyStore::new();
    let today = now().date_naive();
    for (days_ago, count) in baseline {
        frequency.seed(keyword.id, [(today - Duration::days(*days_ago), *count)]);
    }
    frequency.seed(keyword.id, [(today, today_count)]);
    TriageEngine::new(
        EngineConfig::default(),
        MemorySourceStore::with_sources([source]),
        frequency,
    )
    .expect("default config is valid")
}

fn source(alpha: f64, beta: f64, source_type: &str) -> Source {
    Source {
        id: SourceId::new(),
        name: "feed".into(),
        source_type: source_type.into(),
        credibility_alpha: alpha,
        credibility_beta: beta,
    }
}

fn keyword(term: &str, weight: f64) -> Keyword {
    Keyword {
        id: KeywordId::new(),
        term: term.into(),
        weight,
        category: "uncategorized".into(),
    }
}

fn alert(source_id: SourceId, term: &str, published_at: DateTime<Utc>) -> Alert {
    Alert {
        id: AlertId::new(),
        title: format!("report about {term}"),
        content: "body".into(),
        source_id,
        published_at,
        content_hash: String::new(),
        matched_term: Some(term.into()),
        entities: Default::default(),
        is_duplicate_of: None,
    }
}

#[test]
fn spiking_credible_keyword_reaches_critical() {
    // keyword 4.0, baseline mean 1.0 with today 5 (z = 8, factor caps
    // at 4.0), near-certain source, fresh publish: the multiplicative
    // core alone is 4 * 4 * ~0.94 * 20 = ~301, clamped to 100.
    let src = source(16.0, 1.0, "vendor");
    let kw = keyword("supply chain attack", 4.0);
    let engine = seeded_engine(
        src.clone(),
        &kw,
        &[(7, 1), (6, 1), (5, 1), (4, 1), (3, 1), (2, 1), (1, 1)],
        5,
    );

    let breakdown = engine
        .score_alert(
            &alert(src.id, "supply chain attack", now()),
            &kw,
            &ScoreContext::default(),
            now(),
        )
        .unwrap();

    assert_eq!(breakdown.frequency_factor, 4.0);
    assert_eq!(breakdown.final_score, 100.0);
    assert_eq!(breakdown.severity, Severity::Critical);
}

#[test]
fn interval_brackets_the_point_score_and_is_ordered() {
    let src = source(6.0, 4.0, "rss");
    let kw = keyword("breach", 2.0);
    let engine = seeded_engine(
        src.clone(),
        &kw,
        &[(3, 2), (2, 2), (1, 2)],
        3,
    );
    let a = alert(src.id, "breach", now() - Duration::hours(12));

    let breakdown = engine
        .score_alert(&a, &kw, &ScoreContext::default(), now())
        .unwrap();
    let interval = engine
        .score_interval(&a, &breakdown, Some(2000), Some(42))
        .unwrap();

    assert!(interval.p05 <= interval.p50);
    assert!(interval.p50 <= interval.p95);
    assert!(interval.std >= 0.0);
    assert!(interval.p05 <= breakdown.final_score);
    assert!(breakdown.final_score <= interval.p95);

    // Same seed, same interval.
    let again = engine
        .score_interval(&a, &breakdown, Some(2000), Some(42))
        .unwrap();
    assert_eq!(interval, again);
}

#[test]
fn feedback_shifts_future_scores() {
    let src = source(2.0, 2.0, "forum");
    let kw = keyword("breach", 2.0);
    let engine = seeded_engine(
        src.clone(),
        &kw,
        &[(3, 2), (2, 2), (1, 2)],
        2,
    );
    let a = alert(src.id, "breach", now());

    let before = engine
        .score_alert(&a, &kw, &ScoreContext::default(), now())
        .unwrap();
    for _ in 0..4 {
        engine
            .classify_feedback(src.id, FeedbackOutcome::FalsePositive)
            .unwrap();
    }
    let after = engine
        .score_alert(&a, &kw, &ScoreContext::default(), now())
        .unwrap();

    assert!(after.source_credibility < before.source_credibility);
    assert!(after.final_score < before.final_score);
}

#[test]
fn duplicate_ingest_is_excluded_from_frequency_and_correlation() {
    let engine = engine();
    let src = engine.register_source("feed", "rss").unwrap();
    let kw = keyword("insider threat", 1.5);

    let first = engine
        .ingest(
            NewAlert {
                title: "Insider threat at plant 7".into(),
                content: "full report".into(),
                source_id: src.id,
                published_at: now(),
            },
            Some(&kw),
            &[],
        )
        .unwrap();
    let dup = engine
        .ingest(
            NewAlert {
                title: "Insider  threat at <b>plant 7</b>".into(),
                content: "full report".into(),
                source_id: src.id,
                published_at: now() + Duration::minutes(5),
            },
            Some(&kw),
            &[first.clone()],
        )
        .unwrap();
    assert_eq!(dup.is_duplicate_of, Some(first.id));

    let as_input = |a: &Alert| CorrelationAlert {
        alert: a.clone(),
        source_type: "rss".into(),
        ors: 60.0,
        tas: 0.0,
        poi_ids: Default::default(),
    };
    let report = engine
        .run_correlation(
            &[as_input(&first), as_input(&dup)],
            now() - Duration::days(1),
            now() + Duration::days(1),
            CorrelationParams::default(),
        )
        .unwrap();
    assert_eq!(report.alerts_considered, 1);
    assert!(report.threads.is_empty());
}

#[test]
fn shared_infrastructure_across_sources_forms_a_thread() {
    let engine = engine();
    let telemetry = engine.register_source("endpoint telemetry", "telemetry").unwrap();
    let vendor = engine.register_source("vendor intel", "vendor").unwrap();

    let shared = [
        Entity::new(EntityType::DeviceId, "lptp-553"),
        Entity::new(EntityType::VendorId, "sc-001"),
    ];
    let mut left = alert(telemetry.id, "exfil", now());
    let mut right = alert(vendor.id, "exfil", now() + Duration::minutes(10));
    left.title = "badge anomaly on device".into();
    right.title = "vendor flags staging host".into();
    left.matched_term = None;
    right.matched_term = None;
    left.entities.extend(shared.iter().cloned());
    right.entities.extend(shared.iter().cloned());

    let inputs = vec![
        CorrelationAlert {
            alert: left,
            source_type: telemetry.source_type.clone(),
            ors: 72.0,
            tas: 20.0,
            poi_ids: Default::default(),
        },
        CorrelationAlert {
            alert: right,
            source_type: vendor.source_type.clone(),
            ors: 55.0,
            tas: 0.0,
            poi_ids: Default::default(),
        },
    ];
    let report = engine
        .run_correlation(
            &inputs,
            now() - Duration::days(1),
            now() + Duration::days(1),
            CorrelationParams::default(),
        )
        .unwrap();

    assert_eq!(report.threads.len(), 1);
    let thread = &report.threads[0];
    assert_eq!(thread.member_alert_ids.len(), 2);
    assert!(thread.reason_codes.contains(&ReasonCode::SharedNonActorEntity));
    assert!(thread
        .reason_codes
        .contains(&ReasonCode::CrossSourceCorroboration));
    assert_eq!(thread.recommended_tier, Severity::High);
    assert_eq!(thread.max_ors, 72.0);
    assert_eq!(thread.max_tas, 20.0);
    assert_eq!(thread.pair_evidence.len(), 1);
}

#[test]
fn spike_scan_flags_bursting_keywords() {
    let frequency = MemoryFrequencyStore::new();
    let quiet = keyword("quiet term", 1.0);
    let loud = keyword("loud term", 1.0);
    let today = now().date_naive();
    for days_ago in 1..=7 {
        frequency.seed(quiet.id, [(today - Duration::days(days_ago), 5)]);
        frequency.seed(loud.id, [(today - Duration::days(days_ago), 1)]);
    }
    frequency.seed(quiet.id, [(today, 5)]);
    frequency.seed(loud.id, [(today, 8)]);

    let engine = TriageEngine::new(
        EngineConfig::default(),
        MemorySourceStore::new(),
        frequency,
    )
    .unwrap();
    let spikes = engine
        .detect_spikes(&[quiet, loud], today, 2.0)
        .unwrap();
    assert_eq!(spikes.len(), 1);
    assert_eq!(spikes[0].term, "loud term");
    assert_eq!(spikes[0].today_count, 8);
}

#[test]
fn concurrent_feedback_never_loses_increments() {
    use std::sync::Arc;

    let src = source(2.0, 2.0, "rss");
    let source_id = src.id;
    let store = Arc::new(MemorySourceStore::with_sources([src]));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                let outcome = if i % 2 == 0 {
                    FeedbackOutcome::TruePositive
                } else {
                    FeedbackOutcome::FalsePositive
                };
                at_core::credibility::classify_feedback(&*store, source_id, outcome, 64)
                    .unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let final_source = store.get(source_id).unwrap().unwrap();
    assert_eq!(final_source.credibility_alpha, 6.0);
    assert_eq!(final_source.credibility_beta, 6.0);
}
