//! Pairwise linkage evidence.
//!
//! Each reason code contributes a configured positive weight; codes are
//! non-exclusive and can co-fire on one pair. The pair score is the
//! clamped weight sum in [0, 1].

use crate::correlation::CorrelationAlert;
use at_common::{Entity, EntityType, PairEvidence, ReasonCode};
use at_config::CorrelationConfig;
use at_math::sequence_ratio;
use std::collections::BTreeSet;

fn normalized_term(term: &Option<String>) -> Option<String> {
    term.as_deref()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
}

fn normalized_title(title: &str) -> String {
    title.trim().to_lowercase()
}

fn gap_hours(left: &CorrelationAlert, right: &CorrelationAlert) -> f64 {
    (left.alert.published_at - right.alert.published_at)
        .num_seconds()
        .abs() as f64
        / 3600.0
}

/// Compute symmetric linkage evidence for one alert pair.
pub fn pair_evidence(
    left: &CorrelationAlert,
    right: &CorrelationAlert,
    config: &CorrelationConfig,
) -> PairEvidence {
    let weights = &config.evidence;
    let mut reason_codes = BTreeSet::new();
    let mut score = 0.0;

    let shared: Vec<&Entity> = left
        .alert
        .entities
        .intersection(&right.alert.entities)
        .collect();
    if shared
        .iter()
        .any(|e| e.entity_type == EntityType::ActorHandle)
    {
        reason_codes.insert(ReasonCode::SharedActorHandle);
        score += weights.shared_actor_handle;
    }
    if shared.iter().any(|e| e.entity_type.links_as_non_actor()) {
        reason_codes.insert(ReasonCode::SharedNonActorEntity);
        score += weights.shared_non_actor_entity;
    }
    if left.poi_ids.intersection(&right.poi_ids).next().is_some() {
        reason_codes.insert(ReasonCode::SharedPoiHit);
        score += weights.shared_poi_hit;
    }

    let gap = gap_hours(left, right);
    if let (Some(left_term), Some(right_term)) = (
        normalized_term(&left.alert.matched_term),
        normalized_term(&right.alert.matched_term),
    ) {
        if left_term == right_term && gap <= config.term_overlap_hours {
            reason_codes.insert(ReasonCode::MatchedTermTemporalOverlap);
            score += weights.matched_term_temporal_overlap;
        }
    }

    if left.alert.source_id == right.alert.source_id {
        reason_codes.insert(ReasonCode::SharedSourceFingerprint);
        score += weights.shared_source_fingerprint;
    }
    if left.source_type != right.source_type {
        reason_codes.insert(ReasonCode::CrossSourceCorroboration);
        score += weights.cross_source_corroboration;
    }
    if gap <= config.tight_proximity_hours {
        reason_codes.insert(ReasonCode::TightTemporalProximity);
        score += weights.tight_temporal_proximity;
    }

    let ratio = sequence_ratio(
        &normalized_title(&left.alert.title),
        &normalized_title(&right.alert.title),
    );
    if ratio >= config.linguistic_high_threshold {
        reason_codes.insert(ReasonCode::LinguisticOverlapHigh);
        score += weights.linguistic_overlap_high;
    } else if ratio >= config.linguistic_medium_threshold {
        reason_codes.insert(ReasonCode::LinguisticOverlapMedium);
        score += weights.linguistic_overlap_medium;
    }

    PairEvidence {
        left_alert_id: left.alert.id,
        right_alert_id: right.alert.id,
        score: score.clamp(0.0, 1.0),
        reason_codes,
    }
}
