//! Threat Assessment Score: behavioral flags over a subject's recent
//! mention history.
//!
//! Five independent flags, each contributing a fixed weight; the TAS is
//! their sum, bounded to 0-100:
//! - fixation: same-subject mentions across enough distinct days
//! - energy_burst: today's mention count spikes (z >= threshold)
//! - leakage: intent/timeline language present
//! - pathway: operational-detail language present
//! - targeting_specificity: a location reference co-occurring with a
//!   time reference in the same mention

use crate::frequency;
use at_config::{FrequencyConfig, TasConfig};
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;
use tracing::debug;

fn leakage_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        vec![
            Regex::new(r"(?i)\b(i\s+will|we\s+will|going\s+to|plan\s+to|intend\s+to)\b")
                .expect("static pattern"),
            Regex::new(r"(?i)\b(tomorrow|tonight|next\s+week|at\s+\d{1,2}(:\d{2})?)\b")
                .expect("static pattern"),
        ]
    })
}

fn pathway_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        vec![
            Regex::new(
                r"(?i)\b(route|entrance|badge|schedule|residence|home address|weapon|gun|rifle)\b",
            )
            .expect("static pattern"),
            Regex::new(r"(?i)\b(venue|parking|security gate|access)\b").expect("static pattern"),
        ]
    })
}

fn time_reference_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        vec![
            Regex::new(r"(?i)\b(on\s+\w+day|at\s+\d{1,2}(:\d{2})?|between\s+\d{1,2})\b")
                .expect("static pattern"),
            Regex::new(r"(?i)\b(today|tomorrow|this\s+week|next\s+week)\b")
                .expect("static pattern"),
        ]
    })
}

/// One same-subject mention inside the assessment window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectHit {
    pub day: NaiveDate,
    /// Title + content of the mentioning alert.
    pub text: String,
    /// Whether the mention carried a resolvable location reference.
    pub has_location: bool,
}

/// Behavioral flag assessment for one subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TasAssessment {
    pub fixation: bool,
    pub energy_burst: bool,
    pub leakage: bool,
    pub pathway: bool,
    pub targeting_specificity: bool,
    /// Z-score behind the energy-burst flag, when computable.
    pub energy_z: Option<f64>,
    pub distinct_days: usize,
    pub hits: usize,
    /// Weighted flag sum, bounded to 0-100.
    pub tas_score: f64,
}

/// Assess a subject's mention history as of `today`.
///
/// The energy baseline is the window of daily mention counts before
/// `today`, capped at the frequency detector's window length; it needs
/// at least `min_history_days` observed days, otherwise the flag stays
/// off rather than firing on noise.
pub fn assess_subject(
    hits: &[SubjectHit],
    today: NaiveDate,
    tas: &TasConfig,
    frequency_config: &FrequencyConfig,
) -> TasAssessment {
    let mut day_counts: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    let mut leakage = false;
    let mut pathway = false;
    let mut targeting_specificity = false;

    for hit in hits {
        *day_counts.entry(hit.day).or_insert(0) += 1;
        if !leakage && leakage_patterns().iter().any(|p| p.is_match(&hit.text)) {
            leakage = true;
        }
        if !pathway && pathway_patterns().iter().any(|p| p.is_match(&hit.text)) {
            pathway = true;
        }
        if !targeting_specificity
            && hit.has_location
            && time_reference_patterns().iter().any(|p| p.is_match(&hit.text))
        {
            targeting_specificity = true;
        }
    }

    let distinct_days = day_counts.len();
    let fixation = distinct_days >= tas.fixation_min_days;

    let today_count = day_counts.get(&today).copied().unwrap_or(0);
    let baseline: Vec<f64> = day_counts
        .range(..today)
        .rev()
        .take(frequency_config.window_days as usize)
        .map(|(_, c)| *c as f64)
        .collect();
    let (energy_burst, energy_z) = if baseline.len() < frequency_config.min_history_days {
        (false, None)
    } else {
        let z = frequency::z_score(&baseline, today_count as f64, frequency_config.std_floor);
        (z >= tas.energy_z_threshold, Some(z))
    };

    let mut score = 0.0;
    if fixation {
        score += tas.fixation_weight;
    }
    if energy_burst {
        score += tas.energy_burst_weight;
    }
    if leakage {
        score += tas.leakage_weight;
    }
    if pathway {
        score += tas.pathway_weight;
    }
    if targeting_specificity {
        score += tas.targeting_weight;
    }
    let tas_score = score.clamp(0.0, 100.0);

    debug!(
        distinct_days,
        hits = hits.len(),
        tas_score,
        "subject assessed"
    );

    TasAssessment {
        fixation,
        energy_burst,
        leakage,
        pathway,
        targeting_specificity,
        energy_z,
        distinct_days,
        hits: hits.len(),
        tas_score,
    }
}
