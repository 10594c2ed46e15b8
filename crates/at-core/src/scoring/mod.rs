//! Operational Risk Scoring.
//!
//! ORS = clamp(0, 100,
//!     keyword_weight * frequency_factor * source_credibility * 20
//!     + recency_factor * 10
//!     + category + proximity + event + POI factors)
//!
//! The multiplicative core carries the learned signals; the contextual
//! factors are small additive bonuses with fixed caps (see
//! [`context`]). Severity bands: >= 90 critical, 70-89 high, 40-69
//! medium, else low. Recomputing with identical inputs yields an
//! identical breakdown; a recomputation supersedes the prior breakdown
//! rather than editing it.

pub mod context;
pub mod tas;

pub use context::ScoreContext;
pub use tas::{SubjectHit, TasAssessment};

use at_common::{Alert, Keyword, Result, ScoreBreakdown, Severity};
use at_config::{validate_keyword, ScoringConfig};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Linear recency decay from 1.0 (published now) to the floor over the
/// configured window. Future timestamps clamp to 1.0.
pub fn recency_factor(
    published_at: DateTime<Utc>,
    now: DateTime<Utc>,
    config: &ScoringConfig,
) -> f64 {
    let hours = (now - published_at).num_seconds() as f64 / 3600.0;
    let hours = hours.max(0.0);
    (1.0 - hours / config.recency_window_hours).max(config.recency_floor)
}

/// Compute the full factor decomposition for one alert.
///
/// `source_credibility` and `frequency_factor` are computed upstream
/// (credibility model, anomaly detector) and passed in, keeping this a
/// pure function of its inputs and the configuration snapshot.
pub fn score_alert(
    alert: &Alert,
    keyword: &Keyword,
    source_credibility: f64,
    frequency_factor: f64,
    score_context: &ScoreContext,
    config: &ScoringConfig,
    now: DateTime<Utc>,
) -> Result<ScoreBreakdown> {
    validate_keyword(keyword)?;

    let recency = recency_factor(alert.published_at, now, config);
    let category_factor = context::category_factor(&keyword.category, config);
    let proximity_factor = context::proximity_factor(score_context, config);
    let event_factor = context::event_factor(score_context, config);
    let poi_factor = context::poi_factor(score_context, config);

    let base = keyword.weight * frequency_factor * source_credibility * config.base_multiplier
        + recency * config.recency_weight;
    let final_score = (base + category_factor + proximity_factor + event_factor + poi_factor)
        .clamp(0.0, 100.0);
    let severity = Severity::from_score(final_score);

    debug!(
        alert_id = %alert.id,
        ors = final_score,
        %severity,
        "alert scored"
    );

    Ok(ScoreBreakdown {
        alert_id: alert.id,
        keyword_weight: keyword.weight,
        source_credibility,
        frequency_factor,
        recency_factor: recency,
        category_factor,
        proximity_factor,
        event_factor,
        poi_factor,
        final_score,
        severity,
        computed_at: now,
    })
}
