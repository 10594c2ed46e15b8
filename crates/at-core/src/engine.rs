//! Engine facade: the external interface over the pipeline stages.
//!
//! A [`TriageEngine`] owns a validated configuration snapshot plus the
//! two store handles (source posteriors, frequency buckets) and exposes
//! the operations the serving layer calls: ingest, score, interval,
//! subject assessment, feedback classification, spike scan, and
//! correlation. Every operation is synchronous and request-scoped.

use crate::correlation::{self, CorrelationAlert, CorrelationReport};
use crate::scoring::tas::{self, SubjectHit, TasAssessment};
use crate::scoring::{self, ScoreContext};
use crate::store::{FrequencyStore, SourceStore};
use crate::uncertainty::{self, IntervalInputs};
use crate::{credibility, dedup, entities, frequency};
use at_common::{
    Alert, AlertId, FeedbackOutcome, Keyword, Result, ScoreBreakdown, Source, SourceId,
    UncertaintyInterval,
};
use at_config::{validate_config, CorrelationConfig, EngineConfig};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;

/// Alert fields supplied by the collection layer at ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAlert {
    pub title: String,
    pub content: String,
    pub source_id: SourceId,
    pub published_at: DateTime<Utc>,
}

/// Per-run overrides for a correlation invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CorrelationParams {
    pub min_cluster_size: Option<usize>,
    pub edge_threshold: Option<f64>,
}

/// The analytics core behind the external interface.
pub struct TriageEngine<S, F> {
    config: EngineConfig,
    sources: S,
    frequency: F,
}

impl<S: SourceStore, F: FrequencyStore> TriageEngine<S, F> {
    /// Build an engine over a validated configuration snapshot.
    pub fn new(config: EngineConfig, sources: S, frequency: F) -> Result<Self> {
        validate_config(&config)?;
        Ok(TriageEngine {
            config,
            sources,
            frequency,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Register a source with the configured prior, if not present.
    pub fn register_source(&self, name: &str, source_type: &str) -> Result<Source> {
        let source = Source {
            id: SourceId::new(),
            name: name.to_string(),
            source_type: source_type.to_string(),
            credibility_alpha: self.config.credibility_prior_alpha,
            credibility_beta: self.config.credibility_prior_beta,
        };
        self.sources.insert_if_absent(&source)?;
        Ok(source)
    }

    /// Ingest one collected alert: fingerprint, extract entities, run
    /// dedup against the same-day pool, and count the keyword match.
    ///
    /// `same_day_pool` holds alerts published the same calendar day,
    /// most recent first. Duplicates get a back-reference and do not
    /// increment frequency buckets.
    pub fn ingest(
        &self,
        draft: NewAlert,
        matched: Option<&Keyword>,
        same_day_pool: &[Alert],
    ) -> Result<Alert> {
        let fingerprint =
            dedup::content_fingerprint(&draft.title, &draft.content, &self.config.dedup);
        let decision = dedup::dedupe(
            &draft.title,
            &fingerprint,
            same_day_pool,
            &self.config.dedup,
        );

        let text = format!("{} {}", draft.title, draft.content);
        let alert = Alert {
            id: AlertId::new(),
            title: draft.title,
            content: draft.content,
            source_id: draft.source_id,
            published_at: draft.published_at,
            content_hash: fingerprint,
            matched_term: matched.map(|k| k.term.clone()),
            entities: entities::extract_iocs(&text),
            is_duplicate_of: decision.duplicate_of,
        };

        if alert.is_duplicate_of.is_none() {
            if let Some(keyword) = matched {
                self.frequency
                    .increment(keyword.id, alert.published_at.date_naive())?;
            }
        }
        info!(
            alert_id = %alert.id,
            duplicate = alert.is_duplicate_of.is_some(),
            entities = alert.entities.len(),
            "alert ingested"
        );
        Ok(alert)
    }

    /// Frequency baseline for a keyword: daily counts inside the rolling
    /// window ending the day before `today`.
    fn baseline_counts(&self, keyword: &Keyword, today: NaiveDate) -> Result<Vec<u32>> {
        let from = today - chrono::Duration::days(self.config.frequency.window_days as i64);
        Ok(self
            .frequency
            .daily_counts(keyword.id, from, today)?
            .into_iter()
            .map(|b| b.count)
            .collect())
    }

    /// Compute the full ORS factor decomposition for one alert.
    pub fn score_alert(
        &self,
        alert: &Alert,
        keyword: &Keyword,
        context: &ScoreContext,
        now: DateTime<Utc>,
    ) -> Result<ScoreBreakdown> {
        let source = self
            .sources
            .get(alert.source_id)?
            .ok_or(at_common::Error::SourceNotFound {
                source_id: alert.source_id,
            })?;
        let source_credibility = credibility::credibility(&source)?;

        let today = now.date_naive();
        let baseline = self.baseline_counts(keyword, today)?;
        let today_count = self.frequency.count_on(keyword.id, today)?;
        let frequency_factor =
            frequency::frequency_factor(&baseline, today_count, &self.config.frequency);

        scoring::score_alert(
            alert,
            keyword,
            source_credibility,
            frequency_factor,
            context,
            &self.config.scoring,
            now,
        )
    }

    /// Attach a Monte Carlo confidence interval to a breakdown.
    ///
    /// `n` defaults to the configured sample count; `seed` makes the
    /// run reproducible.
    pub fn score_interval(
        &self,
        alert: &Alert,
        breakdown: &ScoreBreakdown,
        n: Option<usize>,
        seed: Option<u64>,
    ) -> Result<UncertaintyInterval> {
        let source = self
            .sources
            .get(alert.source_id)?
            .ok_or(at_common::Error::SourceNotFound {
                source_id: alert.source_id,
            })?;
        let inputs = IntervalInputs {
            keyword_weight: breakdown.keyword_weight,
            frequency_factor: breakdown.frequency_factor,
            credibility_alpha: source.credibility_alpha,
            credibility_beta: source.credibility_beta,
            recency_factor: breakdown.recency_factor,
            context_bonus: breakdown.category_factor
                + breakdown.proximity_factor
                + breakdown.event_factor
                + breakdown.poi_factor,
        };
        uncertainty::score_interval(
            &inputs,
            n.unwrap_or(self.config.uncertainty.default_samples),
            seed,
            &self.config.scoring,
            &self.config.uncertainty,
        )
    }

    /// Behavioral Threat Assessment Score for one subject's mentions.
    pub fn assess_subject(&self, hits: &[SubjectHit], today: NaiveDate) -> TasAssessment {
        tas::assess_subject(hits, today, &self.config.tas, &self.config.frequency)
    }

    /// Apply one analyst classification to a source's posterior.
    pub fn classify_feedback(
        &self,
        source_id: SourceId,
        outcome: FeedbackOutcome,
    ) -> Result<Source> {
        credibility::classify_feedback(
            &self.sources,
            source_id,
            outcome,
            self.config.max_update_retries,
        )
    }

    /// Scan keyword histories for unusual activity as of `today`.
    pub fn detect_spikes(
        &self,
        keywords: &[Keyword],
        today: NaiveDate,
        threshold_ratio: f64,
    ) -> Result<Vec<frequency::SpikeReport>> {
        let mut histories = Vec::with_capacity(keywords.len());
        for keyword in keywords {
            let baseline = self.baseline_counts(keyword, today)?;
            let today_count = self.frequency.count_on(keyword.id, today)?;
            histories.push((keyword.clone(), baseline, today_count));
        }
        Ok(frequency::detect_spikes(
            &histories,
            threshold_ratio,
            &self.config.frequency,
        ))
    }

    /// Correlate scored alerts inside a window into SOI threads.
    pub fn run_correlation(
        &self,
        alerts: &[CorrelationAlert],
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
        params: CorrelationParams,
    ) -> Result<CorrelationReport> {
        let mut config: CorrelationConfig = self.config.correlation.clone();
        if let Some(min_cluster_size) = params.min_cluster_size {
            config.min_cluster_size = min_cluster_size;
        }
        if let Some(edge_threshold) = params.edge_threshold {
            config.edge_threshold = edge_threshold;
        }
        correlation::run_correlation(alerts, window_start, window_end, &config)
    }
}
