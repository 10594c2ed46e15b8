//! Bayesian source-credibility model.
//!
//! Each source carries a Beta(alpha, beta) posterior over "this
//! source's alerts are relevant". Analyst feedback updates it one
//! observation at a time: a true positive increments alpha, a false
//! positive increments beta. No decay, no cap; the estimate is
//! intentionally monotone-convergent with more evidence.
//!
//! Updates go through the store's compare-and-set so concurrent
//! classification events on the same source serialize; a bounded
//! optimistic-retry loop resolves conflicts.

use crate::store::SourceStore;
use at_common::{Error, FeedbackOutcome, Result, Source, SourceId};
use at_math::{beta_mean, beta_var};
use tracing::debug;

/// Posterior mean credibility for a source, validated to (0, 1).
pub fn credibility(source: &Source) -> Result<f64> {
    if source.credibility_alpha <= 0.0 || source.credibility_beta <= 0.0 {
        return Err(Error::InvalidPosterior {
            alpha: source.credibility_alpha,
            beta: source.credibility_beta,
        });
    }
    Ok(beta_mean(source.credibility_alpha, source.credibility_beta))
}

/// Posterior variance, used by the uncertainty engine's Beta draws.
pub fn credibility_variance(source: &Source) -> Result<f64> {
    if source.credibility_alpha <= 0.0 || source.credibility_beta <= 0.0 {
        return Err(Error::InvalidPosterior {
            alpha: source.credibility_alpha,
            beta: source.credibility_beta,
        });
    }
    Ok(beta_var(source.credibility_alpha, source.credibility_beta))
}

/// Apply one analyst classification to a source through the store.
///
/// Point-in-time commit: the increment is retried on conflict up to
/// `max_retries` times, then reported as [`Error::UpdateConflict`]
/// rather than retried indefinitely.
pub fn classify_feedback<S: SourceStore>(
    store: &S,
    source_id: SourceId,
    outcome: FeedbackOutcome,
    max_retries: u32,
) -> Result<Source> {
    for attempt in 1..=max_retries.max(1) {
        let current = store
            .get(source_id)?
            .ok_or(Error::SourceNotFound { source_id })?;
        // Never write through an invalid posterior.
        credibility(&current)?;

        let updated = current.observe(outcome);
        if store.compare_and_set(&current, &updated)? {
            debug!(
                %source_id,
                ?outcome,
                attempt,
                credibility = updated.credibility(),
                "source credibility updated"
            );
            return Ok(updated);
        }
    }
    Err(Error::UpdateConflict {
        source_id,
        attempts: max_retries.max(1),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemorySourceStore;

    fn source(alpha: f64, beta: f64) -> Source {
        Source {
            id: SourceId::new(),
            name: "osint feed".into(),
            source_type: "rss".into(),
            credibility_alpha: alpha,
            credibility_beta: beta,
        }
    }

    #[test]
    fn prior_gives_half_credibility() {
        let s = source(2.0, 2.0);
        assert_eq!(credibility(&s).unwrap(), 0.5);
    }

    #[test]
    fn true_positive_strictly_increases_credibility() {
        let s = source(2.0, 2.0);
        let store = MemorySourceStore::with_sources([s.clone()]);
        let before = credibility(&s).unwrap();

        let updated =
            classify_feedback(&store, s.id, FeedbackOutcome::TruePositive, 8).unwrap();
        assert!(credibility(&updated).unwrap() > before);
        assert_eq!(updated.credibility_alpha, 3.0);
    }

    #[test]
    fn false_positive_strictly_decreases_credibility() {
        let s = source(2.0, 2.0);
        let store = MemorySourceStore::with_sources([s.clone()]);
        let before = credibility(&s).unwrap();

        let updated =
            classify_feedback(&store, s.id, FeedbackOutcome::FalsePositive, 8).unwrap();
        assert!(credibility(&updated).unwrap() < before);
        assert_eq!(updated.credibility_beta, 3.0);
    }

    #[test]
    fn credibility_stays_strictly_inside_unit_interval() {
        let s = source(1000.0, 1.0);
        let c = credibility(&s).unwrap();
        assert!(c > 0.0 && c < 1.0);

        let s = source(1.0, 1000.0);
        let c = credibility(&s).unwrap();
        assert!(c > 0.0 && c < 1.0);
    }

    #[test]
    fn sequential_updates_accumulate() {
        let s = source(2.0, 2.0);
        let store = MemorySourceStore::with_sources([s.clone()]);
        for _ in 0..14 {
            classify_feedback(&store, s.id, FeedbackOutcome::TruePositive, 8).unwrap();
        }
        let final_source = store.get(s.id).unwrap().unwrap();
        assert_eq!(final_source.credibility_alpha, 16.0);
        assert_eq!(final_source.credibility_beta, 2.0);
    }

    #[test]
    fn missing_source_surfaces_not_found() {
        let store = MemorySourceStore::new();
        let err = classify_feedback(&store, SourceId::new(), FeedbackOutcome::TruePositive, 8)
            .unwrap_err();
        assert!(matches!(err, Error::SourceNotFound { .. }));
    }

    #[test]
    fn invalid_posterior_is_rejected_before_write() {
        let s = source(0.0, 2.0);
        let store = MemorySourceStore::with_sources([s.clone()]);
        let err =
            classify_feedback(&store, s.id, FeedbackOutcome::TruePositive, 8).unwrap_err();
        assert!(matches!(err, Error::InvalidPosterior { .. }));
    }
}
