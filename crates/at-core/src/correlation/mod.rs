//! Pairwise alert correlation and Subject-of-Interest threading.
//!
//! A pure batch computation over a sliding time window: evidence is
//! computed per alert pair, pairs whose clamped weight sum passes the
//! edge threshold are linked, and connected components of the linked
//! graph become threads. Pair evaluation is worst-case quadratic in the
//! window, so both the alert count and the pair budget are capped;
//! excess input is truncated most-recent-first with a reported flag,
//! never dropped silently.

pub mod evidence;
pub mod thread;
mod union_find;

pub use evidence::pair_evidence;

use crate::correlation::union_find::UnionFind;
use at_common::{Alert, Error, PairEvidence, Result, Thread};
use at_config::CorrelationConfig;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// One scored, deduplicated alert presented to a correlation run.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationAlert {
    pub alert: Alert,
    /// Source kind, for cross-source corroboration.
    pub source_type: String,
    /// Precomputed ORS for the alert's current breakdown.
    pub ors: f64,
    /// Precomputed TAS, 0.0 when no subject assessment exists.
    pub tas: f64,
    /// Protectee/POI identifiers hit by this alert.
    pub poi_ids: BTreeSet<String>,
}

/// Result of one correlation run.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationReport {
    /// Highest-risk first, capped at `max_threads`.
    pub threads: Vec<Thread>,
    /// Input exceeded `max_alerts` and was truncated most-recent-first.
    pub truncated: bool,
    /// The pairwise budget ran out before all pairs were evaluated.
    pub pair_budget_exhausted: bool,
    pub alerts_considered: usize,
    pub pairs_evaluated: usize,
}

/// Correlate alerts inside `[window_start, window_end]` into threads.
///
/// Duplicates and out-of-window alerts are excluded up front; they must
/// never contribute evidence. The run is deterministic for a given
/// input set and configuration.
pub fn run_correlation(
    alerts: &[CorrelationAlert],
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    config: &CorrelationConfig,
) -> Result<CorrelationReport> {
    if window_start >= window_end {
        return Err(Error::InvalidWindow {
            start: window_start.to_rfc3339(),
            end: window_end.to_rfc3339(),
        });
    }

    let mut pool: Vec<&CorrelationAlert> = alerts
        .iter()
        .filter(|a| a.alert.is_duplicate_of.is_none())
        .filter(|a| a.alert.published_at >= window_start && a.alert.published_at <= window_end)
        .collect();

    // Deterministic truncation: keep the most recent alerts.
    pool.sort_by(|a, b| {
        b.alert
            .published_at
            .cmp(&a.alert.published_at)
            .then_with(|| a.alert.id.cmp(&b.alert.id))
    });
    let truncated = pool.len() > config.max_alerts;
    if truncated {
        warn!(
            alerts = pool.len(),
            cap = config.max_alerts,
            "correlation input truncated"
        );
        pool.truncate(config.max_alerts);
    }

    // Oldest-first so the inner pair loop can stop at the window gap.
    pool.reverse();
    let pool: Vec<CorrelationAlert> = pool.into_iter().cloned().collect();

    let window_seconds = config.window_hours * 3600.0;
    let mut uf = UnionFind::new(pool.len());
    let mut linked: Vec<(usize, usize, PairEvidence)> = Vec::new();
    let mut pairs_evaluated = 0usize;
    let mut pair_budget_exhausted = false;

    'outer: for i in 0..pool.len() {
        for j in (i + 1)..pool.len() {
            let gap = (pool[j].alert.published_at - pool[i].alert.published_at).num_seconds()
                as f64;
            if gap > window_seconds {
                break;
            }
            if pairs_evaluated >= config.max_pair_checks {
                pair_budget_exhausted = true;
                warn!(
                    budget = config.max_pair_checks,
                    "correlation pair budget exhausted"
                );
                break 'outer;
            }
            pairs_evaluated += 1;

            let evidence = evidence::pair_evidence(&pool[i], &pool[j], config);
            if evidence.score >= config.edge_threshold {
                uf.union(i, j);
                linked.push((i, j, evidence));
            }
        }
    }

    let threads = thread::build_threads(
        &pool,
        linked,
        &mut uf,
        window_start,
        window_end,
        config,
    );
    debug!(
        alerts = pool.len(),
        pairs_evaluated,
        threads = threads.len(),
        "correlation run complete"
    );

    Ok(CorrelationReport {
        threads,
        truncated,
        pair_budget_exhausted,
        alerts_considered: pool.len(),
        pairs_evaluated,
    })
}
