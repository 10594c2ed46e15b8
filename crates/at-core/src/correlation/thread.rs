//! Thread assembly from linked pairs.
//!
//! Connected components over the linked-pair graph become candidate
//! threads; components below `min_cluster_size` are dropped, so
//! singleton alerts never produce a trivial thread.

use crate::correlation::union_find::UnionFind;
use crate::correlation::CorrelationAlert;
use at_common::{PairEvidence, ReasonCode, Severity, Thread, ThreadId};
use at_config::CorrelationConfig;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Stable thread id from the sorted member set and the run window.
fn thread_id(
    member_ids: &[at_common::AlertId],
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> ThreadId {
    let mut hasher = Sha256::new();
    for id in member_ids {
        hasher.update(id.to_string().as_bytes());
    }
    hasher.update(window_start.to_rfc3339().as_bytes());
    hasher.update(window_end.to_rfc3339().as_bytes());
    let digest = hex::encode(hasher.finalize());
    ThreadId(format!("soi-{}", &digest[..12]))
}

/// Label from the most frequent matched term among members, falling
/// back to the dominant shared entity value. Ties break to the
/// lexicographically smallest candidate.
fn thread_label(members: &[&CorrelationAlert]) -> String {
    let mut term_counts: BTreeMap<String, usize> = BTreeMap::new();
    for member in members {
        if let Some(term) = member
            .alert
            .matched_term
            .as_deref()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
        {
            *term_counts.entry(term).or_insert(0) += 1;
        }
    }
    if let Some(label) = dominant(&term_counts) {
        return label;
    }

    let mut entity_counts: BTreeMap<String, usize> = BTreeMap::new();
    for member in members {
        for entity in &member.alert.entities {
            *entity_counts.entry(entity.value.clone()).or_insert(0) += 1;
        }
    }
    dominant(&entity_counts).unwrap_or_else(|| "soi thread".to_string())
}

fn dominant(counts: &BTreeMap<String, usize>) -> Option<String> {
    // BTreeMap iteration is ordered, so the first max is the
    // lexicographically smallest among ties.
    counts
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(value, _)| value.clone())
}

/// Assemble threads from the clustered window.
///
/// Output ordering is highest-risk first: (max ORS, max TAS, window
/// end) descending, capped at `max_threads`.
pub(crate) fn build_threads(
    pool: &[CorrelationAlert],
    linked: Vec<(usize, usize, PairEvidence)>,
    uf: &mut UnionFind,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    config: &CorrelationConfig,
) -> Vec<Thread> {
    let mut clusters: HashMap<usize, Vec<usize>> = HashMap::new();
    for index in 0..pool.len() {
        clusters.entry(uf.find(index)).or_default().push(index);
    }

    let mut pairs_by_root: HashMap<usize, Vec<PairEvidence>> = HashMap::new();
    for (left, _, evidence) in linked {
        pairs_by_root.entry(uf.find(left)).or_default().push(evidence);
    }

    let mut threads: Vec<Thread> = Vec::new();
    for (root, indices) in clusters {
        if indices.len() < config.min_cluster_size {
            continue;
        }
        let members: Vec<&CorrelationAlert> = indices.iter().map(|&i| &pool[i]).collect();
        let mut pair_evidence = pairs_by_root.remove(&root).unwrap_or_default();
        if pair_evidence.is_empty() {
            continue;
        }
        pair_evidence.sort_by(|a, b| {
            (a.left_alert_id, a.right_alert_id).cmp(&(b.left_alert_id, b.right_alert_id))
        });

        let mut member_alert_ids: Vec<_> = members.iter().map(|m| m.alert.id).collect();
        member_alert_ids.sort();

        let thread_confidence = pair_evidence.iter().map(|p| p.score).sum::<f64>()
            / pair_evidence.len() as f64;
        let reason_codes: BTreeSet<ReasonCode> = pair_evidence
            .iter()
            .flat_map(|p| p.reason_codes.iter().copied())
            .collect();
        let max_ors = members.iter().map(|m| m.ors).fold(0.0, f64::max);
        let max_tas = members.iter().map(|m| m.tas).fold(0.0, f64::max);
        let first_seen = members
            .iter()
            .map(|m| m.alert.published_at)
            .min()
            .unwrap_or(window_start);
        let last_seen = members
            .iter()
            .map(|m| m.alert.published_at)
            .max()
            .unwrap_or(window_end);

        threads.push(Thread {
            thread_id: thread_id(&member_alert_ids, window_start, window_end),
            label: thread_label(&members),
            member_alert_ids,
            thread_confidence,
            reason_codes,
            recommended_tier: Severity::from_score(max_ors),
            max_ors,
            max_tas,
            window_start: first_seen,
            window_end: last_seen,
            pair_evidence,
        });
    }

    threads.sort_by(|a, b| {
        b.max_ors
            .partial_cmp(&a.max_ors)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                b.max_tas
                    .partial_cmp(&a.max_tas)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| b.window_end.cmp(&a.window_end))
            .then_with(|| a.thread_id.cmp(&b.thread_id))
    });
    threads.truncate(config.max_threads);
    threads
}
