//! Content deduplication engine.
//!
//! Two-tier approach:
//! 1. Fast path: SHA-256 of normalized title + content catches
//!    exact/near-exact duplicates in O(1) via the caller's hash index.
//! 2. Slow path: fuzzy title matching catches rephrased duplicates,
//!    bounded to same-day candidates (most-recent-first, capped).
//!
//! Duplicates are excluded from all downstream scoring, frequency
//! increments, and correlation, but retained in storage with a
//! back-reference for audit.

use at_common::{Alert, AlertId};
use at_config::DedupConfig;
use at_math::sequence_ratio;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::sync::OnceLock;
use tracing::debug;

fn html_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]+>").expect("static pattern"))
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static pattern"))
}

/// Outcome of a dedup check for one candidate alert.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateDecision {
    pub is_duplicate: bool,
    pub duplicate_of: Option<AlertId>,
    /// 1.0 for fingerprint matches; the similarity ratio for fuzzy
    /// matches; 0.0 for non-duplicates.
    pub confidence: f64,
}

impl DuplicateDecision {
    fn unique() -> Self {
        DuplicateDecision {
            is_duplicate: false,
            duplicate_of: None,
            confidence: 0.0,
        }
    }
}

/// Normalize text for hashing and comparison: strip HTML tags,
/// lowercase, collapse whitespace, truncate.
pub fn normalize_text(text: &str, max_chars: usize) -> String {
    let stripped = html_tag_re().replace_all(text, " ");
    let collapsed = whitespace_re().replace_all(stripped.trim(), " ");
    collapsed.to_lowercase().chars().take(max_chars).collect()
}

/// SHA-256 content fingerprint of normalized title + content.
pub fn content_fingerprint(title: &str, content: &str, config: &DedupConfig) -> String {
    let normalized = normalize_text(
        &format!("{} {}", title, content),
        config.normalized_prefix_chars,
    );
    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    hex::encode(hasher.finalize())
}

/// Dedup check for a candidate against the same-day pool.
///
/// `same_day_pool` holds non-duplicate alerts published the same
/// calendar day as the candidate, most recent first; the caller is
/// responsible for that restriction, this function enforces the size
/// cap. An empty normalized title skips the slow path: there is not
/// enough signal for a fuzzy verdict.
pub fn dedupe(
    title: &str,
    fingerprint: &str,
    same_day_pool: &[Alert],
    config: &DedupConfig,
) -> DuplicateDecision {
    // Fast path: exact fingerprint match.
    if let Some(existing) = same_day_pool
        .iter()
        .find(|a| a.is_duplicate_of.is_none() && a.content_hash == fingerprint)
    {
        debug!(duplicate_of = %existing.id, "dedup fingerprint hit");
        return DuplicateDecision {
            is_duplicate: true,
            duplicate_of: Some(existing.id),
            confidence: 1.0,
        };
    }

    let normalized_title = normalize_text(title, config.normalized_prefix_chars);
    if normalized_title.is_empty() {
        return DuplicateDecision::unique();
    }

    // Slow path: fuzzy title matching over the capped candidate set.
    let mut best_ratio = 0.0;
    let mut best_match = None;
    for candidate in same_day_pool
        .iter()
        .filter(|a| a.is_duplicate_of.is_none())
        .take(config.max_candidates)
    {
        let candidate_title =
            normalize_text(&candidate.title, config.normalized_prefix_chars);
        if candidate_title.is_empty() {
            continue;
        }
        let ratio = sequence_ratio(&normalized_title, &candidate_title);
        if ratio >= config.fuzzy_threshold && ratio > best_ratio {
            best_ratio = ratio;
            best_match = Some(candidate.id);
        }
    }

    match best_match {
        Some(id) => {
            debug!(duplicate_of = %id, ratio = best_ratio, "dedup fuzzy hit");
            DuplicateDecision {
                is_duplicate: true,
                duplicate_of: Some(id),
                confidence: best_ratio,
            }
        }
        None => DuplicateDecision::unique(),
    }
}
