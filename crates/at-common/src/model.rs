//! Core data model: alerts, sources, keywords, and derived analytics
//! records.
//!
//! Alerts are immutable once created; scores, intervals, and threads are
//! derived records recomputed on demand and superseded rather than
//! edited in place.

use crate::id::{AlertId, KeywordId, SourceId, ThreadId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Severity bands for the 0-100 Operational Risk Score.
///
/// Boundaries are inclusive on the lower bound of each band:
/// >= 90 critical, 70-89 high, 40-69 medium, else low.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Map a numeric score to its severity band.
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Severity::Critical
        } else if score >= 70.0 {
            Severity::High
        } else if score >= 40.0 {
            Severity::Medium
        } else {
            Severity::Low
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// Analyst feedback on an alert's relevance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackOutcome {
    TruePositive,
    FalsePositive,
}

/// Typed entity kinds extracted from alert text.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    ActorHandle,
    Domain,
    Ipv4,
    Url,
    UserId,
    DeviceId,
    VendorId,
    Cve,
    Md5,
    Sha1,
    Sha256,
}

impl EntityType {
    /// Whether a shared entity of this type counts as non-actor linkage
    /// evidence. Hash and CVE entities are excluded: they recur across
    /// unrelated reporting too often to link on.
    pub fn links_as_non_actor(&self) -> bool {
        matches!(
            self,
            EntityType::Domain
                | EntityType::Ipv4
                | EntityType::Url
                | EntityType::UserId
                | EntityType::DeviceId
                | EntityType::VendorId
        )
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::ActorHandle => write!(f, "actor_handle"),
            EntityType::Domain => write!(f, "domain"),
            EntityType::Ipv4 => write!(f, "ipv4"),
            EntityType::Url => write!(f, "url"),
            EntityType::UserId => write!(f, "user_id"),
            EntityType::DeviceId => write!(f, "device_id"),
            EntityType::VendorId => write!(f, "vendor_id"),
            EntityType::Cve => write!(f, "cve"),
            EntityType::Md5 => write!(f, "md5"),
            EntityType::Sha1 => write!(f, "sha1"),
            EntityType::Sha256 => write!(f, "sha256"),
        }
    }
}

/// A typed entity value attached to an alert.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Entity {
    pub entity_type: EntityType,
    /// Normalized value (lowercased where the type is case-insensitive).
    pub value: String,
}

impl Entity {
    pub fn new(entity_type: EntityType, value: impl Into<String>) -> Self {
        Entity {
            entity_type,
            value: value.into(),
        }
    }
}

/// A normalized alert record, created by the collection layer and
/// immutable thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: AlertId,
    pub title: String,
    pub content: String,
    pub source_id: SourceId,
    pub published_at: DateTime<Utc>,
    /// SHA-256 of the normalized title + content, set at ingest.
    pub content_hash: String,
    /// The keyword term that matched this alert, if any.
    pub matched_term: Option<String>,
    #[serde(default)]
    pub entities: BTreeSet<Entity>,
    /// Back-reference set when the dedup engine marks this alert as a
    /// duplicate. Duplicates are retained for audit but excluded from
    /// scoring, frequency counts, and correlation.
    #[serde(default)]
    pub is_duplicate_of: Option<AlertId>,
}

/// A feed/source with its learned credibility posterior.
///
/// Credibility is the mean of a Beta(alpha, beta) posterior over "this
/// source's alerts are relevant". alpha and beta stay strictly positive,
/// so the mean never reaches exactly 0 or 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub id: SourceId,
    pub name: String,
    /// Free-form source kind ("rss", "paste", "forum", "vendor", ...);
    /// distinct kinds on a linked pair earn cross-source corroboration.
    pub source_type: String,
    pub credibility_alpha: f64,
    pub credibility_beta: f64,
}

impl Source {
    /// Posterior mean credibility in (0, 1).
    pub fn credibility(&self) -> f64 {
        self.credibility_alpha / (self.credibility_alpha + self.credibility_beta)
    }

    /// Apply one analyst classification to the posterior.
    pub fn observe(&self, outcome: FeedbackOutcome) -> Source {
        let mut updated = self.clone();
        match outcome {
            FeedbackOutcome::TruePositive => updated.credibility_alpha += 1.0,
            FeedbackOutcome::FalsePositive => updated.credibility_beta += 1.0,
        }
        updated
    }
}

/// A monitored keyword with its scoring weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub id: KeywordId,
    pub term: String,
    /// Weight in [0.1, 5.0]; validated at the boundary.
    pub weight: f64,
    pub category: String,
}

/// One day's match count for a keyword. Append/increment-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyBucket {
    pub keyword_id: KeywordId,
    pub date: NaiveDate,
    pub count: u32,
}

/// Factor decomposition of one ORS computation.
///
/// Immutable per alert-version; rescoring produces a new breakdown that
/// supersedes (never edits) the prior one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub alert_id: AlertId,
    pub keyword_weight: f64,
    pub source_credibility: f64,
    pub frequency_factor: f64,
    pub recency_factor: f64,
    pub category_factor: f64,
    pub proximity_factor: f64,
    pub event_factor: f64,
    pub poi_factor: f64,
    /// Final ORS, clamped to 0-100.
    pub final_score: f64,
    pub severity: Severity,
    pub computed_at: DateTime<Utc>,
}

/// Empirical confidence interval for one score computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UncertaintyInterval {
    pub n: usize,
    pub mean: f64,
    pub std: f64,
    pub p05: f64,
    pub p50: f64,
    pub p95: f64,
    /// Method name/version so re-runs with different sampling
    /// parameters are distinguishable.
    pub method: String,
}

/// Machine-generated tags explaining linkage evidence between alerts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    SharedActorHandle,
    SharedPoiHit,
    SharedNonActorEntity,
    MatchedTermTemporalOverlap,
    SharedSourceFingerprint,
    CrossSourceCorroboration,
    TightTemporalProximity,
    LinguisticOverlapMedium,
    LinguisticOverlapHigh,
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReasonCode::SharedActorHandle => write!(f, "shared_actor_handle"),
            ReasonCode::SharedPoiHit => write!(f, "shared_poi_hit"),
            ReasonCode::SharedNonActorEntity => write!(f, "shared_non_actor_entity"),
            ReasonCode::MatchedTermTemporalOverlap => {
                write!(f, "matched_term_temporal_overlap")
            }
            ReasonCode::SharedSourceFingerprint => write!(f, "shared_source_fingerprint"),
            ReasonCode::CrossSourceCorroboration => {
                write!(f, "cross_source_corroboration")
            }
            ReasonCode::TightTemporalProximity => write!(f, "tight_temporal_proximity"),
            ReasonCode::LinguisticOverlapMedium => write!(f, "linguistic_overlap_medium"),
            ReasonCode::LinguisticOverlapHigh => write!(f, "linguistic_overlap_high"),
        }
    }
}

/// Symmetric linkage evidence between two alerts, recomputed fresh on
/// each correlation run and kept only as explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairEvidence {
    pub left_alert_id: AlertId,
    pub right_alert_id: AlertId,
    /// Sum of evidence weights, clamped to [0, 1].
    pub score: f64,
    pub reason_codes: BTreeSet<ReasonCode>,
}

/// A Subject-of-Interest investigation thread: a cluster of linked
/// alerts with machine-generated justification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thread {
    pub thread_id: ThreadId,
    /// Deterministic label from the dominant matched term or shared
    /// entity among members.
    pub label: String,
    /// Sorted member ids.
    pub member_alert_ids: Vec<AlertId>,
    /// Mean of intra-cluster linked pair scores.
    pub thread_confidence: f64,
    /// Union of reason codes over member pairs.
    pub reason_codes: BTreeSet<ReasonCode>,
    /// Escalation tier from the maximum member ORS.
    pub recommended_tier: Severity,
    pub max_ors: f64,
    pub max_tas: f64,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    /// The linked pairs backing this thread, for audit/export.
    pub pair_evidence: Vec<PairEvidence>,
}
