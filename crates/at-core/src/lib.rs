//! Alert Triage analytics core.
//!
//! The pipeline, in dependency order:
//!
//! 1. [`dedup`] collapses near-duplicate alerts before they pollute
//!    frequency counts or scores.
//! 2. [`credibility`] maintains a Bayesian per-source trust estimate,
//!    updated by analyst feedback.
//! 3. [`frequency`] computes per-keyword daily activity baselines and
//!    flags deviations via Z-scores.
//! 4. [`scoring`] combines keyword weight, source credibility, anomaly
//!    factor, recency, and contextual modifiers into the Operational
//!    Risk Score, with a parallel behavioral Threat Assessment Score.
//! 5. [`uncertainty`] attaches a Monte Carlo confidence interval to any
//!    score's factor decomposition.
//! 6. [`correlation`] computes pairwise linkage evidence and clusters
//!    related alerts into Subject-of-Interest threads.
//!
//! All stages are pure functions over explicit configuration and store
//! snapshots; [`engine::TriageEngine`] wires them together behind the
//! external interface.

pub mod correlation;
pub mod credibility;
pub mod dedup;
pub mod engine;
pub mod entities;
pub mod frequency;
pub mod logging;
pub mod scoring;
pub mod store;
pub mod uncertainty;

pub use engine::{CorrelationParams, NewAlert, TriageEngine};
