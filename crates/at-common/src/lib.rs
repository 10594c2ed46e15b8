//! Alert Triage common types, IDs, and errors.
//!
//! Foundational types shared across the analytics core:
//! - Alert, Source, Keyword, and frequency-bucket records
//! - Derived score, interval, and thread types
//! - Typed identifiers
//! - The unified error type

pub mod error;
pub mod id;
pub mod model;

pub use error::{Error, ErrorCategory, Result};
pub use id::{AlertId, KeywordId, SourceId, ThreadId};
pub use model::{
    Alert, Entity, EntityType, FeedbackOutcome, FrequencyBucket, Keyword, PairEvidence,
    ReasonCode, ScoreBreakdown, Severity, Source, Thread, UncertaintyInterval,
};
