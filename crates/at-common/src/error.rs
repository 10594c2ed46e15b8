//! Error types for the Alert Triage core.
//!
//! Structured error handling with stable numeric codes for machine
//! parsing, category classification, and recoverability hints. Fallback
//! paths (short frequency history, empty dedup text, empty correlation
//! pools) are not errors: the engines return best-effort results for
//! those. Errors are reserved for invalid input at the boundary and for
//! store-level failures.

use crate::id::SourceId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for Alert Triage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Configuration and input validation errors.
    Config,
    /// Scoring and numerical errors.
    Scoring,
    /// Correlation/threading errors.
    Correlation,
    /// Store access and update errors.
    Store,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Scoring => write!(f, "scoring"),
            ErrorCategory::Correlation => write!(f, "correlation"),
            ErrorCategory::Store => write!(f, "store"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for the Alert Triage core.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration / validation errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("keyword weight out of range for {term:?}: {weight} (expected 0.1..=5.0)")]
    InvalidKeywordWeight { term: String, weight: f64 },

    #[error("invalid sample count: {n} (expected 1..={max})")]
    InvalidSampleCount { n: usize, max: usize },

    #[error("invalid correlation window: start {start} is not before end {end}")]
    InvalidWindow { start: String, end: String },

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    // Scoring errors (30-39)
    #[error("invalid Beta posterior: alpha={alpha}, beta={beta} (both must be > 0)")]
    InvalidPosterior { alpha: f64, beta: f64 },

    // Store errors (50-59)
    #[error("source not found: {source_id}")]
    SourceNotFound { source_id: SourceId },

    #[error("credibility update conflict for source {source_id} after {attempts} attempts")]
    UpdateConflict { source_id: SourceId, attempts: u32 },

    #[error("store error: {0}")]
    Store(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Stable error code, grouped by category.
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidKeywordWeight { .. } => 11,
            Error::InvalidSampleCount { .. } => 12,
            Error::InvalidWindow { .. } => 13,
            Error::InvalidTimestamp(_) => 14,
            Error::InvalidPosterior { .. } => 30,
            Error::SourceNotFound { .. } => 50,
            Error::UpdateConflict { .. } => 51,
            Error::Store(_) => 52,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_)
            | Error::InvalidKeywordWeight { .. }
            | Error::InvalidSampleCount { .. }
            | Error::InvalidWindow { .. }
            | Error::InvalidTimestamp(_) => ErrorCategory::Config,

            Error::InvalidPosterior { .. } => ErrorCategory::Scoring,

            Error::SourceNotFound { .. } | Error::UpdateConflict { .. } | Error::Store(_) => {
                ErrorCategory::Store
            }

            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Whether this error is potentially recoverable by the caller.
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Validation errors: fix the input and retry
            Error::Config(_) => true,
            Error::InvalidKeywordWeight { .. } => true,
            Error::InvalidSampleCount { .. } => true,
            Error::InvalidWindow { .. } => true,
            Error::InvalidTimestamp(_) => true,
            Error::InvalidPosterior { .. } => true,

            // Conflicts already exhausted their retry budget
            Error::SourceNotFound { .. } => false,
            Error::UpdateConflict { .. } => false,
            Error::Store(_) => true,

            Error::Io(_) => true,
            Error::Json(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_grouped_by_category() {
        let err = Error::InvalidKeywordWeight {
            term: "breach".into(),
            weight: 9.0,
        };
        assert_eq!(err.code(), 11);
        assert_eq!(err.category(), ErrorCategory::Config);
        assert!(err.is_recoverable());
    }

    #[test]
    fn update_conflict_is_terminal() {
        let err = Error::UpdateConflict {
            source_id: SourceId::new(),
            attempts: 8,
        };
        assert_eq!(err.code(), 51);
        assert_eq!(err.category(), ErrorCategory::Store);
        assert!(!err.is_recoverable());
    }

    #[test]
    fn display_names_the_bad_value() {
        let err = Error::InvalidSampleCount { n: 0, max: 100_000 };
        assert!(err.to_string().contains("invalid sample count: 0"));
    }
}
