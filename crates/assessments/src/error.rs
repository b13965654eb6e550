//! Error types for the assessments crate.

use thiserror::Error;

/// Errors raised while interpreting user-supplied filter values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssessmentError {
    /// Test type was not one of K, S, P or empty
    #[error("Unknown test type: {0:?} (expected k, s, p or any)")]
    UnknownTestType(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, AssessmentError>;
