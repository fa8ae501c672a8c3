//! Error types for the query crate.

use thiserror::Error;

/// Errors raised while building view state.
///
/// Evaluation itself never fails: an empty filter result is a normal
/// outcome and an unknown sort field falls back to the record's default.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Page size must be at least one.
    #[error("page size must be positive")]
    InvalidPageSize,

    /// Page indexes are 1-based.
    #[error("page index must be 1 or greater")]
    InvalidPageIndex,

    /// Date windows only come in 7, 30 and 90 days.
    #[error("unsupported date window of {0} days (expected 7, 30 or 90)")]
    InvalidWindowDays(u32),

    /// Sort direction string was neither `asc` nor `desc`.
    #[error("unknown sort direction '{0}' (expected asc or desc)")]
    UnknownDirection(String),
}

/// Result type for query operations.
pub type Result<T> = std::result::Result<T, QueryError>;
