//! Errors reported by remote collaborators.

use thiserror::Error;

/// Failure to load a collection.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    /// The backing service could not be reached.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// The caller is not allowed to read the collection.
    #[error("not authorized")]
    Unauthorized,

    /// The service refused the request.
    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("{0}")]
    Other(String),
}

/// Failure of a single per-record action call.
///
/// Bulk runs never surface this as an error; it becomes the `reason` of a
/// [`BulkFailure`](crate::BulkFailure).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ActionError {
    /// The backing service could not be reached.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// The caller is not allowed to act on the record.
    #[error("not authorized")]
    Unauthorized,

    /// The service refused the action for this record.
    #[error("rejected: {0}")]
    Rejected(String),

    #[error("{0}")]
    Other(String),
}
