//! Error type for list screens.

use listkit_query::QueryError;
use thiserror::Error;

/// Why a list screen cannot show records.
///
/// An empty filter result is not an error: [`ListController::view`]
/// returns an empty page with a message instead.
///
/// [`ListController::view`]: crate::ListController::view
#[derive(Debug, Error)]
pub enum ListError {
    /// No load has completed yet.
    #[error("collection is still loading")]
    Loading,

    /// The collection could not be loaded.
    #[error("collection unavailable: {0}")]
    Unavailable(String),

    /// Invalid or unreadable configuration.
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Query(#[from] QueryError),
}

impl From<serde_yaml::Error> for ListError {
    fn from(err: serde_yaml::Error) -> Self {
        ListError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for ListError {
    fn from(err: serde_json::Error) -> Self {
        ListError::Config(err.to_string())
    }
}
