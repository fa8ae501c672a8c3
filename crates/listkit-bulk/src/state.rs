//! Load state of a list screen's collection.

use tracing::error;

use crate::error::SourceError;

/// Where the raw collection stands.
///
/// `Unavailable` is a failed load and renders an error state. It is never
/// the same thing as a filter that matched nothing.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CollectionState<T> {
    /// No load has completed yet.
    #[default]
    Loading,
    /// Records are loaded.
    Ready(Vec<T>),
    /// The last load failed.
    Unavailable(String),
}

impl<T> CollectionState<T> {
    /// Converts a fetch result, logging failures.
    pub fn from_fetch(result: Result<Vec<T>, SourceError>) -> Self {
        match result {
            Ok(records) => CollectionState::Ready(records),
            Err(err) => {
                error!(error = %err, "collection unavailable");
                CollectionState::Unavailable(err.to_string())
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, CollectionState::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, CollectionState::Ready(_))
    }

    /// The loaded records, if any.
    pub fn records(&self) -> Option<&[T]> {
        match self {
            CollectionState::Ready(records) => Some(records),
            _ => None,
        }
    }

    pub fn records_mut(&mut self) -> Option<&mut Vec<T>> {
        match self {
            CollectionState::Ready(records) => Some(records),
            _ => None,
        }
    }
}
