//! Generation tags for discarding stale async results.
//!
//! Every change to the inputs of a list screen bumps the counter. An async
//! task remembers the generation it was started under and, when it
//! completes, checks [`GenerationCounter::is_current`] before publishing.
//! Nothing is cancelled; late results are simply dropped.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// A point in the history of a screen's state.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Generation(u64);

impl Generation {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic counter shared between a screen and its in-flight tasks.
#[derive(Debug, Default)]
pub struct GenerationCounter {
    current: AtomicU64,
}

impl GenerationCounter {
    pub fn new() -> Self {
        GenerationCounter::default()
    }

    /// Starts a new generation and returns it.
    pub fn bump(&self) -> Generation {
        Generation(self.current.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn current(&self) -> Generation {
        Generation(self.current.load(Ordering::SeqCst))
    }

    /// `true` if no bump happened since `generation` was taken.
    pub fn is_current(&self, generation: Generation) -> bool {
        self.current() == generation
    }
}
