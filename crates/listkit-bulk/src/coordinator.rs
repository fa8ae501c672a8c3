//! Fan-out/fan-in of one remote action over many selected ids.
//!
//! ```text
//! ids ──▶ action(id₁) ─┐
//!     ──▶ action(id₂) ─┼──▶ wait for all ──▶ BulkOutcome { succeeded, failed }
//!     ──▶ action(id₃) ─┘
//! ```
//!
//! Every call is awaited before the outcome is returned. A failed call never
//! aborts the others and nothing is rolled back.

use std::fmt::{Debug, Display};
use std::future::Future;

use futures::future::join_all;
use futures::stream::{self, StreamExt};
use listkit_query::Message;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::action::{ActionReply, RecordAction};

const DEFAULT_REFUSAL: &str = "action was not applied";

/// One id whose action did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkFailure<Id> {
    pub id: Id,
    pub reason: String,
}

/// Aggregated result of a bulk run. Both lists keep the input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkOutcome<Id> {
    pub succeeded: Vec<Id>,
    pub failed: Vec<BulkFailure<Id>>,
}

impl<Id> Default for BulkOutcome<Id> {
    fn default() -> Self {
        BulkOutcome {
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }
}

impl<Id> BulkOutcome<Id> {
    /// Number of ids attempted.
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// `true` when at least one id was attempted and none failed.
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty() && !self.succeeded.is_empty()
    }

    pub fn is_complete_failure(&self) -> bool {
        self.succeeded.is_empty() && !self.failed.is_empty()
    }

    pub fn failed_ids(&self) -> impl Iterator<Item = &Id> {
        self.failed.iter().map(|failure| &failure.id)
    }

    /// A toast-ready summary of the run.
    pub fn summary(&self) -> Message {
        let ok = self.succeeded.len();
        let failed = self.failed.len();
        let total = self.total();

        if total == 0 {
            return Message::info("Nothing was selected.");
        }
        if failed == 0 {
            return Message::success(format!("{} of {} succeeded.", ok, total));
        }

        let first = &self.failed[0].reason;
        if ok == 0 {
            Message::error(format!("All {} failed: {}", total, first))
        } else {
            Message::warning(format!(
                "{} of {} succeeded, {} failed: {}",
                ok, total, failed, first
            ))
        }
    }
}

/// Runs an async action for every id and collects per-id results.
///
/// By default all calls are in flight at once. Use
/// [`with_concurrency_limit`](Self::with_concurrency_limit) when the remote
/// service needs backpressure.
///
/// # Example
///
/// ```
/// use listkit_bulk::{ActionError, ActionReply, BulkActionCoordinator};
///
/// # futures::executor::block_on(async {
/// let outcome = BulkActionCoordinator::new()
///     .apply(&[1, 2, 3], |id| async move {
///         if id == 2 {
///             Err(ActionError::Rejected("locked".into()))
///         } else {
///             Ok(ActionReply::ok())
///         }
///     })
///     .await;
///
/// assert_eq!(outcome.succeeded, vec![1, 3]);
/// assert_eq!(outcome.failed[0].id, 2);
/// # });
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkActionCoordinator {
    concurrency: Option<usize>,
}

impl BulkActionCoordinator {
    pub fn new() -> Self {
        BulkActionCoordinator::default()
    }

    /// Caps the number of calls in flight. A limit of 0 is treated as 1.
    pub fn with_concurrency_limit(mut self, limit: usize) -> Self {
        self.concurrency = Some(limit.max(1));
        self
    }

    pub fn concurrency_limit(&self) -> Option<usize> {
        self.concurrency
    }

    /// Calls `action` once per id and waits for every call to settle.
    ///
    /// A call fails when it returns `Err` (the reason is the error's
    /// `Display`) or a reply with `success == false` (the reason is the
    /// reply message).
    pub async fn apply<Id, F, Fut, E>(&self, ids: &[Id], action: F) -> BulkOutcome<Id>
    where
        Id: Clone + Debug,
        F: Fn(Id) -> Fut,
        Fut: Future<Output = Result<ActionReply, E>>,
        E: Display,
    {
        let calls = ids.iter().cloned().map(|id| {
            let call = action(id.clone());
            async move { (id, call.await) }
        });

        let results = match self.concurrency {
            None => join_all(calls).await,
            Some(limit) => {
                let mut indexed: Vec<_> = stream::iter(
                    calls
                        .enumerate()
                        .map(|(index, call)| async move { (index, call.await) }),
                )
                .buffer_unordered(limit)
                .collect()
                .await;
                indexed.sort_by_key(|(index, _)| *index);
                indexed.into_iter().map(|(_, result)| result).collect()
            }
        };

        let mut outcome = BulkOutcome::default();
        for (id, result) in results {
            let reason = match result {
                Ok(reply) if reply.success => {
                    outcome.succeeded.push(id);
                    continue;
                }
                Ok(reply) => reply
                    .message
                    .unwrap_or_else(|| DEFAULT_REFUSAL.to_string()),
                Err(err) => err.to_string(),
            };
            warn!(id = ?id, reason = %reason, "bulk action failed for record");
            outcome.failed.push(BulkFailure { id, reason });
        }

        info!(
            total = outcome.total(),
            succeeded = outcome.succeeded.len(),
            failed = outcome.failed.len(),
            "bulk action batch completed"
        );
        outcome
    }

    /// [`apply`](Self::apply) over a [`RecordAction`] implementation.
    pub async fn apply_action<Id, A>(&self, ids: &[Id], action: &A) -> BulkOutcome<Id>
    where
        Id: Clone + Debug + Send + 'static,
        A: RecordAction<Id> + ?Sized,
    {
        info!(action = action.name(), ids = ids.len(), "starting bulk action");
        self.apply(ids, move |id| action.perform(id)).await
    }
}
