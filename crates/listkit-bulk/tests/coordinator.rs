//! Bulk runs against simulated remote services.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use listkit_bulk::{
    ActionError, ActionReply, BulkActionCoordinator, BulkFailure, CollectionState,
    GenerationCounter, RecordAction, RecordSource, SourceError,
};
use tokio::sync::Mutex;

// ============================================================================
// Test helpers
// ============================================================================

/// Deletes ids from a shared store, rejecting any id in `locked`.
struct DeleteFromStore {
    store: Arc<Mutex<Vec<u32>>>,
    locked: Vec<u32>,
}

#[async_trait::async_trait]
impl RecordAction<u32> for DeleteFromStore {
    fn name(&self) -> &str {
        "delete"
    }

    async fn perform(&self, id: u32) -> Result<ActionReply, ActionError> {
        if self.locked.contains(&id) {
            return Err(ActionError::Rejected(format!("order {} is locked", id)));
        }
        self.store.lock().await.retain(|existing| *existing != id);
        Ok(ActionReply::ok())
    }
}

struct FlakySource {
    up: bool,
}

#[async_trait::async_trait]
impl RecordSource<u32> for FlakySource {
    async fn fetch(&self) -> Result<Vec<u32>, SourceError> {
        if self.up {
            Ok(vec![1, 2, 3])
        } else {
            Err(SourceError::Unavailable("connection refused".into()))
        }
    }
}

/// Tracks how many calls overlap.
#[derive(Default)]
struct InFlight {
    now: AtomicUsize,
    peak: AtomicUsize,
}

impl InFlight {
    fn enter(&self) {
        let now = self.now.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn leave(&self) {
        self.now.fetch_sub(1, Ordering::SeqCst);
    }
}

// ============================================================================
// Partial failure
// ============================================================================

#[tokio::test]
async fn one_rejection_does_not_stop_the_others() {
    let store = Arc::new(Mutex::new(vec![1, 2, 3, 4]));
    let action = DeleteFromStore {
        store: store.clone(),
        locked: vec![2],
    };

    let outcome = BulkActionCoordinator::new()
        .apply_action(&[1u32, 2, 3], &action)
        .await;

    assert_eq!(outcome.succeeded, vec![1, 3]);
    assert_eq!(
        outcome.failed,
        vec![BulkFailure {
            id: 2,
            reason: "rejected: order 2 is locked".to_string()
        }]
    );
    assert_eq!(*store.lock().await, vec![2, 4]);
}

#[tokio::test]
async fn refused_reply_counts_as_failure() {
    let outcome = BulkActionCoordinator::new()
        .apply(&["a", "b", "c"], |id| async move {
            match id {
                "b" => Ok::<_, ActionError>(ActionReply::refused("still processing")),
                "c" => Ok(ActionReply {
                    success: false,
                    message: None,
                }),
                _ => Ok(ActionReply::ok()),
            }
        })
        .await;

    assert_eq!(outcome.succeeded, vec!["a"]);
    let reasons: Vec<&str> = outcome.failed.iter().map(|f| f.reason.as_str()).collect();
    assert_eq!(reasons, vec!["still processing", "action was not applied"]);
}

#[tokio::test]
async fn every_input_id_is_accounted_for() {
    let ids: Vec<u32> = (1..=20).collect();
    let outcome = BulkActionCoordinator::new()
        .apply(&ids, |id| async move {
            if id % 3 == 0 {
                Err(ActionError::Other(format!("failed {}", id)))
            } else {
                Ok(ActionReply::ok())
            }
        })
        .await;

    let mut seen: Vec<u32> = outcome
        .succeeded
        .iter()
        .chain(outcome.failed_ids())
        .copied()
        .collect();
    seen.sort();
    assert_eq!(seen, ids);
    assert_eq!(outcome.failed.len(), 6);
}

#[tokio::test]
async fn empty_selection_is_a_no_op() {
    let calls = AtomicUsize::new(0);
    let outcome = BulkActionCoordinator::new()
        .apply(&[] as &[u32], |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, ActionError>(ActionReply::ok()) }
        })
        .await;

    assert_eq!(outcome.total(), 0);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

// ============================================================================
// Ordering and concurrency
// ============================================================================

#[tokio::test(start_paused = true)]
async fn results_keep_input_order_when_calls_finish_out_of_order() {
    let ids = [1u64, 2, 3, 4];
    let slow_first = |id: u64| async move {
        tokio::time::sleep(Duration::from_millis((5 - id) * 10)).await;
        Ok::<_, ActionError>(ActionReply::ok())
    };

    let unbounded = BulkActionCoordinator::new().apply(&ids, slow_first).await;
    assert_eq!(unbounded.succeeded, vec![1, 2, 3, 4]);

    let bounded = BulkActionCoordinator::new()
        .with_concurrency_limit(2)
        .apply(&ids, slow_first)
        .await;
    assert_eq!(bounded.succeeded, vec![1, 2, 3, 4]);
}

#[tokio::test(start_paused = true)]
async fn all_calls_are_in_flight_together_by_default() {
    let tracker = &InFlight::default();
    let ids: Vec<u32> = (0..8).collect();

    BulkActionCoordinator::new()
        .apply(&ids, |_| async move {
            tracker.enter();
            tokio::time::sleep(Duration::from_millis(50)).await;
            tracker.leave();
            Ok::<_, ActionError>(ActionReply::ok())
        })
        .await;

    assert_eq!(tracker.peak.load(Ordering::SeqCst), 8);
}

#[tokio::test(start_paused = true)]
async fn concurrency_limit_bounds_in_flight_calls() {
    let tracker = &InFlight::default();
    let ids: Vec<u32> = (0..8).collect();

    let outcome = BulkActionCoordinator::new()
        .with_concurrency_limit(3)
        .apply(&ids, |_| async move {
            tracker.enter();
            tokio::time::sleep(Duration::from_millis(50)).await;
            tracker.leave();
            Ok::<_, ActionError>(ActionReply::ok())
        })
        .await;

    assert_eq!(outcome.succeeded.len(), 8);
    assert_eq!(tracker.peak.load(Ordering::SeqCst), 3);
}

// ============================================================================
// Sources and generations
// ============================================================================

#[tokio::test]
async fn unavailable_source_is_not_an_empty_collection() {
    let down = CollectionState::from_fetch(FlakySource { up: false }.fetch().await);
    assert_eq!(
        down,
        CollectionState::Unavailable("service unavailable: connection refused".into())
    );

    let up = CollectionState::from_fetch(FlakySource { up: true }.fetch().await);
    assert_eq!(up.records(), Some(&[1, 2, 3][..]));
}

#[tokio::test]
async fn late_result_is_detected_as_stale() {
    let generations = Arc::new(GenerationCounter::new());
    let dispatched = generations.bump();

    let task = {
        let generations = generations.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            generations.is_current(dispatched)
        })
    };
    generations.bump();

    assert!(!task.await.unwrap());
}
