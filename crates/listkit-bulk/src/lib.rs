//! listkit-bulk - concurrent bulk actions for list screens.
//!
//! This is the async half of listkit. It provides:
//!
//! - [`BulkActionCoordinator`]: apply a remote action to every selected id
//!   concurrently and aggregate partial success
//! - [`RecordSource`] / [`RecordAction`]: collaborator traits implemented by
//!   the application's API client
//! - [`CollectionState`]: loading, loaded and unavailable collections
//! - [`GenerationCounter`]: tags for discarding stale async results
//!
//! The crate does not pick a runtime. Futures are driven by whatever the
//! caller uses (tokio in the bundled example).
//!
//! # Example
//!
//! ```
//! use listkit_bulk::{ActionError, ActionReply, BulkActionCoordinator, RecordAction};
//!
//! struct DeleteOrder;
//!
//! #[async_trait::async_trait]
//! impl RecordAction<u32> for DeleteOrder {
//!     fn name(&self) -> &str {
//!         "delete"
//!     }
//!
//!     async fn perform(&self, id: u32) -> Result<ActionReply, ActionError> {
//!         if id == 2 {
//!             Err(ActionError::Rejected("order already shipped".into()))
//!         } else {
//!             Ok(ActionReply::ok())
//!         }
//!     }
//! }
//!
//! # futures::executor::block_on(async {
//! let outcome = BulkActionCoordinator::new()
//!     .apply_action(&[1u32, 2, 3], &DeleteOrder)
//!     .await;
//!
//! assert_eq!(outcome.succeeded, vec![1, 3]);
//! assert_eq!(outcome.failed[0].reason, "rejected: order already shipped");
//! # });
//! ```

mod action;
mod coordinator;
mod error;
mod generation;
mod state;

pub use action::{ActionReply, RecordAction, RecordSource};
pub use coordinator::{BulkActionCoordinator, BulkFailure, BulkOutcome};
pub use error::{ActionError, SourceError};
pub use generation::{Generation, GenerationCounter};
pub use state::CollectionState;
