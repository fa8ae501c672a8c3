//! # listkit - list screens over in-memory collections
//!
//! listkit takes a raw collection of domain records (orders, jobs, users)
//! and produces what an admin list screen shows. It provides:
//!
//! - Free-text search, categorical filters and date windows
//! - Stable sorting by any declared field, with a default-sort fallback
//! - 1-based pagination with page-button windows
//! - Id-keyed multi-select with an explicit "select all" scope
//! - Concurrent bulk actions with partial-failure reporting
//! - Generation tags that discard fetches overtaken by newer data
//!
//! ## Crates
//!
//! - [`query`] (`listkit-query`): the pure synchronous engine
//! - [`bulk`] (`listkit-bulk`): the async bulk coordinator and collaborator traits
//! - `listkit-macros`: `#[derive(Listable)]` (enable the `macros` feature)
//!
//! This crate adds [`ViewConfig`], [`ListController`] and [`SearchDebouncer`].
//!
//! ## Quick Start
//!
//! ```rust
//! use listkit::{ListController, Listable, Number, SelectScope, SortSpec, Value, ViewConfig};
//!
//! struct Order {
//!     id: u32,
//!     status: &'static str,
//!     total: u32,
//! }
//!
//! impl Listable for Order {
//!     type Id = u32;
//!
//!     fn list_id(&self) -> u32 {
//!         self.id
//!     }
//!
//!     fn list_field_value(&self, field: &str) -> Value<'_> {
//!         match field {
//!             "status" => Value::String(self.status),
//!             "total" => Value::Number(Number::from(self.total)),
//!             _ => Value::None,
//!         }
//!     }
//! }
//!
//! let orders = vec![
//!     Order { id: 1, status: "completed", total: 100 },
//!     Order { id: 2, status: "pending", total: 50 },
//!     Order { id: 3, status: "pending", total: 75 },
//! ];
//!
//! let mut screen = ListController::with_records(ViewConfig::default(), orders)?;
//! screen.set_category("status", listkit::Category::parse("pending"));
//! screen.set_sort(SortSpec::desc("total"));
//!
//! let view = screen.view()?;
//! assert_eq!(view.items.iter().map(|o| o.id).collect::<Vec<_>>(), vec![3, 2]);
//!
//! screen.select_all(SelectScope::Filtered)?;
//! assert_eq!(screen.selection().to_vec(), vec![2, 3]);
//! # Ok::<(), listkit::ListError>(())
//! ```
//!
//! ## Async collaborators
//!
//! The application implements [`RecordSource`] to load records and
//! [`RecordAction`] for per-record remote actions.
//! [`ListController::run_bulk`] fans the action out over the selection and
//! prunes the records that succeeded.
//!
//! ## Logging
//!
//! All crates emit `tracing` events and never install a subscriber. Bulk
//! batches log at `info`, per-record failures and stale fetches at `warn`,
//! unavailable sources at `error`, and view computation at `debug`.

mod config;
mod controller;
mod debounce;
mod error;

pub use config::{ViewConfig, DEFAULT_PAGE_SIZE, DEFAULT_SEARCH_DEBOUNCE_MS};
pub use controller::{BulkReport, BulkTicket, ListController, RefreshStatus, RefreshTicket};
pub use debounce::SearchDebouncer;
pub use error::ListError;

// Engine crates
pub use listkit_bulk as bulk;
pub use listkit_query as query;

pub use listkit_query::{
    compute_view, filter, page_window, paginate, sort, Category, DateWindow, Dir, FieldValue,
    FilterCriteria, ListEnum, ListTimestamp, Listable, Message, MessageLevel, Number, Page,
    PageButton, PageSlice, QueryError, SelectScope, SelectionTracker, SortSpec, Timestamp, Value,
    ViewResult, ViewState, WindowDays,
};

pub use listkit_bulk::{
    ActionError, ActionReply, BulkActionCoordinator, BulkFailure, BulkOutcome, CollectionState,
    Generation, GenerationCounter, RecordAction, RecordSource, SourceError,
};

// Listable derive macro (requires `features = ["macros"]`)
#[cfg(feature = "macros")]
pub use listkit_macros::Listable;
