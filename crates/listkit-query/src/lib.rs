//! listkit-query - filtering, sorting, pagination and selection for
//! in-memory record collections.
//!
//! The crate is the synchronous half of listkit. It supports:
//!
//! - Free-text search across declared text fields (case-insensitive, OR across fields)
//! - Categorical filters with an explicit `All` sentinel
//! - Date windows of 7, 30 or 90 days around now
//! - Stable sorting by string, number, timestamp, enum or bool fields
//! - 1-based pagination with clamping and page-button windows
//! - An id-keyed selection set for bulk actions
//!
//! # Quick Start
//!
//! ```rust
//! use listkit_query::{
//!     FilterCriteria, Listable, Number, SelectScope, SelectionTracker, SortSpec, Value, ViewState,
//! };
//!
//! struct User {
//!     id: u32,
//!     name: String,
//!     role: String,
//! }
//!
//! impl Listable for User {
//!     type Id = u32;
//!
//!     fn list_id(&self) -> u32 {
//!         self.id
//!     }
//!
//!     fn list_field_value(&self, field: &str) -> Value<'_> {
//!         match field {
//!             "id" => Value::Number(Number::from(self.id)),
//!             "name" => Value::String(&self.name),
//!             "role" => Value::String(&self.role),
//!             _ => Value::None,
//!         }
//!     }
//!
//!     fn search_fields() -> &'static [&'static str] {
//!         &["name"]
//!     }
//! }
//!
//! let users = vec![
//!     User { id: 1, name: "Ann".into(), role: "admin".into() },
//!     User { id: 2, name: "Bob".into(), role: "staff".into() },
//!     User { id: 3, name: "Bea".into(), role: "staff".into() },
//! ];
//!
//! let state = ViewState::new(10)
//!     .unwrap()
//!     .with_criteria(FilterCriteria::new().search("b").category("role", "staff"))
//!     .with_sort(SortSpec::asc("name"));
//!
//! let view = state.compute(&users);
//! assert_eq!(view.total, 2);
//! assert_eq!(view.items[0].name, "Bea");
//!
//! let mut selection = SelectionTracker::new();
//! selection.select_all_visible(view.visible_ids(SelectScope::Filtered));
//! assert_eq!(selection.len(), 2);
//! ```
//!
//! # Pipeline
//!
//! ```text
//! raw records ─▶ filter (criteria) ─▶ sort (spec) ─▶ paginate (page) ─▶ visible page
//!                      │
//!                      └─▶ filtered ids ─▶ "select all" (SelectScope::Filtered)
//! ```
//!
//! Selection is stored by id and is independent of the current page and
//! filter.

mod error;
mod filter;
mod message;
mod page;
mod record;
mod selection;
mod sort;
mod value;
mod view;

pub use error::{QueryError, Result};
pub use filter::{
    filter, filter_at, Category, DateWindow, FilterCriteria, FilterPredicate, WindowDays,
};
pub use message::{Message, MessageLevel};
pub use page::{page_window, paginate, Page, PageButton, PageSlice, DEFAULT_PAGE_WINDOW};
pub use record::{ListEnum, ListTimestamp, Listable};
pub use selection::{SelectScope, SelectionTracker};
pub use sort::{compare_strings, compare_values, is_sortable, resolve_sort, sort, Dir, SortSpec};
pub use value::{FieldValue, Number, Timestamp, Value, MILLIS_PER_DAY};
pub use view::{compute_view, ViewResult, ViewState};
