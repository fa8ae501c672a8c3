//! View state and the single `compute_view` entry point.
//!
//! A list screen keeps one immutable [`ViewState`] and replaces it on every
//! interaction. [`compute_view`] runs filter, sort and pagination in order:
//!
//! ```text
//! records ──filter──▶ matched ──sort──▶ ordered ──paginate──▶ page items
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::filter::FilterCriteria;
use crate::message::Message;
use crate::page::{page_window, paginate, Page, PageButton, DEFAULT_PAGE_WINDOW};
use crate::record::Listable;
use crate::selection::SelectScope;
use crate::sort::{sort, SortSpec};
use crate::value::Timestamp;

/// Everything that decides what a list screen shows.
///
/// Transitions return a new state. Changing the filter or the page size
/// sends the user back to page 1; changing the sort keeps the page index.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewState {
    /// Active filters.
    #[serde(default)]
    pub criteria: FilterCriteria,
    /// Active sort; `None` uses the record's default sort.
    #[serde(default)]
    pub sort: Option<SortSpec>,
    /// Requested page.
    #[serde(default)]
    pub page: Page,
}

impl ViewState {
    /// Unfiltered, default-sorted first page of `page_size` records.
    pub fn new(page_size: usize) -> Result<Self> {
        Ok(ViewState {
            criteria: FilterCriteria::default(),
            sort: None,
            page: Page::first(page_size)?,
        })
    }

    /// Replaces the criteria and resets to page 1.
    pub fn with_criteria(&self, criteria: FilterCriteria) -> Self {
        ViewState {
            criteria,
            sort: self.sort.clone(),
            page: self.page.reset(),
        }
    }

    /// Replaces the search term and resets to page 1.
    pub fn with_search(&self, term: impl Into<String>) -> Self {
        self.with_criteria(self.criteria.clone().search(term))
    }

    /// Replaces the sort, keeping the page index.
    pub fn with_sort(&self, sort: SortSpec) -> Self {
        ViewState {
            sort: Some(sort),
            ..self.clone()
        }
    }

    /// Header click on `field`: flips direction on the active field,
    /// starts ascending on a new one.
    pub fn with_sort_toggled(&self, field: &str) -> Self {
        let next = match &self.sort {
            Some(current) => current.toggled(field),
            None => SortSpec::asc(field),
        };
        self.with_sort(next)
    }

    /// Moves to another page (index 0 is treated as 1).
    pub fn with_page(&self, index: usize) -> Self {
        ViewState {
            page: self.page.with_index(index),
            ..self.clone()
        }
    }

    /// Changes the page size and resets to page 1.
    pub fn with_page_size(&self, size: usize) -> Result<Self> {
        Ok(ViewState {
            page: Page::first(size)?,
            ..self.clone()
        })
    }

    /// Computes the visible page using the current time.
    pub fn compute<'a, T: Listable>(&self, records: &'a [T]) -> ViewResult<'a, T> {
        self.compute_at(records, Timestamp::now())
    }

    /// Computes the visible page at a fixed instant.
    pub fn compute_at<'a, T: Listable>(
        &self,
        records: &'a [T],
        now: Timestamp,
    ) -> ViewResult<'a, T> {
        let predicate = self.criteria.predicate_at(now);
        let matched = records.iter().filter(|record| predicate.matches(*record));

        let ordered: Vec<&'a T> = match self.sort.as_ref().or(T::default_sort().as_ref()) {
            Some(spec) => sort(matched, spec),
            None => matched.collect(),
        };
        let filtered_ids: Vec<T::Id> = ordered.iter().map(|record| record.list_id()).collect();

        let slice = paginate(&ordered, self.page);
        let mut messages = Vec::new();
        if slice.total == 0 {
            messages.push(if records.is_empty() {
                Message::info("No records yet.")
            } else {
                Message::info("No results match the current filters.")
            });
        }

        debug!(
            records = records.len(),
            matched = slice.total,
            page = slice.index,
            page_count = slice.page_count,
            "computed list view"
        );

        ViewResult {
            pages: page_window(slice.index, slice.page_count, DEFAULT_PAGE_WINDOW),
            items: slice.items,
            total: slice.total,
            unfiltered_total: records.len(),
            page_count: slice.page_count,
            index: slice.index,
            has_previous: slice.has_previous,
            has_next: slice.has_next,
            filter_summary: self.criteria.summary(),
            messages,
            filtered_ids,
        }
    }
}

/// The rendered page of a list screen.
#[derive(Debug, Clone, Serialize)]
pub struct ViewResult<'a, T: Listable> {
    /// Records on the current page.
    pub items: Vec<&'a T>,
    /// Records matching the filter, across all pages.
    pub total: usize,
    /// Records in the raw collection.
    pub unfiltered_total: usize,
    /// Number of pages, at least 1.
    pub page_count: usize,
    /// Page index actually shown (after clamping).
    pub index: usize,
    /// A previous page exists.
    pub has_previous: bool,
    /// A next page exists.
    pub has_next: bool,
    /// Page buttons for the pagination control.
    pub pages: Vec<PageButton>,
    /// Summary of active filters ("filtered by: ...").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_summary: Option<String>,
    /// Status messages, e.g. the "no results" notice.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<Message>,
    #[serde(skip)]
    filtered_ids: Vec<T::Id>,
}

impl<'a, T: Listable> ViewResult<'a, T> {
    /// Returns `true` if the current page has no records.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of records on the current page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Ids that "select all" should add for the given scope.
    pub fn visible_ids(&self, scope: SelectScope) -> Vec<T::Id> {
        match scope {
            SelectScope::Filtered => self.filtered_ids.clone(),
            SelectScope::Page => self.items.iter().map(|record| record.list_id()).collect(),
        }
    }

    /// Page buttons for a control of a different width.
    pub fn page_buttons(&self, width: usize) -> Vec<PageButton> {
        page_window(self.index, self.page_count, width)
    }
}

/// Filters, sorts and paginates `records` in one call.
///
/// ```
/// use listkit_query::{compute_view, FilterCriteria, Listable, Number, Page, SortSpec, Value};
///
/// struct Order {
///     id: u32,
///     status: &'static str,
///     total: u32,
/// }
///
/// impl Listable for Order {
///     type Id = u32;
///     fn list_id(&self) -> u32 {
///         self.id
///     }
///     fn list_field_value(&self, field: &str) -> Value<'_> {
///         match field {
///             "status" => Value::String(self.status),
///             "total" => Value::Number(Number::from(self.total)),
///             _ => Value::None,
///         }
///     }
/// }
///
/// let orders = vec![
///     Order { id: 1, status: "completed", total: 100 },
///     Order { id: 2, status: "pending", total: 50 },
/// ];
///
/// let view = compute_view(
///     &orders,
///     &FilterCriteria::new().category("status", "pending"),
///     &SortSpec::desc("total"),
///     Page::first(10).unwrap(),
/// );
/// assert_eq!(view.total, 1);
/// assert_eq!(view.items[0].id, 2);
/// ```
pub fn compute_view<'a, T: Listable>(
    records: &'a [T],
    criteria: &FilterCriteria,
    sort: &SortSpec,
    page: Page,
) -> ViewResult<'a, T> {
    ViewState {
        criteria: criteria.clone(),
        sort: Some(sort.clone()),
        page,
    }
    .compute(records)
}
