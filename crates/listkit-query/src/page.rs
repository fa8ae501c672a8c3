//! Pagination and page-button windowing.
//!
//! Page indexes are 1-based. The engine clamps any index beyond the last
//! page back into range, but callers should still reset to page 1 whenever
//! the filter changes; [`ViewState::with_criteria`](crate::ViewState::with_criteria)
//! does exactly that. Without the reset a user on page 7 who narrows the
//! search lands on whatever the last page happens to be.

use serde::{Deserialize, Serialize};

use crate::error::{QueryError, Result};

/// Default number of page buttons shown by [`page_window`].
pub const DEFAULT_PAGE_WINDOW: usize = 5;

/// A requested page: 1-based index and positive size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPage")]
pub struct Page {
    index: usize,
    size: usize,
}

#[derive(Deserialize)]
struct RawPage {
    index: usize,
    size: usize,
}

impl TryFrom<RawPage> for Page {
    type Error = QueryError;

    fn try_from(raw: RawPage) -> Result<Self> {
        Page::new(raw.index, raw.size)
    }
}

impl Page {
    /// Creates a page, rejecting a zero index or size.
    pub fn new(index: usize, size: usize) -> Result<Self> {
        if size == 0 {
            return Err(QueryError::InvalidPageSize);
        }
        if index == 0 {
            return Err(QueryError::InvalidPageIndex);
        }
        Ok(Page { index, size })
    }

    /// First page of the given size.
    pub fn first(size: usize) -> Result<Self> {
        Page::new(1, size)
    }

    /// The 1-based page index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Records per page.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Same size, different index (a zero index becomes 1).
    pub fn with_index(self, index: usize) -> Self {
        Page {
            index: index.max(1),
            ..self
        }
    }

    /// Back to the first page.
    pub fn reset(self) -> Self {
        self.with_index(1)
    }

    /// Number of pages needed for `total` records; never less than 1.
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.size).max(1)
    }

    /// Clamps the index into `[1, page_count(total)]`.
    pub fn clamp(self, total: usize) -> Self {
        let last = self.page_count(total);
        self.with_index(self.index.min(last))
    }
}

impl Default for Page {
    fn default() -> Self {
        Page { index: 1, size: 10 }
    }
}

/// One page of an ordered collection plus navigation metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSlice<T> {
    /// Records on this page.
    pub items: Vec<T>,
    /// Records across all pages.
    pub total: usize,
    /// Number of pages, at least 1.
    pub page_count: usize,
    /// The (clamped) page index the items came from.
    pub index: usize,
    /// A page exists before this one.
    pub has_previous: bool,
    /// A page exists after this one.
    pub has_next: bool,
}

/// Slices `ordered` into the requested page.
///
/// An index past the last page is clamped to the last page.
pub fn paginate<T: Clone>(ordered: &[T], page: Page) -> PageSlice<T> {
    let total = ordered.len();
    let page = page.clamp(total);
    let page_count = page.page_count(total);

    let start = ((page.index - 1) * page.size).min(total);
    let end = (page.index * page.size).min(total);

    PageSlice {
        items: ordered[start..end].to_vec(),
        total,
        page_count,
        index: page.index,
        has_previous: page.index > 1,
        has_next: page.index < page_count,
    }
}

/// A pagination control element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageButton {
    /// A numbered page button.
    Page(usize),
    /// More pages follow that are not shown.
    Ellipsis,
}

/// Up to `width` contiguous page numbers centred on `current`, followed by
/// an ellipsis when more pages exist past the window.
///
/// ```
/// use listkit_query::{page_window, PageButton};
///
/// assert_eq!(
///     page_window(1, 9, 5),
///     vec![
///         PageButton::Page(1),
///         PageButton::Page(2),
///         PageButton::Page(3),
///         PageButton::Page(4),
///         PageButton::Page(5),
///         PageButton::Ellipsis,
///     ]
/// );
/// ```
pub fn page_window(current: usize, page_count: usize, width: usize) -> Vec<PageButton> {
    let page_count = page_count.max(1);
    let width = width.max(1);
    let current = current.clamp(1, page_count);

    if page_count <= width {
        return (1..=page_count).map(PageButton::Page).collect();
    }

    let half = (width - 1) / 2;
    let mut start = current.saturating_sub(half).max(1);
    let end = (start + width - 1).min(page_count);
    start = end + 1 - width;

    let mut buttons: Vec<PageButton> = (start..=end).map(PageButton::Page).collect();
    if end < page_count {
        buttons.push(PageButton::Ellipsis);
    }
    buttons
}
