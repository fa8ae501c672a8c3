//! Multi-select state for bulk actions.
//!
//! Selection is keyed by record id, never by row position, so it survives
//! sorting, paging and filtering. An id hidden by the current filter stays
//! selected until it is toggled off, cleared, or pruned after a bulk action.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Which ids "select all" applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectScope {
    /// Every record matching the current filter, across all pages.
    #[default]
    Filtered,
    /// Only the records on the current page.
    Page,
}

/// The set of record ids chosen for a bulk action.
///
/// # Example
///
/// ```
/// use listkit_query::SelectionTracker;
///
/// let mut selection = SelectionTracker::new();
/// selection.select_all_visible([1, 2, 3]);
/// selection.toggle(2);
/// selection.select_all_visible([1, 2, 3]);
///
/// assert_eq!(selection.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "Id: Serialize + Ord",
    deserialize = "Id: Deserialize<'de> + Ord"
))]
pub struct SelectionTracker<Id> {
    selected: BTreeSet<Id>,
}

impl<Id: Ord> Default for SelectionTracker<Id> {
    fn default() -> Self {
        SelectionTracker {
            selected: BTreeSet::new(),
        }
    }
}

impl<Id: Ord + Clone> SelectionTracker<Id> {
    /// An empty selection.
    pub fn new() -> Self {
        SelectionTracker::default()
    }

    /// Flips one id's membership. Returns `true` if the id is now selected.
    pub fn toggle(&mut self, id: Id) -> bool {
        if self.selected.remove(&id) {
            false
        } else {
            self.selected.insert(id);
            true
        }
    }

    /// Adds every visible id. Ids outside `visible` keep their state.
    pub fn select_all_visible<I>(&mut self, visible: I)
    where
        I: IntoIterator<Item = Id>,
    {
        self.selected.extend(visible);
    }

    /// Removes every visible id. Ids outside `visible` keep their state.
    pub fn deselect_all_visible<I>(&mut self, visible: I)
    where
        I: IntoIterator<Item = Id>,
    {
        for id in visible {
            self.selected.remove(&id);
        }
    }

    /// Header-checkbox behavior: deselects the visible ids when all of them
    /// are already selected, selects them all otherwise.
    pub fn toggle_all_visible(&mut self, visible: &[Id]) {
        if self.all_selected(visible) {
            self.deselect_all_visible(visible.iter().cloned());
        } else {
            self.select_all_visible(visible.iter().cloned());
        }
    }

    /// `true` when `visible` is non-empty and every id in it is selected.
    pub fn all_selected(&self, visible: &[Id]) -> bool {
        !visible.is_empty() && visible.iter().all(|id| self.selected.contains(id))
    }

    /// Drops every selected id.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Drops the given ids, e.g. the ones a bulk action just deleted.
    pub fn remove_many<'a, I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = &'a Id>,
        Id: 'a,
    {
        for id in ids {
            self.selected.remove(id);
        }
    }

    /// Keeps only ids that still exist in the collection.
    pub fn retain_existing(&mut self, existing: &BTreeSet<Id>) {
        self.selected.retain(|id| existing.contains(id));
    }

    /// Membership test.
    pub fn is_selected(&self, id: &Id) -> bool {
        self.selected.contains(id)
    }

    /// The selected ids in ascending order.
    pub fn selected_ids(&self) -> &BTreeSet<Id> {
        &self.selected
    }

    /// Selected ids as an owned list, ready to hand to a bulk action.
    pub fn to_vec(&self) -> Vec<Id> {
        self.selected.iter().cloned().collect()
    }

    /// Number of selected ids.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// `true` when nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[u32]) -> BTreeSet<u32> {
        ids.iter().copied().collect()
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut selection = SelectionTracker::new();
        assert!(selection.toggle(7));
        assert!(selection.is_selected(&7));
        assert!(!selection.toggle(7));
        assert!(!selection.is_selected(&7));
        assert!(selection.is_empty());
    }

    #[test]
    fn select_all_toggle_select_all_restores() {
        let mut selection = SelectionTracker::new();
        selection.select_all_visible([1, 2, 3]);
        assert_eq!(selection.selected_ids(), &set(&[1, 2, 3]));

        selection.toggle(2);
        assert_eq!(selection.selected_ids(), &set(&[1, 3]));

        selection.select_all_visible([1, 2, 3]);
        assert_eq!(selection.selected_ids(), &set(&[1, 2, 3]));
        assert_eq!(selection.len(), 3);
    }

    #[test]
    fn hidden_ids_stay_selected() {
        let mut selection = SelectionTracker::new();
        selection.toggle(9);
        selection.select_all_visible([1, 2]);
        selection.deselect_all_visible([1, 2]);
        assert_eq!(selection.selected_ids(), &set(&[9]));
    }

    #[test]
    fn header_checkbox_toggles_visible_only() {
        let mut selection = SelectionTracker::new();
        selection.toggle(9);
        selection.toggle_all_visible(&[1, 2]);
        assert_eq!(selection.selected_ids(), &set(&[1, 2, 9]));
        assert!(selection.all_selected(&[1, 2]));

        selection.toggle_all_visible(&[1, 2]);
        assert_eq!(selection.selected_ids(), &set(&[9]));
        assert!(!selection.all_selected(&[]));
    }

    #[test]
    fn prune_after_bulk_action() {
        let mut selection = SelectionTracker::new();
        selection.select_all_visible([1, 2, 3, 4]);
        selection.remove_many(&[1, 3]);
        assert_eq!(selection.to_vec(), vec![2, 4]);

        selection.retain_existing(&set(&[4, 5]));
        assert_eq!(selection.to_vec(), vec![4]);

        selection.clear();
        assert!(selection.is_empty());
    }

    #[test]
    fn string_ids() {
        let mut selection: SelectionTracker<String> = SelectionTracker::new();
        selection.select_all_visible(["b".to_string(), "a".to_string()]);
        assert_eq!(selection.to_vec(), vec!["a".to_string(), "b".to_string()]);
    }
}
