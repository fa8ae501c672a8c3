//! The owning layer of a list screen.
//!
//! [`ListController`] holds everything a screen needs between interactions:
//! the loaded collection, the immutable [`ViewState`], the selection and a
//! data generation counter. Input changes only replace the view state: a
//! fetch returns the whole collection and a bulk outcome is keyed by id, so
//! neither depends on search, sort or page. Dispatching a refresh or a bulk
//! run bumps the generation, and so does applying a bulk outcome, so a
//! fetch that overlapped either is dropped rather than resurrecting rows.
//!
//! Async operations come in two forms:
//!
//! - `refresh` / `run_bulk` run start to finish while holding `&mut self`
//! - `begin_*` / `finish_*` split dispatch from completion, for callers that
//!   keep the controller behind a lock and release it while awaiting
//!
//! ```text
//! begin_refresh ──▶ (await fetch, lock released) ──▶ finish_refresh
//!      │                                                  │
//!      └── generation #7               current still #7? ─┴─▶ apply / discard
//! ```

use std::collections::BTreeSet;

use listkit_bulk::{
    BulkActionCoordinator, BulkOutcome, CollectionState, Generation, GenerationCounter,
    RecordAction, RecordSource, SourceError,
};
use listkit_query::{
    Category, DateWindow, Listable, Message, SelectScope, SelectionTracker, SortSpec, Timestamp,
    ViewResult, ViewState,
};
use tracing::{debug, info, warn};

use crate::config::ViewConfig;
use crate::error::ListError;

/// Result of applying a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshStatus {
    /// Records replaced; carries the new record count.
    Loaded(usize),
    /// The source failed; the screen now shows an error state.
    Unavailable,
    /// Inputs changed while the fetch was in flight; result dropped.
    Stale,
}

/// A refresh that has been dispatched but not yet applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket {
    pub generation: Generation,
}

/// A bulk run that has been dispatched but not yet applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkTicket<Id> {
    pub generation: Generation,
    /// Selected ids at dispatch, ascending.
    pub ids: Vec<Id>,
}

/// What a bulk run did to the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkReport<Id> {
    pub outcome: BulkOutcome<Id>,
    /// Toast for the user.
    pub message: Message,
}

/// State machine behind one list screen.
#[derive(Debug)]
pub struct ListController<T: Listable> {
    config: ViewConfig,
    collection: CollectionState<T>,
    state: ViewState,
    selection: SelectionTracker<T::Id>,
    generations: GenerationCounter,
    coordinator: BulkActionCoordinator,
}

impl<T: Listable> ListController<T> {
    /// A controller waiting for its first load.
    pub fn new(config: ViewConfig) -> Result<Self, ListError> {
        config.validate()?;
        Ok(ListController {
            state: config.initial_state()?,
            coordinator: config.coordinator(),
            config,
            collection: CollectionState::Loading,
            selection: SelectionTracker::new(),
            generations: GenerationCounter::new(),
        })
    }

    /// A controller over records that are already loaded.
    pub fn with_records(config: ViewConfig, records: Vec<T>) -> Result<Self, ListError> {
        let mut controller = ListController::new(config)?;
        controller.collection = CollectionState::Ready(records);
        Ok(controller)
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn collection(&self) -> &CollectionState<T> {
        &self.collection
    }

    pub fn selection(&self) -> &SelectionTracker<T::Id> {
        &self.selection
    }

    pub fn generation(&self) -> Generation {
        self.generations.current()
    }

    // ------------------------------------------------------------------
    // View state transitions
    // ------------------------------------------------------------------

    /// Replaces the whole view state, e.g. one restored from a URL.
    pub fn set_state(&mut self, state: ViewState) {
        self.state = state;
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        let next = self.state.with_search(term);
        self.set_state(next);
    }

    pub fn set_category(&mut self, field: impl Into<String>, category: Category) {
        let criteria = self.state.criteria.clone().set_category(field, category);
        let next = self.state.with_criteria(criteria);
        self.set_state(next);
    }

    pub fn set_date_window(&mut self, window: DateWindow) {
        let mut criteria = self.state.criteria.clone();
        criteria.date_window = window;
        let next = self.state.with_criteria(criteria);
        self.set_state(next);
    }

    pub fn set_sort(&mut self, sort: SortSpec) {
        let next = self.state.with_sort(sort);
        self.set_state(next);
    }

    /// Column header click.
    pub fn toggle_sort(&mut self, field: &str) {
        let next = self.state.with_sort_toggled(field);
        self.set_state(next);
    }

    pub fn set_page(&mut self, index: usize) {
        let next = self.state.with_page(index);
        self.set_state(next);
    }

    pub fn set_page_size(&mut self, size: usize) -> Result<(), ListError> {
        let next = self.state.with_page_size(size)?;
        self.set_state(next);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    /// The current page.
    ///
    /// Fails while loading and after a failed load. A filter that matches
    /// nothing is an empty page, not an error.
    pub fn view(&self) -> Result<ViewResult<'_, T>, ListError> {
        self.view_at(Timestamp::now())
    }

    /// [`view`](Self::view) at a fixed instant.
    pub fn view_at(&self, now: Timestamp) -> Result<ViewResult<'_, T>, ListError> {
        match &self.collection {
            CollectionState::Loading => Err(ListError::Loading),
            CollectionState::Unavailable(reason) => Err(ListError::Unavailable(reason.clone())),
            CollectionState::Ready(records) => {
                let mut view = self.state.compute_at(records, now);
                view.pages = view.page_buttons(self.config.page_window);
                Ok(view)
            }
        }
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    pub fn toggle(&mut self, id: T::Id) -> bool {
        self.selection.toggle(id)
    }

    /// Selects every id in `scope`. Returns the selection size.
    pub fn select_all(&mut self, scope: SelectScope) -> Result<usize, ListError> {
        let ids = self.view()?.visible_ids(scope);
        self.selection.select_all_visible(ids);
        Ok(self.selection.len())
    }

    /// [`select_all`](Self::select_all) with the configured scope.
    pub fn select_all_default(&mut self) -> Result<usize, ListError> {
        self.select_all(self.config.select_scope)
    }

    /// Header checkbox: clears `scope` when fully selected, fills it otherwise.
    pub fn toggle_all(&mut self, scope: SelectScope) -> Result<(), ListError> {
        let ids = self.view()?.visible_ids(scope);
        self.selection.toggle_all_visible(&ids);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Starts a fetch. Any earlier in-flight fetch becomes stale.
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        RefreshTicket {
            generation: self.generations.bump(),
        }
    }

    /// Applies a fetch result unless another refresh or a bulk run was
    /// dispatched, or a bulk outcome applied, since this one started.
    pub fn finish_refresh(
        &mut self,
        ticket: RefreshTicket,
        result: Result<Vec<T>, SourceError>,
    ) -> RefreshStatus {
        if !self.generations.is_current(ticket.generation) {
            warn!(
                dispatched = %ticket.generation,
                current = %self.generations.current(),
                "discarding stale fetch result"
            );
            return RefreshStatus::Stale;
        }

        self.collection = CollectionState::from_fetch(result);
        match self.collection.records() {
            Some(records) => {
                let existing: BTreeSet<T::Id> =
                    records.iter().map(|record| record.list_id()).collect();
                self.selection.retain_existing(&existing);
                debug!(records = records.len(), "collection loaded");
                RefreshStatus::Loaded(records.len())
            }
            None => RefreshStatus::Unavailable,
        }
    }

    /// Fetches from `source` and applies the result.
    pub async fn refresh<S>(&mut self, source: &S) -> RefreshStatus
    where
        S: RecordSource<T> + ?Sized,
        T: Send + 'static,
    {
        let ticket = self.begin_refresh();
        let result = source.fetch().await;
        self.finish_refresh(ticket, result)
    }

    // ------------------------------------------------------------------
    // Bulk actions
    // ------------------------------------------------------------------

    /// Snapshots the selection for a bulk run. In-flight fetches become
    /// stale, since they may read rows the run is about to delete.
    pub fn begin_bulk(&mut self) -> BulkTicket<T::Id> {
        BulkTicket {
            generation: self.generations.bump(),
            ids: self.selection.to_vec(),
        }
    }

    /// Applies a bulk outcome.
    ///
    /// The remote side effects have already happened, so the outcome is
    /// applied even when the view or the data moved on meanwhile: succeeded
    /// ids leave the collection and the selection, and a complete success
    /// clears the selection. Any fetch still in flight becomes stale.
    pub fn finish_bulk(
        &mut self,
        ticket: BulkTicket<T::Id>,
        outcome: BulkOutcome<T::Id>,
    ) -> BulkReport<T::Id> {
        let message = outcome.summary();

        if !self.generations.is_current(ticket.generation) {
            debug!(
                dispatched = %ticket.generation,
                current = %self.generations.current(),
                "bulk outcome arrived after a newer dispatch"
            );
        }

        let removed: BTreeSet<T::Id> = outcome.succeeded.iter().cloned().collect();
        if !removed.is_empty() {
            if let Some(records) = self.collection.records_mut() {
                records.retain(|record| !removed.contains(&record.list_id()));
            }
            self.generations.bump();
        }
        if outcome.is_complete_success() {
            self.selection.clear();
        } else {
            self.selection.remove_many(&outcome.succeeded);
        }

        info!(
            removed = removed.len(),
            still_selected = self.selection.len(),
            "bulk result applied"
        );
        BulkReport { outcome, message }
    }

    /// Runs `action` over the selected ids and applies the outcome.
    pub async fn run_bulk<A>(&mut self, action: &A) -> BulkReport<T::Id>
    where
        A: RecordAction<T::Id> + ?Sized,
        T::Id: Send + 'static,
    {
        let ticket = self.begin_bulk();
        let coordinator = self.coordinator;
        let outcome = coordinator.apply_action(&ticket.ids, action).await;
        self.finish_bulk(ticket, outcome)
    }
}
