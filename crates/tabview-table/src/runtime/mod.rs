//! Table runtime split into submodules
//!
//! `TableRuntime` owns the canonical rows handed over by the host together with the filter,
//! sort, pagination, selection and edit state. The derived view is a list of indices into
//! the canonical rows, recomputed from scratch after every change.

use std::sync::Arc;

use chrono::Utc;
use tabview_core::{Row, RowId};

use crate::actions::{AutoConfirm, ConfirmPrompt};
use crate::config::{ColumnDescriptor, StatusDisplay, TableConfig};
use crate::debounce::SearchDebouncer;
use crate::editing::EditSession;
use crate::events::TableEvent;
use crate::filter_types::{FilterState, SortSpec};
use crate::filtering::{FilterPlan, run_pipeline};
use crate::pagination::PaginationState;
use crate::persistence::{FilterPersistence, FilterStore};
use crate::selection::SelectionModel;
use crate::sorting::sort_indices;

// Submodules
mod actions;
mod editing;
mod export;
mod filters;
mod pagination;
mod selection;
mod sorting;

/// Which placeholder (if any) replaces the table body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Loading,
    Error,
    AccessDenied,
    /// No rows at all and nothing filtering
    Empty,
    /// Rows exist but the active filters hide all of them
    NoResults,
    Populated,
}

impl ViewState {
    pub fn label(&self) -> &'static str {
        match self {
            ViewState::Loading => "loading",
            ViewState::Error => "error",
            ViewState::AccessDenied => "access denied",
            ViewState::Empty => "empty",
            ViewState::NoResults => "no results",
            ViewState::Populated => "populated",
        }
    }
}

/// Live state of one table
pub struct TableRuntime {
    config: TableConfig,
    plan: FilterPlan,

    /// Canonical rows, in host order
    rows: Vec<Row>,
    /// Identity of `rows[0]`; row `i` is `RowId(id_base + i)`
    id_base: u64,

    filters: FilterState,
    sort: Option<SortSpec>,
    /// Filtered and sorted indices into `rows`, before pagination
    view: Vec<usize>,

    pagination: PaginationState,
    selection: SelectionModel,
    debouncer: SearchDebouncer,
    edit: Option<EditSession>,
    persistence: Option<FilterPersistence>,
    confirm: Arc<dyn ConfirmPrompt>,
    /// Roles of the current viewer, used by column and action visibility
    roles: Vec<String>,

    loading: bool,
    error: Option<String>,
    access_denied: bool,
    /// Filters applied outside the runtime (e.g. server side) reported by the host
    external_filter_count: usize,

    events: Vec<TableEvent>,
}

impl std::fmt::Debug for TableRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableRuntime")
            .field("table_id", &self.config.table_id)
            .field("rows", &self.rows.len())
            .field("view", &self.view.len())
            .field("filters", &self.filters)
            .field("sort", &self.sort)
            .field("page", &self.pagination.info())
            .field("selected", &self.selection.len())
            .field("editing", &self.edit.as_ref().map(|s| s.row_id()))
            .finish_non_exhaustive()
    }
}

impl TableRuntime {
    pub fn new(config: TableConfig) -> Self {
        let plan = FilterPlan::from_config(&config);
        let pagination = PaginationState::new(&config.pagination);
        let selection = SelectionModel::from_config(&config.selection);
        let debouncer = SearchDebouncer::from_millis(config.filtering.search_debounce_ms);

        let sort = if config.sorting.enabled {
            config
                .sorting
                .default_sort
                .clone()
                .filter(|spec| Self::sortable_in(&config, &spec.field))
        } else {
            None
        };

        let mut runtime = Self {
            config,
            plan,
            rows: Vec::new(),
            id_base: 0,
            filters: FilterState::new(),
            sort,
            view: Vec::new(),
            pagination,
            selection,
            debouncer,
            edit: None,
            persistence: None,
            confirm: Arc::new(AutoConfirm),
            roles: Vec::new(),
            loading: false,
            error: None,
            access_denied: false,
            external_filter_count: 0,
            events: Vec::new(),
        };
        runtime.refresh_view();
        runtime
    }

    pub fn with_rows(mut self, rows: Vec<Row>) -> Self {
        self.set_rows(rows);
        self.events.clear();
        self
    }

    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_confirm_prompt(mut self, prompt: impl ConfirmPrompt + 'static) -> Self {
        self.confirm = Arc::new(prompt);
        self
    }

    /// Attach durable filter storage and restore any persisted filters right away
    ///
    /// Ignored unless `filtering.persist_filters` is set and a storage key can be derived.
    pub fn with_filter_store(mut self, store: Arc<dyn FilterStore>) -> Self {
        self.persistence = FilterPersistence::for_config(&self.config, store);
        self.restore_filters_at(Utc::now());
        self.events.clear();
        self
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    pub fn set_roles(&mut self, roles: Vec<String>) {
        self.roles = roles;
    }

    /// Replace the canonical rows, keeping filters, sort and selection state
    ///
    /// Every supplied row gets a fresh identity, so selections and an open edit session
    /// from the previous collection no longer resolve.
    pub fn set_rows(&mut self, rows: Vec<Row>) {
        self.id_base = self.id_base.saturating_add(self.rows.len() as u64);
        self.rows = rows;

        if let Some(session) = &self.edit {
            if self.row_index(session.row_id()).is_none() {
                tracing::debug!(row = %session.row_id(), "dropping edit session for a row that was reloaded");
                self.edit = None;
            }
        }

        self.refresh_view();
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_access_denied(&mut self, denied: bool) {
        self.access_denied = denied;
    }

    pub fn set_external_filter_count(&mut self, count: usize) {
        self.external_filter_count = count;
    }

    /// Canonical rows
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_id_at(&self, index: usize) -> Option<RowId> {
        (index < self.rows.len()).then(|| RowId(self.id_base + index as u64))
    }

    /// Canonical position of a row, if the identity belongs to the current collection
    pub fn row_index(&self, id: RowId) -> Option<usize> {
        let offset = id.0.checked_sub(self.id_base)?;
        let index = usize::try_from(offset).ok()?;
        (index < self.rows.len()).then_some(index)
    }

    pub fn row(&self, id: RowId) -> Option<&Row> {
        self.row_index(id).and_then(|index| self.rows.get(index))
    }

    pub fn row_ids(&self) -> Vec<RowId> {
        (0..self.rows.len()).filter_map(|i| self.row_id_at(i)).collect()
    }

    /// Identities of the filtered and sorted view, across all pages
    pub fn view_ids(&self) -> Vec<RowId> {
        self.view.iter().filter_map(|&i| self.row_id_at(i)).collect()
    }

    /// Filtered and sorted rows, across all pages
    pub fn view_rows(&self) -> Vec<&Row> {
        self.view.iter().filter_map(|&i| self.rows.get(i)).collect()
    }

    pub fn view_len(&self) -> usize {
        self.view.len()
    }

    /// Rows of the current page with their identities
    pub fn page_rows(&self) -> Vec<(RowId, &Row)> {
        let range = self.pagination.page_range();
        self.view
            .get(range)
            .unwrap_or_default()
            .iter()
            .filter_map(|&i| Some((self.row_id_at(i)?, self.rows.get(i)?)))
            .collect()
    }

    /// Columns the current viewer may see
    pub fn visible_columns(&self) -> Vec<&ColumnDescriptor> {
        self.config
            .columns
            .iter()
            .filter(|column| column.visible_for(&self.roles))
            .collect()
    }

    pub fn status_display(&self, row: &Row) -> Option<&StatusDisplay> {
        self.config.status_display(row)
    }

    /// Whether any filter narrows the view, including host-reported external ones
    pub fn has_active_filters(&self) -> bool {
        self.filters.is_filtering() || self.external_filter_count > 0
    }

    fn is_settled(&self) -> bool {
        !self.loading && self.error.is_none() && !self.access_denied
    }

    pub fn should_show_empty_state(&self) -> bool {
        self.is_settled() && self.rows.is_empty() && !self.has_active_filters()
    }

    pub fn should_show_no_results_state(&self) -> bool {
        self.is_settled() && self.view.is_empty() && self.has_active_filters()
    }

    pub fn view_state(&self) -> ViewState {
        if self.loading {
            ViewState::Loading
        } else if self.error.is_some() {
            ViewState::Error
        } else if self.access_denied {
            ViewState::AccessDenied
        } else if self.should_show_no_results_state() {
            ViewState::NoResults
        } else if self.view.is_empty() {
            // With no active filter the view is empty only when there are no rows
            ViewState::Empty
        } else {
            ViewState::Populated
        }
    }

    /// Take every queued event
    pub fn drain_events(&mut self) -> Vec<TableEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending_events(&self) -> &[TableEvent] {
        &self.events
    }

    fn emit(&mut self, event: TableEvent) {
        tracing::trace!(kind = event.kind(), "table event");
        self.events.push(event);
    }

    fn sortable_in(config: &TableConfig, field: &str) -> bool {
        match config.column(field) {
            Some(column) if column.sortable => true,
            Some(_) => {
                tracing::debug!(field = %field, "ignoring sort on a non-sortable column");
                false
            }
            None => {
                tracing::debug!(field = %field, "ignoring sort on an unknown column");
                false
            }
        }
    }

    /// Recompute the derived view and clamp the page; emits `PageChange` if the page moved
    fn refresh_view(&mut self) {
        let filtered = run_pipeline(&self.rows, &self.filters, &self.plan);
        self.view = sort_indices(&self.rows, filtered, self.sort.as_ref());
        if self.pagination.set_length(self.view.len()) {
            self.emit(TableEvent::PageChange(self.pagination.info()));
        }
    }

    /// Return to the first page, recompute, and emit a single `PageChange` if the page moved
    fn refresh_view_from_first_page(&mut self) {
        let before = self.pagination.page_index();
        self.pagination.reset();
        let filtered = run_pipeline(&self.rows, &self.filters, &self.plan);
        self.view = sort_indices(&self.rows, filtered, self.sort.as_ref());
        self.pagination.set_length(self.view.len());
        if self.pagination.page_index() != before {
            self.emit(TableEvent::PageChange(self.pagination.info()));
        }
    }
}
