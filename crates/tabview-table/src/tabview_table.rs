//! tabview table - generic tabular view engine
//!
//! This crate turns a declarative table configuration and a host-supplied row collection
//! into a live, interactive table state:
//! - Free-text search (debounced), quick filter pills and advanced filters
//! - Sorting, client-side pagination and multi-row selection
//! - Row, bulk and header actions with confirmation
//! - Single-row inline editing with validation
//! - CSV export and filter persistence with a 30-day expiry
//!
//! Interactions queue [`TableEvent`]s that the host drains and reacts to.

pub mod actions;
pub mod config;
pub mod debounce;
pub mod editing;
pub mod events;
pub mod export;
pub mod filter_types;
pub mod filtering;
pub mod pagination;
pub mod persistence;
mod runtime;
pub mod selection;
pub mod sorting;

pub use actions::{
    ActionDescriptor, ActionOutcome, ActionsConfig, AutoConfirm, Availability, BulkAction,
    ConfirmPrompt, HeaderAction, RowAction, RowActionSlots,
};
pub use config::{
    AdvancedFilterField, Alignment, ColumnDescriptor, ColumnKind, EditColumn, EditingConfig,
    ExportConfig, FilteringConfig, PaginationConfig, QuickFilterConfig, QuickFilterOption,
    SelectionConfig, SelectionMode, SortingConfig, StatusColumnConfig, StatusDisplay, TableConfig,
};
pub use debounce::SearchDebouncer;
pub use editing::{BeginEdit, EditError, EditSession};
pub use events::TableEvent;
pub use export::{CsvExport, ExportScope};
pub use filter_types::{AdvancedFilter, FilterState, SortDirection, SortSpec};
pub use filtering::{FilterPlan, run_pipeline};
pub use pagination::{PageInfo, PaginationState};
pub use persistence::{
    FILTER_EXPIRY_DAYS, FilterPersistence, FilterStore, MemoryFilterStore, PersistedFilters,
    SqliteFilterStore,
};
pub use runtime::{TableRuntime, ViewState};
pub use selection::SelectionModel;
pub use sorting::sort_indices;

pub use tabview_core::{Row, RowId, Value};
