//! Table runtime events
//!
//! Events queued by the runtime for the host page, which drains them after each
//! interaction and reacts (logging, reloading data, navigating).

use tabview_core::{Row, RowId};

use crate::filter_types::{FilterState, SortDirection};
use crate::pagination::PageInfo;

#[derive(Clone, Debug, PartialEq)]
pub enum TableEvent {
    /// A row action handler ran
    RowAction {
        action: String,
        row_id: RowId,
        row: Row,
        /// Position in the canonical collection
        row_index: usize,
    },

    /// A bulk action handler ran over the current selection
    BulkAction {
        action: String,
        selected: Vec<RowId>,
        rows: Vec<Row>,
    },

    /// A header action handler ran
    HeaderAction { action: String },

    /// Search, quick or advanced filters changed (or were reset)
    FilterChange {
        filters: FilterState,
        active_filters: usize,
    },

    /// Sort changed; `None` direction means the sort was cleared
    SortChange {
        field: String,
        direction: Option<SortDirection>,
    },

    /// Current page or page size changed
    PageChange(PageInfo),

    /// Full current selection after any change
    SelectionChange { selected: Vec<RowId> },

    EditStarted { row_id: RowId },

    /// Edit committed and written back to the canonical row
    EditSaved {
        row_id: RowId,
        row: Row,
        row_index: usize,
    },

    /// Edit cancelled; the canonical row holds its pre-edit values
    EditCancelled { row_id: RowId },

    /// CSV payload produced
    Exported { filename: String, row_count: usize },
}

impl TableEvent {
    /// Short name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            TableEvent::RowAction { .. } => "row_action",
            TableEvent::BulkAction { .. } => "bulk_action",
            TableEvent::HeaderAction { .. } => "header_action",
            TableEvent::FilterChange { .. } => "filter_change",
            TableEvent::SortChange { .. } => "sort_change",
            TableEvent::PageChange(_) => "page_change",
            TableEvent::SelectionChange { .. } => "selection_change",
            TableEvent::EditStarted { .. } => "edit_started",
            TableEvent::EditSaved { .. } => "edit_saved",
            TableEvent::EditCancelled { .. } => "edit_cancelled",
            TableEvent::Exported { .. } => "exported",
        }
    }
}
