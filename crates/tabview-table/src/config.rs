//! Declarative table configuration
//!
//! A host builds one `TableConfig` per table. Declarative fields deserialize from JSON or
//! TOML; executable parts (action handlers, validators, save and export hooks) are attached
//! in code and skipped by serde. Missing or inconsistent fields degrade the affected feature
//! instead of failing.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tabview_core::{Row, TabviewError, Value};

use crate::actions::ActionsConfig;
use crate::export::CsvExport;
use crate::filter_types::SortSpec;

/// Prefix of the persisted filter record key when no explicit key is configured
pub const FILTER_KEY_PREFIX: &str = "table-filters-";

/// Export filename stem used when neither a filename nor a table id is configured
pub const DEFAULT_EXPORT_STEM: &str = "table-export";

/// Validates one edited field; returns a user-facing message on failure
pub type FieldValidator = Arc<dyn Fn(&Value, &Row) -> std::result::Result<(), String> + Send + Sync>;

/// Persists a committed edit: receives the saved row and its pre-edit backup
pub type SaveHook = Arc<dyn Fn(&Row, &Row) -> anyhow::Result<()> + Send + Sync>;

/// Notified with the restored row when an edit is cancelled
pub type CancelHook = Arc<dyn Fn(&Row) + Send + Sync>;

/// Transforms rows right before they are rendered to CSV
pub type BeforeExportHook = Arc<dyn Fn(Vec<Row>) -> Vec<Row> + Send + Sync>;

/// Notified once an export payload has been produced
pub type AfterExportHook = Arc<dyn Fn(&CsvExport) + Send + Sync>;

fn default_true() -> bool {
    true
}

/// Horizontal alignment of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// How a column renders its cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    #[default]
    Text,
    /// Rendered through the status column mapping
    Status,
    /// Host-rendered cell
    Custom,
    /// Row action buttons; never exported
    Actions,
}

/// One column of the table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnDescriptor {
    /// Row field this column reads
    pub field: String,
    /// Header label (also the CSV header)
    pub header: String,
    pub sortable: bool,
    pub width: Option<u32>,
    pub min_width: Option<u32>,
    pub align: Alignment,
    pub kind: ColumnKind,
    /// Hidden columns are neither displayed nor exported
    pub hidden: bool,
    /// Roles allowed to see the column; empty means everyone
    pub roles: Vec<String>,
}

impl Default for ColumnDescriptor {
    fn default() -> Self {
        Self {
            field: String::new(),
            header: String::new(),
            sortable: true,
            width: None,
            min_width: None,
            align: Alignment::Left,
            kind: ColumnKind::Text,
            hidden: false,
            roles: Vec::new(),
        }
    }
}

impl ColumnDescriptor {
    pub fn new(field: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            header: header.into(),
            ..Self::default()
        }
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn kind(mut self, kind: ColumnKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
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

    /// Whether a viewer holding `roles` may see this column
    pub fn visible_for(&self, roles: &[String]) -> bool {
        !self.hidden && roles_allow(&self.roles, roles)
    }

    /// Header label, falling back to the field name when the header is empty
    pub fn label(&self) -> &str {
        if self.header.is_empty() {
            &self.field
        } else {
            &self.header
        }
    }

    /// Whether this column contributes a field to CSV exports
    pub fn is_exportable(&self) -> bool {
        !self.hidden && self.kind != ColumnKind::Actions
    }
}

/// Returns true when `required` is empty or shares at least one role with `held`
pub(crate) fn roles_allow(required: &[String], held: &[String]) -> bool {
    required.is_empty() || required.iter().any(|role| held.contains(role))
}

/// Presentation of a single status value
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusDisplay {
    pub icon: Option<String>,
    pub color: Option<String>,
    pub label: String,
    pub tooltip: Option<String>,
}

/// Maps the values of one field onto status badges
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusColumnConfig {
    pub field: String,
    /// Keyed by the value's display text
    pub mapping: IndexMap<String, StatusDisplay>,
}

/// One selectable quick-filter pill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickFilterOption {
    pub label: String,
    pub value: Value,
    #[serde(default)]
    pub icon: Option<String>,
}

/// Single-valued, mutually exclusive filter over one field
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QuickFilterConfig {
    pub field: String,
    pub options: Vec<QuickFilterOption>,
}

/// A field offered in the advanced filter panel
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvancedFilterField {
    pub field: String,
    pub label: String,
    /// Known values to pick from; empty means free input
    pub options: Vec<Value>,
    /// Whether several values may be picked (membership match)
    pub multiple: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilteringConfig {
    pub search_enabled: bool,
    pub search_placeholder: String,
    /// Fields searched by the free-text term; defaults to every column field
    pub search_fields: Option<Vec<String>>,
    pub quick_filters: Option<QuickFilterConfig>,
    pub advanced_filters: Option<Vec<AdvancedFilterField>>,
    pub persist_filters: bool,
    /// Overrides the `table-filters-<tableId>` storage key
    pub filter_storage_key: Option<String>,
    /// Settle delay before a typed search term is applied
    pub search_debounce_ms: u64,
}

impl Default for FilteringConfig {
    fn default() -> Self {
        Self {
            search_enabled: true,
            search_placeholder: "Search...".to_string(),
            search_fields: None,
            quick_filters: None,
            advanced_filters: None,
            persist_filters: false,
            filter_storage_key: None,
            search_debounce_ms: 300,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub enabled: bool,
    pub page_size: usize,
    pub page_size_options: Vec<usize>,
    pub show_first_last_buttons: bool,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            page_size: 25,
            page_size_options: vec![10, 25, 50, 100],
            show_first_last_buttons: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    Single,
    #[default]
    Multiple,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub enabled: bool,
    pub mode: SelectionMode,
    pub show_checkboxes: bool,
    pub select_all_enabled: bool,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            mode: SelectionMode::Multiple,
            show_checkboxes: true,
            select_all_enabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortingConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub default_sort: Option<SortSpec>,
}

impl Default for SortingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_sort: None,
        }
    }
}

/// A field that may be changed during an edit session
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EditColumn {
    pub field: String,
    pub required: bool,
    #[serde(skip)]
    pub validator: Option<FieldValidator>,
}

impl EditColumn {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ..Self::default()
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&Value, &Row) -> std::result::Result<(), String> + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }
}

impl fmt::Debug for EditColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditColumn")
            .field("field", &self.field)
            .field("required", &self.required)
            .field("has_validator", &self.validator.is_some())
            .finish()
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EditingConfig {
    pub enabled: bool,
    pub columns: Vec<EditColumn>,
    #[serde(skip)]
    pub on_save: Option<SaveHook>,
    #[serde(skip)]
    pub on_cancel: Option<CancelHook>,
}

impl EditingConfig {
    pub fn column(&self, field: &str) -> Option<&EditColumn> {
        self.columns.iter().find(|c| c.field == field)
    }
}

impl fmt::Debug for EditingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditingConfig")
            .field("enabled", &self.enabled)
            .field("columns", &self.columns)
            .field("has_on_save", &self.on_save.is_some())
            .field("has_on_cancel", &self.on_cancel.is_some())
            .finish()
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub enabled: bool,
    /// File name stem; `.csv` is appended
    pub filename: Option<String>,
    #[serde(skip)]
    pub before_export: Option<BeforeExportHook>,
    #[serde(skip)]
    pub after_export: Option<AfterExportHook>,
}

impl fmt::Debug for ExportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportConfig")
            .field("enabled", &self.enabled)
            .field("filename", &self.filename)
            .field("has_before_export", &self.before_export.is_some())
            .field("has_after_export", &self.after_export.is_some())
            .finish()
    }
}

/// Complete description of one table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Root of the persistence key and default export filename
    pub table_id: Option<String>,
    pub columns: Vec<ColumnDescriptor>,
    pub status_column: Option<StatusColumnConfig>,
    pub actions: ActionsConfig,
    pub filtering: FilteringConfig,
    pub pagination: PaginationConfig,
    pub selection: SelectionConfig,
    pub sorting: SortingConfig,
    pub editing: Option<EditingConfig>,
    pub export: ExportConfig,
}

impl TableConfig {
    pub fn new(table_id: impl Into<String>, columns: Vec<ColumnDescriptor>) -> Self {
        Self {
            table_id: Some(table_id.into()),
            columns,
            ..Self::default()
        }
    }

    pub fn from_json_str(content: &str) -> tabview_core::Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_toml_str(content: &str) -> tabview_core::Result<Self> {
        toml::from_str(content).map_err(|e| TabviewError::Configuration(e.to_string()))
    }

    /// Load a configuration file, picking the format from the extension (`.toml` or JSON)
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read table configuration from {:?}", path))?;
        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&content),
            _ => Self::from_json_str(&content),
        };
        config.with_context(|| format!("Invalid table configuration in {:?}", path))
    }

    pub fn column(&self, field: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.field == field)
    }

    pub fn has_column(&self, field: &str) -> bool {
        self.column(field).is_some()
    }

    /// Fields searched by the free-text term
    ///
    /// Configured fields that name no column are dropped; when nothing remains every column
    /// field is searched.
    pub fn search_fields(&self) -> Vec<String> {
        let configured: Vec<String> = self
            .filtering
            .search_fields
            .iter()
            .flatten()
            .filter(|field| {
                let known = self.has_column(field);
                if !known {
                    tracing::debug!(field = %field, "ignoring search field without a column");
                }
                known
            })
            .cloned()
            .collect();

        if configured.is_empty() {
            self.columns.iter().map(|c| c.field.clone()).collect()
        } else {
            configured
        }
    }

    /// Field targeted by the quick filter, if it names a column
    pub fn quick_filter_field(&self) -> Option<&str> {
        let quick = self.filtering.quick_filters.as_ref()?;
        if self.has_column(&quick.field) {
            Some(quick.field.as_str())
        } else {
            tracing::debug!(field = %quick.field, "ignoring quick filter without a column");
            None
        }
    }

    /// Key of the persisted filter record: the explicit override, else `table-filters-<tableId>`
    pub fn filter_storage_key(&self) -> Option<String> {
        if let Some(key) = &self.filtering.filter_storage_key {
            if !key.trim().is_empty() {
                return Some(key.clone());
            }
        }
        self.table_id
            .as_ref()
            .filter(|id| !id.trim().is_empty())
            .map(|id| format!("{}{}", FILTER_KEY_PREFIX, id))
    }

    /// `<filename | tableId | "table-export">.csv`
    pub fn export_filename(&self) -> String {
        let stem = self
            .export
            .filename
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .or(self.table_id.as_deref().filter(|id| !id.trim().is_empty()))
            .unwrap_or(DEFAULT_EXPORT_STEM);
        let stem = stem.strip_suffix(".csv").unwrap_or(stem);
        format!("{}.csv", stem)
    }

    /// Editing block, only when present and enabled
    pub fn active_editing(&self) -> Option<&EditingConfig> {
        self.editing.as_ref().filter(|editing| editing.enabled)
    }

    /// Resolve a row's status badge through the status column mapping
    pub fn status_display(&self, row: &Row) -> Option<&StatusDisplay> {
        let status = self.status_column.as_ref()?;
        let key = row.get(&status.field)?.display_text();
        status.mapping.get(&key)
    }
}
