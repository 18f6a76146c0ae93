//! Filter and sort types for the table runtime
//!
//! Shared data structures for search, quick and advanced filtering, and sorting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tabview_core::Value;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "asc", alias = "ascending")]
    Ascending,
    #[serde(rename = "desc", alias = "descending")]
    Descending,
}

impl SortDirection {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Parse `asc`/`desc` (case-insensitive, long forms accepted)
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Ascending),
            "desc" | "descending" => Some(Self::Descending),
            _ => None,
        }
    }
}

/// A single sort criterion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    /// Field to sort by
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn ascending(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Ascending)
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Descending)
    }
}

/// One `{field, value}` pair of the advanced filter set
///
/// A list value matches by membership, anything else by equality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvancedFilter {
    pub field: String,
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl AdvancedFilter {
    pub fn new(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Null, empty-string and empty-list values do not filter anything
    pub fn is_active(&self) -> bool {
        !self.value.is_blank()
    }
}

/// Complete filter criteria of one table
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterState {
    /// Applied free-text term (after debounce)
    pub search_term: String,
    /// Selected quick-filter pill value
    pub quick_filter: Option<Value>,
    pub advanced_filters: Vec<AdvancedFilter>,
    /// Time of the last mutation
    pub timestamp: Option<DateTime<Utc>>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_search(&self) -> bool {
        !self.search_term.trim().is_empty()
    }

    /// The quick-filter value when it actually filters
    pub fn active_quick_filter(&self) -> Option<&Value> {
        self.quick_filter.as_ref().filter(|value| !value.is_blank())
    }

    pub fn active_advanced_filters(&self) -> impl Iterator<Item = &AdvancedFilter> {
        self.advanced_filters.iter().filter(|f| f.is_active())
    }

    /// Number of filter criteria currently narrowing the view
    pub fn active_filter_count(&self) -> usize {
        usize::from(self.has_search())
            + usize::from(self.active_quick_filter().is_some())
            + self.active_advanced_filters().count()
    }

    pub fn is_filtering(&self) -> bool {
        self.active_filter_count() > 0
    }

    /// Reset every stage; the timestamp is kept for the caller to refresh
    pub fn clear(&mut self) {
        self.search_term.clear();
        self.quick_filter = None;
        self.advanced_filters.clear();
    }
}
