//! Client-side filter pipeline
//!
//! Three conjunctive stages over row indices: free-text search, quick filter and advanced
//! filters. Each stage is a pure function taking the surviving indices of the previous one,
//! so the canonical rows are never copied or mutated. Stages without active criteria pass
//! every row through.

use tabview_core::{Row, Value};

use crate::config::TableConfig;
use crate::filter_types::{AdvancedFilter, FilterState};

/// Field references resolved once against the column set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterPlan {
    search_fields: Vec<String>,
    quick_field: Option<String>,
    column_fields: Vec<String>,
}

impl FilterPlan {
    pub fn from_config(config: &TableConfig) -> Self {
        Self {
            search_fields: config.search_fields(),
            quick_field: config.quick_filter_field().map(str::to_string),
            column_fields: config.columns.iter().map(|c| c.field.clone()).collect(),
        }
    }

    pub fn search_fields(&self) -> &[String] {
        &self.search_fields
    }

    pub fn quick_field(&self) -> Option<&str> {
        self.quick_field.as_deref()
    }

    fn knows(&self, field: &str) -> bool {
        self.column_fields.iter().any(|f| f == field)
    }
}

/// Run every stage and return the indices of the surviving rows in canonical order
pub fn run_pipeline(rows: &[Row], state: &FilterState, plan: &FilterPlan) -> Vec<usize> {
    let indices: Vec<usize> = (0..rows.len()).collect();
    let indices = search_stage(rows, indices, &state.search_term, plan.search_fields());
    let indices = quick_filter_stage(rows, indices, plan.quick_field(), state.active_quick_filter());
    let active: Vec<&AdvancedFilter> = state
        .active_advanced_filters()
        .filter(|filter| {
            let known = plan.knows(&filter.field);
            if !known {
                tracing::debug!(field = %filter.field, "ignoring advanced filter without a column");
            }
            known
        })
        .collect();
    advanced_filter_stage(rows, indices, &active)
}

/// Keep rows where any search field contains the term, case-insensitively
pub fn search_stage(
    rows: &[Row],
    indices: Vec<usize>,
    term: &str,
    fields: &[String],
) -> Vec<usize> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return indices;
    }

    indices
        .into_iter()
        .filter(|&idx| {
            rows.get(idx).is_some_and(|row| {
                fields.iter().any(|field| {
                    row.value(field)
                        .display_text()
                        .to_lowercase()
                        .contains(&term)
                })
            })
        })
        .collect()
}

/// Keep rows whose quick-filter field equals the value, or contains it when both are strings
pub fn quick_filter_stage(
    rows: &[Row],
    indices: Vec<usize>,
    field: Option<&str>,
    value: Option<&Value>,
) -> Vec<usize> {
    let (Some(field), Some(value)) = (field, value) else {
        return indices;
    };

    indices
        .into_iter()
        .filter(|&idx| rows.get(idx).is_some_and(|row| quick_filter_matches(row.value(field), value)))
        .collect()
}

fn quick_filter_matches(cell: &Value, wanted: &Value) -> bool {
    if cell.loose_eq(wanted) {
        return true;
    }
    match (cell, wanted) {
        (Value::String(cell), Value::String(wanted)) => cell.contains(wanted.as_str()),
        _ => false,
    }
}

/// Keep rows satisfying every filter: list values by membership, others by equality
pub fn advanced_filter_stage(
    rows: &[Row],
    indices: Vec<usize>,
    filters: &[&AdvancedFilter],
) -> Vec<usize> {
    if filters.is_empty() {
        return indices;
    }

    indices
        .into_iter()
        .filter(|&idx| {
            rows.get(idx).is_some_and(|row| {
                filters
                    .iter()
                    .all(|filter| advanced_filter_matches(row.value(&filter.field), &filter.value))
            })
        })
        .collect()
}

fn advanced_filter_matches(cell: &Value, wanted: &Value) -> bool {
    match wanted {
        Value::Array(options) => options.iter().any(|option| cell.loose_eq(option)),
        other => cell.loose_eq(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ColumnDescriptor, QuickFilterConfig};
    use pretty_assertions::assert_eq;

    fn rows() -> Vec<Row> {
        vec![
            Row::new().with("id", 1).with("bundleId", "MB303862").with("status", "Installed").with("region", "EU"),
            Row::new().with("id", 2).with("bundleId", "MB372586").with("status", "Pending").with("region", "US"),
            Row::new().with("id", 3).with("bundleId", "XB100000").with("status", "Installed/Partial").with("region", "APAC"),
        ]
    }

    fn plan() -> FilterPlan {
        let mut config = TableConfig::new(
            "bundles",
            vec![
                ColumnDescriptor::new("id", "ID"),
                ColumnDescriptor::new("bundleId", "Bundle"),
                ColumnDescriptor::new("status", "Status"),
                ColumnDescriptor::new("region", "Region"),
            ],
        );
        config.filtering.quick_filters = Some(QuickFilterConfig {
            field: "status".into(),
            options: vec![],
        });
        FilterPlan::from_config(&config)
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let rows = rows();
        let fields = vec!["bundleId".to_string()];
        assert_eq!(search_stage(&rows, vec![0, 1, 2], "mb30", &fields), vec![0]);
        assert_eq!(search_stage(&rows, vec![0, 1, 2], "  ", &fields), vec![0, 1, 2]);
        assert_eq!(search_stage(&rows, vec![1, 2], "mb", &fields), vec![1]);
    }

    #[test]
    fn test_quick_filter_exact_or_substring() {
        let rows = rows();
        let installed = Value::from("Installed");
        assert_eq!(
            quick_filter_stage(&rows, vec![0, 1, 2], Some("status"), Some(&installed)),
            vec![0, 2]
        );

        let id = Value::Int(2);
        assert_eq!(quick_filter_stage(&rows, vec![0, 1, 2], Some("id"), Some(&id)), vec![1]);
        assert_eq!(quick_filter_stage(&rows, vec![0, 1, 2], None, Some(&id)), vec![0, 1, 2]);
    }

    #[test]
    fn test_advanced_filter_membership() {
        let rows = rows();
        let by_region = AdvancedFilter::new("region", vec!["EU", "APAC"]);
        let by_status = AdvancedFilter::new("status", "Installed");
        assert_eq!(advanced_filter_stage(&rows, vec![0, 1, 2], &[&by_region]), vec![0, 2]);
        assert_eq!(
            advanced_filter_stage(&rows, vec![0, 1, 2], &[&by_region, &by_status]),
            vec![0]
        );
        assert_eq!(advanced_filter_stage(&rows, vec![0, 1, 2], &[]), vec![0, 1, 2]);
    }

    #[test]
    fn test_pipeline_stages_are_conjunctive() {
        let rows = rows();
        let state = FilterState {
            search_term: "b".into(),
            quick_filter: Some(Value::from("Installed")),
            advanced_filters: vec![AdvancedFilter::new("region", "APAC")],
            timestamp: None,
        };
        assert_eq!(run_pipeline(&rows, &state, &plan()), vec![2]);
    }

    #[test]
    fn test_pipeline_ignores_filters_on_unknown_fields() {
        let rows = rows();
        let state = FilterState {
            advanced_filters: vec![AdvancedFilter::new("ghost", "x")],
            ..FilterState::default()
        };
        assert_eq!(run_pipeline(&rows, &state, &plan()), vec![0, 1, 2]);
    }

    #[test]
    fn test_pipeline_on_empty_rows() {
        let state = FilterState {
            search_term: "anything".into(),
            ..FilterState::default()
        };
        assert!(run_pipeline(&[], &state, &plan()).is_empty());
    }
}
