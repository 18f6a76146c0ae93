//! CSV export of the derived view
//!
//! Output is UTF-8 with a byte-order mark, one header line of column labels and one line
//! per row, comma-delimited with RFC 4180 quoting. Hidden and action columns are skipped.

use serde::Serialize;
use tabview_core::{Row, Value};

use crate::config::{ColumnDescriptor, TableConfig};

/// Byte-order mark prefixed to every payload for spreadsheet compatibility
pub const BOM: char = '\u{FEFF}';

/// Sub-fields tried, in order, when summarizing an object inside a list
const SUMMARY_FIELDS: [&str; 3] = ["status", "name", "label"];

/// Which rows of the derived view are exported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportScope {
    /// Every row that passes the filters, in sorted order
    #[default]
    Filtered,
    /// Only the rows on the current page
    CurrentPage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsvExport {
    pub filename: String,
    pub content: String,
    pub row_count: usize,
}

pub fn escape_csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Stringify a cell; lists are collapsed into a `"; "`-joined summary
pub fn format_cell(value: &Value) -> String {
    match value {
        Value::Array(items) => items
            .iter()
            .map(summarize_item)
            .collect::<Vec<_>>()
            .join("; "),
        other => other.display_text(),
    }
}

fn summarize_item(item: &Value) -> String {
    match item {
        Value::Object(_) => SUMMARY_FIELDS
            .iter()
            .find_map(|name| item.field(name).filter(|v| !v.is_null()))
            .map(Value::display_text)
            .unwrap_or_else(|| item.display_text()),
        other => other.display_text(),
    }
}

/// Render rows to a CSV payload (BOM included)
pub fn render_csv(columns: &[&ColumnDescriptor], rows: &[Row]) -> String {
    let mut content = String::new();
    content.push(BOM);

    let header: Vec<String> = columns
        .iter()
        .map(|column| escape_csv_field(column.label()))
        .collect();
    content.push_str(&header.join(","));
    content.push('\n');

    for row in rows {
        let line: Vec<String> = columns
            .iter()
            .map(|column| escape_csv_field(&format_cell(row.value(&column.field))))
            .collect();
        content.push_str(&line.join(","));
        content.push('\n');
    }

    content
}

/// Run the export hooks around rendering; `None` when export is disabled
pub fn export_rows(
    config: &TableConfig,
    columns: &[&ColumnDescriptor],
    rows: Vec<Row>,
) -> Option<CsvExport> {
    if !config.export.enabled {
        tracing::debug!("export requested but disabled");
        return None;
    }

    let rows = match &config.export.before_export {
        Some(before) => before(rows),
        None => rows,
    };

    let export = CsvExport {
        filename: config.export_filename(),
        content: render_csv(columns, &rows),
        row_count: rows.len(),
    };

    if let Some(after) = &config.export.after_export {
        after(&export);
    }

    tracing::info!(filename = %export.filename, rows = export.row_count, "exported table as CSV");
    Some(export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColumnKind;
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_escape_csv_field() {
        assert_eq!(escape_csv_field("plain"), "plain");
        assert_eq!(escape_csv_field("value, with comma"), "\"value, with comma\"");
        assert_eq!(escape_csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_csv_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_list_of_objects_collapses_to_summary() {
        let mut installed = IndexMap::new();
        installed.insert("status".to_string(), Value::from("Installed"));
        installed.insert("name".to_string(), Value::from("core"));
        let mut named = IndexMap::new();
        named.insert("name".to_string(), Value::from("addon"));
        let mut opaque = IndexMap::new();
        opaque.insert("id".to_string(), Value::Int(7));

        let value = Value::Array(vec![
            Value::Object(installed),
            Value::Object(named),
            Value::Object(opaque),
            Value::from("raw"),
        ]);
        assert_eq!(format_cell(&value), "Installed; addon; {\"id\":7}; raw");
    }

    #[test]
    fn test_render_skips_nothing_it_is_given() {
        let name = ColumnDescriptor::new("name", "Name");
        let note = ColumnDescriptor::new("note", "");
        let rows = vec![
            Row::new().with("name", "alpha").with("note", "value, with comma"),
            Row::new().with("name", "beta"),
        ];
        let csv = render_csv(&[&name, &note], &rows);
        assert_eq!(
            csv,
            "\u{FEFF}Name,note\nalpha,\"value, with comma\"\nbeta,\n"
        );
    }

    #[test]
    fn test_export_rows_runs_hooks_and_respects_disabled() {
        let mut config = TableConfig::new(
            "bundles",
            vec![
                ColumnDescriptor::new("name", "Name"),
                ColumnDescriptor::new("actions", "").kind(ColumnKind::Actions),
            ],
        );
        let columns: Vec<&ColumnDescriptor> = vec![&config.columns[0]];
        let rows = vec![Row::new().with("name", "alpha")];
        assert!(export_rows(&config, &columns, rows.clone()).is_none());

        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        let mut enabled = config.clone();
        enabled.export.enabled = true;
        enabled.export.before_export = Some(Arc::new(|rows: Vec<Row>| -> Vec<Row> {
            rows.into_iter()
                .map(|row| {
                    let upper = row.value("name").display_text().to_uppercase();
                    row.with("name", upper)
                })
                .collect()
        }));
        enabled.export.after_export = Some(Arc::new(move |export: &CsvExport| {
            *sink.lock().unwrap() = Some(export.row_count);
        }));
        config = enabled;

        let columns: Vec<&ColumnDescriptor> = vec![&config.columns[0]];
        let export = export_rows(&config, &columns, rows).unwrap();
        assert_eq!(export.filename, "bundles.csv");
        assert_eq!(export.content, "\u{FEFF}Name\nALPHA\n");
        assert_eq!(*seen.lock().unwrap(), Some(1));
    }
}
