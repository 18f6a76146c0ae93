//! Shared fixtures for the table engine integration tests

#![allow(dead_code)]

use tabview_table::{
    ColumnDescriptor, QuickFilterConfig, QuickFilterOption, Row, TableConfig, TableRuntime,
};

/// Bundle inventory: `bundleId`, `status`, `site`, `sizeMb`
pub fn bundle_config() -> TableConfig {
    let mut config = TableConfig::new(
        "bundles",
        vec![
            ColumnDescriptor::new("bundleId", "Bundle"),
            ColumnDescriptor::new("status", "Status"),
            ColumnDescriptor::new("site", "Site"),
            ColumnDescriptor::new("sizeMb", "Size (MB)"),
        ],
    );
    config.filtering.quick_filters = Some(QuickFilterConfig {
        field: "status".into(),
        options: vec![
            QuickFilterOption {
                label: "Installed".into(),
                value: "Installed".into(),
                icon: None,
            },
            QuickFilterOption {
                label: "Pending".into(),
                value: "Pending".into(),
                icon: None,
            },
        ],
    });
    config.selection.enabled = true;
    config.export.enabled = true;
    config
}

pub fn bundle(id: &str, status: &str, site: &str, size_mb: i64) -> Row {
    Row::new()
        .with("bundleId", id)
        .with("status", status)
        .with("site", site)
        .with("sizeMb", size_mb)
}

/// Ten bundles, six of them installed
pub fn bundle_rows() -> Vec<Row> {
    vec![
        bundle("MB303862", "Installed", "north", 120),
        bundle("MB372586", "Pending", "north", 80),
        bundle("MB303900", "Installed", "south", 64),
        bundle("XB000001", "Installed", "south", 512),
        bundle("XB000002", "Failed", "east", 16),
        bundle("MB410001", "Installed", "east", 256),
        bundle("MB410002", "Pending", "west", 32),
        bundle("XB000003", "Installed", "west", 8),
        bundle("XB000004", "Failed", "north", 4),
        bundle("MB500000", "Installed", "south", 1024),
    ]
}

pub fn bundle_runtime() -> TableRuntime {
    TableRuntime::new(bundle_config()).with_rows(bundle_rows())
}

/// Field values of the filtered and sorted view, across all pages
pub fn view_values(runtime: &TableRuntime, field: &str) -> Vec<String> {
    runtime
        .view_rows()
        .into_iter()
        .map(|row| row.value(field).display_text())
        .collect()
}
