use super::*;
use crate::export::{CsvExport, ExportScope, export_rows};

impl TableRuntime {
    /// Columns written to CSV: visible to the viewer, not hidden, not actions
    pub fn export_columns(&self) -> Vec<&ColumnDescriptor> {
        self.visible_columns()
            .into_iter()
            .filter(|column| column.is_exportable())
            .collect()
    }

    /// Export the derived view; `None` when export is disabled
    pub fn export_csv(&mut self, scope: ExportScope) -> Option<CsvExport> {
        let rows: Vec<Row> = match scope {
            ExportScope::Filtered => self.view_rows().into_iter().cloned().collect(),
            ExportScope::CurrentPage => self
                .page_rows()
                .into_iter()
                .map(|(_, row)| row.clone())
                .collect(),
        };

        let export = export_rows(&self.config, &self.export_columns(), rows)?;
        self.emit(TableEvent::Exported {
            filename: export.filename.clone(),
            row_count: export.row_count,
        });
        Some(export)
    }
}
