use super::*;
use crate::config::SelectionMode;

impl TableRuntime {
    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn is_selected(&self, id: RowId) -> bool {
        self.selection.contains(id)
    }

    /// Every recorded identity, including ones that no longer resolve
    pub fn selected_ids(&self) -> Vec<RowId> {
        self.selection.ids().collect()
    }

    /// Selected rows of the current collection, in selection order
    pub fn selected_rows(&self) -> Vec<&Row> {
        self.selection.ids().filter_map(|id| self.row(id)).collect()
    }

    pub fn toggle_row(&mut self, id: RowId) -> bool {
        if !self.config.selection.enabled {
            return false;
        }
        if !self.selection.contains(id) && self.row_index(id).is_none() {
            return false;
        }
        let changed = self.selection.toggle(id);
        self.selection_changed(changed)
    }

    pub fn select_row(&mut self, id: RowId) -> bool {
        if !self.config.selection.enabled || self.row_index(id).is_none() {
            return false;
        }
        let changed = self.selection.select(id);
        self.selection_changed(changed)
    }

    pub fn deselect_row(&mut self, id: RowId) -> bool {
        if !self.config.selection.enabled {
            return false;
        }
        let changed = self.selection.deselect(id);
        self.selection_changed(changed)
    }

    /// Select every row that passes the current filters, on every page
    ///
    /// Existing selections outside the filtered collection stay recorded.
    pub fn select_all(&mut self) -> bool {
        let config = &self.config.selection;
        if !config.enabled || !config.select_all_enabled || config.mode == SelectionMode::Single {
            return false;
        }
        let mut changed = false;
        for id in self.view_ids() {
            changed |= self.selection.select(id);
        }
        self.selection_changed(changed)
    }

    /// Whether every row of the filtered collection is selected
    pub fn is_all_selected(&self) -> bool {
        self.selection.covers(&self.view_ids())
    }

    /// Master checkbox: clear when everything is selected, otherwise select all
    pub fn toggle_all(&mut self) -> bool {
        if self.is_all_selected() {
            self.clear_selection()
        } else {
            self.select_all()
        }
    }

    pub fn clear_selection(&mut self) -> bool {
        if !self.config.selection.enabled {
            return false;
        }
        let changed = self.selection.clear();
        self.selection_changed(changed)
    }

    fn selection_changed(&mut self, changed: bool) -> bool {
        if changed {
            let selected = self.selected_ids();
            self.emit(TableEvent::SelectionChange { selected });
        }
        changed
    }
}
