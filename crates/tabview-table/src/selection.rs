//! Row selection set
//!
//! Selection is tracked by `RowId`. Identities that no longer resolve after a reload stay
//! recorded until the selection is cleared or replaced.

use indexmap::IndexSet;
use tabview_core::RowId;

use crate::config::{SelectionConfig, SelectionMode};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionModel {
    mode: SelectionMode,
    selected: IndexSet<RowId>,
}

impl SelectionModel {
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            selected: IndexSet::new(),
        }
    }

    pub fn from_config(config: &SelectionConfig) -> Self {
        Self::new(config.mode)
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn contains(&self, id: RowId) -> bool {
        self.selected.contains(&id)
    }

    /// Selected identities in selection order
    pub fn ids(&self) -> impl Iterator<Item = RowId> + '_ {
        self.selected.iter().copied()
    }

    /// Add a row; single mode replaces the previous selection
    pub fn select(&mut self, id: RowId) -> bool {
        match self.mode {
            SelectionMode::Single => {
                if self.selected.len() == 1 && self.selected.contains(&id) {
                    return false;
                }
                self.selected.clear();
                self.selected.insert(id);
                true
            }
            SelectionMode::Multiple => self.selected.insert(id),
        }
    }

    pub fn deselect(&mut self, id: RowId) -> bool {
        self.selected.shift_remove(&id)
    }

    pub fn toggle(&mut self, id: RowId) -> bool {
        if self.contains(id) {
            self.deselect(id)
        } else {
            self.select(id)
        }
    }

    pub fn clear(&mut self) -> bool {
        if self.selected.is_empty() {
            return false;
        }
        self.selected.clear();
        true
    }

    /// Whether every id in `candidates` is selected (and there is at least one)
    pub fn covers<'a, I: IntoIterator<Item = &'a RowId>>(&self, candidates: I) -> bool {
        let mut any = false;
        for id in candidates {
            any = true;
            if !self.selected.contains(id) {
                return false;
            }
        }
        any
    }
}
