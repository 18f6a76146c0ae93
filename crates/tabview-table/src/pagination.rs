//! Client-side pagination state
//!
//! Pages are 0-indexed and always computed over the filtered and sorted view. Navigation
//! methods return `true` when the page actually changed so the runtime can emit a single
//! `PageChange` per effective transition.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::config::PaginationConfig;

/// Snapshot reported with every page change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub page_index: usize,
    pub page_size: usize,
    /// Number of rows in the paginated view
    pub length: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaginationState {
    /// Whether the view is split into pages at all
    pub enabled: bool,
    /// Current page (0-indexed)
    page_index: usize,
    /// Rows per page
    page_size: usize,
    /// Rows in the view being paginated
    length: usize,
    /// Page sizes offered to the user
    pub available_page_sizes: Vec<usize>,
    pub show_first_last_buttons: bool,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(&PaginationConfig::default())
    }
}

impl PaginationState {
    pub fn new(config: &PaginationConfig) -> Self {
        let page_size = if config.page_size == 0 {
            tracing::debug!("page size 0 is invalid, falling back to 25");
            25
        } else {
            config.page_size
        };

        Self {
            enabled: config.enabled,
            page_index: 0,
            page_size,
            length: 0,
            available_page_sizes: config.page_size_options.clone(),
            show_first_last_buttons: config.show_first_last_buttons,
        }
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn info(&self) -> PageInfo {
        PageInfo {
            page_index: self.page_index,
            page_size: self.page_size,
            length: self.length,
        }
    }

    /// Total number of pages; an empty view still has one (empty) page
    pub fn total_pages(&self) -> usize {
        if !self.enabled {
            return 1;
        }
        let pages = self.length.saturating_add(self.page_size - 1) / self.page_size;
        pages.max(1)
    }

    /// Index of the first row of the current page
    pub fn offset(&self) -> usize {
        if self.enabled {
            self.page_index.saturating_mul(self.page_size)
        } else {
            0
        }
    }

    /// Positions of the current page inside the view
    pub fn page_range(&self) -> Range<usize> {
        if !self.enabled {
            return 0..self.length;
        }
        let start = self.offset().min(self.length);
        let end = start.saturating_add(self.page_size).min(self.length);
        start..end
    }

    pub fn can_go_next(&self) -> bool {
        self.enabled && self.page_index + 1 < self.total_pages()
    }

    pub fn can_go_prev(&self) -> bool {
        self.enabled && self.page_index > 0
    }

    pub fn go_next(&mut self) -> bool {
        if self.can_go_next() {
            self.page_index += 1;
            true
        } else {
            false
        }
    }

    pub fn go_prev(&mut self) -> bool {
        if self.can_go_prev() {
            self.page_index -= 1;
            true
        } else {
            false
        }
    }

    pub fn go_first(&mut self) -> bool {
        self.go_to_page(0)
    }

    pub fn go_last(&mut self) -> bool {
        self.go_to_page(self.total_pages() - 1)
    }

    /// Navigate to a page, clamped into range
    pub fn go_to_page(&mut self, page_index: usize) -> bool {
        let new_page = page_index.min(self.total_pages() - 1);
        if self.page_index != new_page {
            self.page_index = new_page;
            true
        } else {
            false
        }
    }

    /// Change the page size and return to the first page
    pub fn set_page_size(&mut self, page_size: usize) -> bool {
        if page_size == 0 {
            tracing::debug!("ignoring page size 0");
            return false;
        }
        if self.page_size == page_size {
            return false;
        }
        self.page_size = page_size;
        self.page_index = 0;
        true
    }

    /// Update the view length, clamping the page index; returns whether the page moved
    pub fn set_length(&mut self, length: usize) -> bool {
        self.length = length;
        let last = self.total_pages() - 1;
        if self.page_index > last {
            self.page_index = last;
            true
        } else {
            false
        }
    }

    /// Return to the first page without touching the length
    pub fn reset(&mut self) -> bool {
        let changed = self.page_index != 0;
        self.page_index = 0;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(length: usize, page_size: usize) -> PaginationState {
        let mut state = PaginationState::new(&PaginationConfig {
            page_size,
            ..PaginationConfig::default()
        });
        state.set_length(length);
        state
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(state(0, 10).total_pages(), 1);
        assert_eq!(state(10, 10).total_pages(), 1);
        assert_eq!(state(11, 10).total_pages(), 2);
        assert_eq!(state(25, 10).total_pages(), 3);
    }

    #[test]
    fn test_page_range_and_navigation() {
        let mut state = state(25, 10);
        assert_eq!(state.page_range(), 0..10);
        assert!(!state.can_go_prev());

        assert!(state.go_next());
        assert_eq!(state.page_range(), 10..20);
        assert!(state.go_last());
        assert_eq!(state.page_range(), 20..25);
        assert!(!state.go_next());
        assert!(!state.go_last());

        assert!(state.go_first());
        assert_eq!(state.page_index(), 0);
        assert!(!state.go_prev());
    }

    #[test]
    fn test_go_to_page_clamps() {
        let mut state = state(25, 10);
        assert!(state.go_to_page(99));
        assert_eq!(state.page_index(), 2);
    }

    #[test]
    fn test_set_page_size_resets_to_first_page() {
        let mut state = state(100, 10);
        state.go_to_page(5);
        assert!(state.set_page_size(25));
        assert_eq!(state.page_index(), 0);
        assert!(!state.set_page_size(25));
        assert!(!state.set_page_size(0));
        assert_eq!(state.page_size(), 25);
    }

    #[test]
    fn test_shrinking_length_clamps_page() {
        let mut state = state(100, 10);
        state.go_to_page(9);
        assert!(state.set_length(35));
        assert_eq!(state.page_index(), 3);
        assert_eq!(state.page_range(), 30..35);
        assert!(!state.set_length(40));
    }

    #[test]
    fn test_disabled_pagination_shows_everything() {
        let mut state = PaginationState::new(&PaginationConfig {
            enabled: false,
            ..PaginationConfig::default()
        });
        state.set_length(120);
        assert_eq!(state.page_range(), 0..120);
        assert_eq!(state.total_pages(), 1);
        assert!(!state.go_next());
    }
}
