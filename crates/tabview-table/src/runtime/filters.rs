use std::time::Instant;

use chrono::{DateTime, Utc};
use tabview_core::Value;

use super::*;
use crate::filter_types::AdvancedFilter;

impl TableRuntime {
    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn active_filter_count(&self) -> usize {
        self.filters.active_filter_count() + self.external_filter_count
    }

    /// Record a keystroke in the search box; the term applies once it settles
    pub fn type_search(&mut self, term: impl Into<String>, now: Instant) {
        if !self.config.filtering.search_enabled {
            return;
        }
        self.debouncer.push(term, now);
    }

    /// Apply the pending search term if it has settled by `now`
    pub fn poll_search(&mut self, now: Instant) -> bool {
        match self.debouncer.poll(now) {
            Some(term) => self.apply_search_term(term),
            None => false,
        }
    }

    /// Apply the pending search term immediately
    pub fn flush_search(&mut self) -> bool {
        match self.debouncer.flush() {
            Some(term) => self.apply_search_term(term),
            None => false,
        }
    }

    pub fn pending_search(&self) -> Option<&str> {
        self.debouncer.pending_term()
    }

    /// Set the search term without debouncing; cancels any pending keystroke
    pub fn set_search_term(&mut self, term: impl Into<String>) -> bool {
        if !self.config.filtering.search_enabled {
            return false;
        }
        self.debouncer.cancel();
        self.apply_search_term(term.into())
    }

    fn apply_search_term(&mut self, term: String) -> bool {
        if self.filters.search_term == term {
            return false;
        }
        self.filters.search_term = term;
        self.filters_changed();
        true
    }

    /// Select a quick-filter pill, or clear it with `None`
    pub fn set_quick_filter(&mut self, value: Option<Value>) -> bool {
        if self.filters.quick_filter == value {
            return false;
        }
        self.filters.quick_filter = value;
        self.filters_changed();
        true
    }

    /// Replace the whole advanced filter set
    pub fn set_advanced_filters(&mut self, filters: Vec<AdvancedFilter>) -> bool {
        if self.filters.advanced_filters == filters {
            return false;
        }
        self.filters.advanced_filters = filters;
        self.filters_changed();
        true
    }

    /// Insert or replace the advanced filter on `filter.field`
    pub fn set_advanced_filter(&mut self, filter: AdvancedFilter) -> bool {
        let mut next = self.filters.advanced_filters.clone();
        match next.iter().position(|f| f.field == filter.field) {
            Some(index) => next[index] = filter,
            None => next.push(filter),
        }
        self.set_advanced_filters(next)
    }

    pub fn remove_advanced_filter(&mut self, field: &str) -> bool {
        let next: Vec<AdvancedFilter> = self
            .filters
            .advanced_filters
            .iter()
            .filter(|f| f.field != field)
            .cloned()
            .collect();
        self.set_advanced_filters(next)
    }

    /// Clear search, quick and advanced filters at once
    pub fn reset_filters(&mut self) -> bool {
        self.debouncer.cancel();
        if self.filters.search_term.is_empty()
            && self.filters.quick_filter.is_none()
            && self.filters.advanced_filters.is_empty()
        {
            return false;
        }
        self.filters.clear();
        self.filters_changed();
        true
    }

    /// Restore persisted filters as of `now` and re-run the pipeline
    pub fn restore_filters_at(&mut self, now: DateTime<Utc>) -> bool {
        let Some(persistence) = &self.persistence else {
            return false;
        };
        let Some(mut restored) = persistence.load_at(now) else {
            return false;
        };
        tracing::debug!(key = %persistence.key(), "restored persisted filters");
        if !self.config.filtering.search_enabled && !restored.search_term.is_empty() {
            tracing::debug!(term = %restored.search_term, "dropping restored search term, search is disabled");
            restored.search_term.clear();
        }
        self.filters = restored;
        self.refresh_view_from_first_page();
        true
    }

    /// Forget the persisted record without touching the live filters
    pub fn clear_persisted_filters(&self) {
        if let Some(persistence) = &self.persistence {
            persistence.clear();
        }
    }

    fn filters_changed(&mut self) {
        let now = Utc::now();
        self.filters.timestamp = Some(now);
        self.refresh_view_from_first_page();

        if let Some(persistence) = &self.persistence {
            persistence.save_at(&self.filters, now);
        }

        let active_filters = self.active_filter_count();
        self.emit(TableEvent::FilterChange {
            filters: self.filters.clone(),
            active_filters,
        });
    }
}
