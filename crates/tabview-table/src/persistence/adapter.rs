//! Filter state persistence adapter
//!
//! Stores filter criteria (never row data) under `table-filters-<tableId>` or an explicit
//! key. Records older than `FILTER_EXPIRY_DAYS` are deleted on load. Storage failures are
//! logged and treated as "nothing persisted".

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tabview_core::Value;

use super::storage::FilterStore;
use crate::config::TableConfig;
use crate::filter_types::{AdvancedFilter, FilterState};

pub const FILTER_EXPIRY_DAYS: i64 = 30;

/// On-disk record format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedFilters {
    #[serde(default)]
    pub search_term: String,
    #[serde(default)]
    pub quick_filters: Value,
    #[serde(default)]
    pub advanced_filters: Vec<AdvancedFilter>,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl PersistedFilters {
    pub fn from_state(state: &FilterState, now: DateTime<Utc>) -> Self {
        Self {
            search_term: state.search_term.clone(),
            quick_filters: state.quick_filter.clone().unwrap_or(Value::Null),
            advanced_filters: state.advanced_filters.clone(),
            timestamp: now.timestamp_millis(),
        }
    }

    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp).single()
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        let age_ms = now.timestamp_millis().saturating_sub(self.timestamp);
        age_ms > Duration::days(FILTER_EXPIRY_DAYS).num_milliseconds()
    }

    pub fn into_state(self) -> FilterState {
        let timestamp = self.saved_at();
        FilterState {
            search_term: self.search_term,
            quick_filter: if self.quick_filters.is_null() {
                None
            } else {
                Some(self.quick_filters)
            },
            advanced_filters: self.advanced_filters,
            timestamp,
        }
    }
}

#[derive(Clone)]
pub struct FilterPersistence {
    store: Arc<dyn FilterStore>,
    key: String,
}

impl std::fmt::Debug for FilterPersistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterPersistence")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl FilterPersistence {
    pub fn new(store: Arc<dyn FilterStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Adapter for a table, or `None` when persistence is off or no key can be derived
    pub fn for_config(config: &TableConfig, store: Arc<dyn FilterStore>) -> Option<Self> {
        if !config.filtering.persist_filters {
            return None;
        }
        match config.filter_storage_key() {
            Some(key) => Some(Self::new(store, key)),
            None => {
                tracing::debug!("filter persistence enabled without table_id or storage key");
                None
            }
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn load(&self) -> Option<FilterState> {
        self.load_at(Utc::now())
    }

    /// Restore the persisted filters as of `now`, deleting an expired record
    pub fn load_at(&self, now: DateTime<Utc>) -> Option<FilterState> {
        let record = match self.read_record() {
            Ok(Some(record)) => record,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %format!("{:#}", e), "failed to load persisted filters");
                return None;
            }
        };

        if record.is_expired(now) {
            tracing::debug!(key = %self.key, "persisted filters expired, removing");
            self.clear();
            return None;
        }

        Some(record.into_state())
    }

    /// Read and parse the raw record without applying expiry
    pub fn read_record(&self) -> Result<Option<PersistedFilters>> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(None);
        };
        let record = serde_json::from_str(&raw)
            .with_context(|| format!("Malformed filter record under '{}'", self.key))?;
        Ok(Some(record))
    }

    pub fn save(&self, state: &FilterState) {
        self.save_at(state, Utc::now());
    }

    pub fn save_at(&self, state: &FilterState, now: DateTime<Utc>) {
        let record = PersistedFilters::from_state(state, now);
        let result = serde_json::to_string(&record)
            .context("Failed to serialize filter record")
            .and_then(|json| self.store.set(&self.key, &json));
        if let Err(e) = result {
            tracing::warn!(key = %self.key, error = %format!("{:#}", e), "failed to persist filters");
        }
    }

    pub fn clear(&self) {
        if let Err(e) = self.store.remove(&self.key) {
            tracing::warn!(key = %self.key, error = %format!("{:#}", e), "failed to remove persisted filters");
        }
    }
}
