//! Filter state persistence
//!
//! A small keyed storage port plus the adapter that serializes filter criteria into it
//! with a 30-day expiry.

mod adapter;
mod storage;

pub use adapter::{FILTER_EXPIRY_DAYS, FilterPersistence, PersistedFilters};
pub use storage::{FilterStore, MemoryFilterStore, SqliteFilterStore};
