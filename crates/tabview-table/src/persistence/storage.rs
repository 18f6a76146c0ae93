//! Keyed storage backends for persisted filter records

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, params};

/// Durable string store the persistence adapter writes through
pub trait FilterStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Process-local store, used by tests and hosts without durable storage
#[derive(Debug, Default, Clone)]
pub struct MemoryFilterStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryFilterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.lock().contains_key(key)
    }
}

impl FilterStore for MemoryFilterStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// Handle for database connections - either owned or shared
enum ConnectionHandle {
    Owned(Connection),
    Shared(Arc<Mutex<Connection>>),
}

impl ConnectionHandle {
    fn with_conn<T, F: FnOnce(&Connection) -> Result<T>>(&self, f: F) -> Result<T> {
        match self {
            ConnectionHandle::Owned(conn) => f(conn),
            ConnectionHandle::Shared(shared) => {
                let guard = shared.lock();
                f(&guard)
            }
        }
    }
}

/// SQLite-backed store, one row per key
pub struct SqliteFilterStore {
    db_path: PathBuf,
    /// Holds the connection for in-memory databases (where each open creates a new db)
    memory_conn: Option<Arc<Mutex<Connection>>>,
}

impl SqliteFilterStore {
    /// Open or create storage at the given path
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = path.into();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }
        let storage = Self {
            db_path,
            memory_conn: None,
        };
        storage.initialize_schema()?;
        Ok(storage)
    }

    /// Create an in-memory storage for testing
    pub fn in_memory() -> Result<Self> {
        let conn =
            Connection::open_in_memory().with_context(|| "Failed to create in-memory database")?;
        let storage = Self {
            db_path: PathBuf::from(":memory:"),
            memory_conn: Some(Arc::new(Mutex::new(conn))),
        };
        storage.initialize_schema()?;
        Ok(storage)
    }

    pub fn path(&self) -> &PathBuf {
        &self.db_path
    }

    fn connect(&self) -> Result<ConnectionHandle> {
        if let Some(ref conn) = self.memory_conn {
            Ok(ConnectionHandle::Shared(conn.clone()))
        } else {
            let conn = Connection::open(&self.db_path)
                .with_context(|| format!("Failed to open database at {:?}", self.db_path))?;
            Ok(ConnectionHandle::Owned(conn))
        }
    }

    fn initialize_schema(&self) -> Result<()> {
        let handle = self.connect()?;
        handle.with_conn(|conn| {
            conn.execute(
                "CREATE TABLE IF NOT EXISTS table_filters (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                )",
                [],
            )?;
            Ok(())
        })
    }

    /// All stored keys, sorted
    pub fn keys(&self) -> Result<Vec<String>> {
        let handle = self.connect()?;
        handle.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT key FROM table_filters ORDER BY key ASC")?;
            let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
            let mut keys = Vec::new();
            for key in rows {
                keys.push(key?);
            }
            Ok(keys)
        })
    }
}

impl FilterStore for SqliteFilterStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let handle = self.connect()?;
        handle.with_conn(|conn| {
            conn.query_row(
                "SELECT value FROM table_filters WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .with_context(|| format!("Failed to read filter record '{}'", key))
        })
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let handle = self.connect()?;
        let now = Utc::now().to_rfc3339();
        handle.with_conn(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO table_filters (key, value, updated_at) VALUES (?1, ?2, ?3)",
                params![key, value, now],
            )
            .with_context(|| format!("Failed to write filter record '{}'", key))?;
            Ok(())
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        let handle = self.connect()?;
        handle.with_conn(|conn| {
            conn.execute("DELETE FROM table_filters WHERE key = ?1", params![key])
                .with_context(|| format!("Failed to delete filter record '{}'", key))?;
            Ok(())
        })
    }
}
