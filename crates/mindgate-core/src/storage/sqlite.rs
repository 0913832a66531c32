//! SQLite-backed key-value store.

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

use super::KeyValueStore;
use crate::error::{MindgateError, MindgateResult};

/// Key-value store persisted in a single SQLite table.
pub struct SqliteKeyValueStore {
    conn: Mutex<Connection>,
}

impl SqliteKeyValueStore {
    /// Open (or create) a store at the given path.
    pub fn new(path: impl AsRef<Path>) -> MindgateResult<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path.as_ref())?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        debug!(path = %path.as_ref().display(), "Opened SQLite key-value store");

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> MindgateResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> MindgateResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv_entries (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
        "#,
        )?;
        Ok(())
    }

    fn lock(&self) -> MindgateResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| MindgateError::store_unavailable("SQLite connection lock poisoned"))
    }
}

fn encode_value(key: &str, value: &Value) -> MindgateResult<String> {
    serde_json::to_string(value).map_err(|e| encode_error(key, e))
}

fn encode_error(key: &str, err: serde_json::Error) -> MindgateError {
    MindgateError::persistence(format!("Value for '{}' could not be encoded: {}", key, err))
}

#[async_trait]
impl KeyValueStore for SqliteKeyValueStore {
    async fn get(&self, key: &str) -> MindgateResult<Option<Value>> {
        let conn = self.lock()?;
        let raw: Option<String> = conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        raw.map(|text| {
            serde_json::from_str(&text).map_err(|e| {
                MindgateError::corrupt_value(format!("Value under '{}' is not JSON: {}", key, e))
            })
        })
        .transpose()
    }

    async fn get_all(&self) -> MindgateResult<HashMap<String, Value>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT key, value FROM kv_entries")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut entries = HashMap::new();
        for row in rows {
            let (key, text) = row?;
            match serde_json::from_str(&text) {
                Ok(value) => {
                    entries.insert(key, value);
                }
                Err(e) => warn!(key = %key, error = %e, "Skipping undecodable stored value"),
            }
        }
        Ok(entries)
    }

    async fn set(&self, entries: HashMap<String, Value>) -> MindgateResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                r#"INSERT INTO kv_entries (key, value) VALUES (?1, ?2)
                   ON CONFLICT(key) DO UPDATE SET value = excluded.value"#,
            )?;
            for (key, value) in &entries {
                stmt.execute(params![key, encode_value(key, value)?])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    async fn remove(&self, keys: &[String]) -> MindgateResult<()> {
        if keys.is_empty() {
            return Ok(());
        }
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached("DELETE FROM kv_entries WHERE key = ?1")?;
            for key in keys {
                stmt.execute(params![key])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}
