//! Local key-value storage shared by the intention store and other
//! extension state.
//!
//! The namespace is flat and shared: intention records sit next to
//! unrelated values such as the pending popup route, so callers must not
//! assume every value has a particular shape.

mod memory;
mod sqlite;

pub use memory::MemoryKeyValueStore;
pub use sqlite::SqliteKeyValueStore;

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

use crate::error::MindgateResult;

/// Asynchronous key-value store with single-call atomicity.
///
/// No transaction spans more than one call. Implementations report
/// [`MindgateError::StoreUnavailable`](crate::error::MindgateError::StoreUnavailable)
/// when the backing context is gone and `Persistence` for everything else.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Get the value stored under `key`.
    async fn get(&self, key: &str) -> MindgateResult<Option<Value>>;

    /// Get the whole namespace.
    async fn get_all(&self) -> MindgateResult<HashMap<String, Value>>;

    /// Write every entry, overwriting existing keys.
    async fn set(&self, entries: HashMap<String, Value>) -> MindgateResult<()>;

    /// Remove the given keys. Missing keys are ignored.
    async fn remove(&self, keys: &[String]) -> MindgateResult<()>;

    /// Write a single entry.
    async fn set_one(&self, key: &str, value: Value) -> MindgateResult<()> {
        let mut entries = HashMap::with_capacity(1);
        entries.insert(key.to_string(), value);
        self.set(entries).await
    }

    /// Remove a single key.
    async fn remove_one(&self, key: &str) -> MindgateResult<()> {
        self.remove(&[key.to_string()]).await
    }
}
