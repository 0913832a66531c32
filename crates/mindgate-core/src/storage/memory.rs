//! In-process key-value store.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use super::KeyValueStore;
use crate::error::{MindgateError, MindgateResult};

/// Key-value store held in memory.
///
/// Can be invalidated to behave like a store whose host context was torn
/// down: every call then fails with `StoreUnavailable` until restored.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: RwLock<HashMap<String, Value>>,
    invalidated: AtomicBool,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `StoreUnavailable`.
    pub fn invalidate(&self) {
        self.invalidated.store(true, Ordering::SeqCst);
    }

    /// Undo [`invalidate`](Self::invalidate). Data is kept.
    pub fn restore(&self) {
        self.invalidated.store(false, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> MindgateResult<()> {
        if self.invalidated.load(Ordering::SeqCst) {
            return Err(MindgateError::store_unavailable("storage context invalidated"));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> MindgateResult<Option<Value>> {
        self.ensure_available()?;
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn get_all(&self) -> MindgateResult<HashMap<String, Value>> {
        self.ensure_available()?;
        Ok(self.entries.read().await.clone())
    }

    async fn set(&self, entries: HashMap<String, Value>) -> MindgateResult<()> {
        self.ensure_available()?;
        self.entries.write().await.extend(entries);
        Ok(())
    }

    async fn remove(&self, keys: &[String]) -> MindgateResult<()> {
        self.ensure_available()?;
        let mut guard = self.entries.write().await;
        for key in keys {
            guard.remove(key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_set_get_remove() {
        let store = MemoryKeyValueStore::new();
        store.set_one("a", json!({"x": 1})).await.unwrap();
        store.set_one("b", json!("plain")).await.unwrap();

        assert_eq!(store.get("a").await.unwrap(), Some(json!({"x": 1})));
        assert_eq!(store.get_all().await.unwrap().len(), 2);

        store.remove(&["a".to_string(), "missing".to_string()]).await.unwrap();
        assert!(store.get("a").await.unwrap().is_none());
        assert!(store.get("b").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let store = MemoryKeyValueStore::new();
        store.set_one("k", json!(1)).await.unwrap();
        store.set_one("k", json!(2)).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(json!(2)));
    }

    #[tokio::test]
    async fn test_invalidated_store_is_unavailable() {
        let store = MemoryKeyValueStore::new();
        store.set_one("k", json!(1)).await.unwrap();
        store.invalidate();

        let err = store.get("k").await.unwrap_err();
        assert!(err.is_unavailable());
        assert!(store.get_all().await.unwrap_err().is_unavailable());
        assert!(store.remove_one("k").await.unwrap_err().is_unavailable());

        store.restore();
        assert_eq!(store.get("k").await.unwrap(), Some(json!(1)));
    }
}
