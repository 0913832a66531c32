//! Lenient intention surface for callers.
//!
//! Writes still fail loudly. Everything on the read side logs the failure
//! and returns a safe default: absent, zero, or empty.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{error, warn};

use super::store::IntentionStore;
use super::types::{IntentionEntry, IntentionView, StorageInfo};
use crate::error::{MindgateError, MindgateResult};

/// Wraps an [`IntentionStore`] and swallows read-path failures.
#[derive(Clone)]
pub struct IntentionService {
    store: Arc<IntentionStore>,
}

impl IntentionService {
    pub fn new(store: Arc<IntentionStore>) -> Self {
        Self { store }
    }

    /// The wrapped store, for callers that want the errors.
    pub fn store(&self) -> &Arc<IntentionStore> {
        &self.store
    }

    /// Save an intention. Both `StoreUnavailable` and `Persistence` surface.
    pub async fn write(&self, url: &str, intention_text: &str) -> MindgateResult<IntentionEntry> {
        self.store.write(url, intention_text).await.map_err(|e| {
            log_failure("write", &e);
            e
        })
    }

    /// Active intention for the URL's domain, or `None` on any failure.
    pub async fn read(&self, url: &str) -> Option<IntentionEntry> {
        self.store
            .read(url)
            .await
            .unwrap_or_else(|e| degrade("read", &e, None))
    }

    /// Active intention plus the time it has left.
    pub async fn read_with_remaining(&self, url: &str) -> Option<IntentionView> {
        let entry = self.read(url).await?;
        let now = self.store.now_ms();
        Some(IntentionView {
            ms_remaining: entry.ms_remaining_at(now),
            expires_at: entry.expires_at,
            intention_text: entry.intention_text,
        })
    }

    /// Remove expired intentions; `0` when the store cannot be used.
    pub async fn sweep(&self) -> usize {
        self.store
            .sweep()
            .await
            .unwrap_or_else(|e| degrade("sweep", &e, 0))
    }

    /// Active intentions keyed by domain; empty on failure.
    pub async fn list_active(&self) -> HashMap<String, IntentionEntry> {
        self.store
            .list_active()
            .await
            .unwrap_or_else(|e| degrade("list_active", &e, HashMap::new()))
    }

    /// Debug view of the namespace; `None` on failure.
    pub async fn storage_info(&self) -> Option<StorageInfo> {
        self.store
            .storage_info()
            .await
            .map(Some)
            .unwrap_or_else(|e| degrade("storage_info", &e, None))
    }
}

fn degrade<T>(operation: &str, err: &MindgateError, fallback: T) -> T {
    log_failure(operation, err);
    fallback
}

fn log_failure(operation: &str, err: &MindgateError) {
    if err.is_unavailable() {
        warn!(operation, error = %err, "Storage not available");
    } else {
        error!(operation, error = %err, code = err.code().as_str(), "Intention storage failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::storage::MemoryKeyValueStore;
    use std::time::Duration;

    fn service() -> (IntentionService, Arc<MemoryKeyValueStore>, Arc<ManualClock>) {
        let kv = Arc::new(MemoryKeyValueStore::new());
        let clock = Arc::new(ManualClock::new(0));
        let store = IntentionStore::with_clock(kv.clone(), clock.clone(), Duration::from_secs(60));
        (IntentionService::new(Arc::new(store)), kv, clock)
    }

    #[tokio::test]
    async fn test_read_with_remaining() {
        let (svc, _kv, clock) = service();
        svc.write("https://example.com", "read docs").await.unwrap();

        clock.advance(Duration::from_secs(45));
        let view = svc.read_with_remaining("example.com").await.unwrap();
        assert_eq!(view.intention_text, "read docs");
        assert_eq!(view.ms_remaining, 15_000);
        assert_eq!(view.expires_at, 60_000);

        clock.set(60_000);
        let view = svc.read_with_remaining("example.com").await.unwrap();
        assert_eq!(view.ms_remaining, 0);

        clock.advance(Duration::from_millis(1));
        assert!(svc.read_with_remaining("example.com").await.is_none());
    }

    #[tokio::test]
    async fn test_unavailable_store_degrades() {
        let (svc, kv, _clock) = service();
        svc.write("example.com", "x").await.unwrap();
        kv.invalidate();

        assert!(svc.write("example.com", "y").await.unwrap_err().is_unavailable());
        assert!(svc.read("example.com").await.is_none());
        assert!(svc.read_with_remaining("example.com").await.is_none());
        assert_eq!(svc.sweep().await, 0);
        assert!(svc.list_active().await.is_empty());
        assert!(svc.storage_info().await.is_none());
    }
}
