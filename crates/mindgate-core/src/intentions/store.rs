//! TTL intention storage over the shared key-value namespace.
//!
//! Every operation here returns a `MindgateResult`; the lenient,
//! never-failing surface lives in [`IntentionService`](super::IntentionService).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::types::{IntentionDebugEntry, IntentionEntry, StorageInfo, StoredRecord};
use crate::clock::{duration_ms, Clock, SystemClock};
use crate::domain::normalize_url;
use crate::error::MindgateResult;
use crate::storage::KeyValueStore;

/// Intention store with a fixed time-to-live.
///
/// Expired entries can linger in the backing store until the next read of
/// their key or the next [`sweep`](Self::sweep); every read path treats them
/// as absent.
pub struct IntentionStore {
    kv: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl IntentionStore {
    /// Create a store using the wall clock.
    pub fn new(kv: Arc<dyn KeyValueStore>, ttl: Duration) -> Self {
        Self::with_clock(kv, Arc::new(SystemClock), ttl)
    }

    /// Create a store with an explicit time source.
    pub fn with_clock(kv: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self { kv, clock, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Current time according to the store's clock.
    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    /// The backing key-value store.
    pub fn kv(&self) -> &Arc<dyn KeyValueStore> {
        &self.kv
    }

    /// Write an intention for the URL's domain, replacing any previous one.
    pub async fn write(&self, url: &str, intention_text: &str) -> MindgateResult<IntentionEntry> {
        let domain_key = normalize_url(url);
        let created_at = self.clock.now_ms();
        let entry = IntentionEntry {
            domain_key,
            intention_text: intention_text.to_string(),
            created_at,
            expires_at: created_at.saturating_add(duration_ms(self.ttl)),
        };

        self.kv
            .set_one(&entry.domain_key, entry.to_stored_value()?)
            .await?;

        info!(
            domain = %entry.domain_key,
            url = %url,
            expires_at = entry.expires_at,
            "Intention saved"
        );
        Ok(entry)
    }

    /// Read the active intention for the URL's domain.
    ///
    /// An expired entry is removed on the way out. If that removal fails the
    /// entry is still reported absent and the next sweep picks it up.
    pub async fn read(&self, url: &str) -> MindgateResult<Option<IntentionEntry>> {
        let domain_key = normalize_url(url);
        let Some(value) = self.kv.get(&domain_key).await? else {
            return Ok(None);
        };
        let Some(record) = StoredRecord::decode(&value) else {
            debug!(domain = %domain_key, "Value under domain key is not an intention");
            return Ok(None);
        };

        let entry = IntentionEntry::from_record(domain_key, record);
        if entry.is_expired_at(self.clock.now_ms()) {
            info!(domain = %entry.domain_key, "Intention expired, removing from storage");
            if let Err(e) = self.kv.remove_one(&entry.domain_key).await {
                warn!(domain = %entry.domain_key, error = %e, "Failed to evict expired intention");
            }
            return Ok(None);
        }

        Ok(Some(entry))
    }

    /// Remove every expired intention in one bulk call.
    ///
    /// Returns the number of keys removed. Enumeration and removal are two
    /// separate store calls, so a key rewritten in between can still be
    /// removed.
    pub async fn sweep(&self) -> MindgateResult<usize> {
        let all = self.kv.get_all().await?;
        let now = self.clock.now_ms();

        let expired: Vec<String> = all
            .iter()
            .filter_map(|(key, value)| {
                StoredRecord::decode(value)
                    .filter(|record| now > record.expires_at)
                    .map(|_| key.clone())
            })
            .collect();

        if expired.is_empty() {
            return Ok(0);
        }

        self.kv.remove(&expired).await?;
        info!(removed = expired.len(), "Cleaned up expired intentions");
        Ok(expired.len())
    }

    /// All active intentions keyed by domain.
    pub async fn list_active(&self) -> MindgateResult<HashMap<String, IntentionEntry>> {
        let all = self.kv.get_all().await?;
        let now = self.clock.now_ms();

        Ok(all
            .into_iter()
            .filter_map(|(key, value)| {
                let record = StoredRecord::decode(&value)?;
                let entry = IntentionEntry::from_record(key.clone(), record);
                entry.is_active_at(now).then_some((key, entry))
            })
            .collect())
    }

    /// Counts and per-intention details for the whole namespace.
    pub async fn storage_info(&self) -> MindgateResult<StorageInfo> {
        let all = self.kv.get_all().await?;
        let now = self.clock.now_ms();

        let mut intentions: Vec<IntentionDebugEntry> = all
            .iter()
            .filter_map(|(key, value)| {
                let entry = IntentionEntry::from_record(key.clone(), StoredRecord::decode(value)?);
                Some(IntentionDebugEntry {
                    is_expired: entry.is_expired_at(now),
                    ms_remaining: entry.ms_remaining_at(now),
                    domain_key: entry.domain_key,
                    intention_text: entry.intention_text,
                    created_at: entry.created_at,
                    expires_at: entry.expires_at,
                })
            })
            .collect();
        intentions.sort_by(|a, b| {
            a.expires_at
                .cmp(&b.expires_at)
                .then_with(|| a.domain_key.cmp(&b.domain_key))
        });

        let expired_count = intentions.iter().filter(|i| i.is_expired).count();
        Ok(StorageInfo {
            total_entries: all.len(),
            intention_entries: intentions.len(),
            expired_count,
            active_count: intentions.len() - expired_count,
            intentions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::storage::MemoryKeyValueStore;
    use serde_json::json;

    const HOUR: Duration = Duration::from_secs(3600);

    fn store_at(now_ms: i64) -> (IntentionStore, Arc<MemoryKeyValueStore>, Arc<ManualClock>) {
        let kv = Arc::new(MemoryKeyValueStore::new());
        let clock = Arc::new(ManualClock::new(now_ms));
        let store = IntentionStore::with_clock(kv.clone(), clock.clone(), 8 * HOUR);
        (store, kv, clock)
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let (store, _kv, _clock) = store_at(1_000);

        let written = store
            .write("https://www.reddit.com/r/rust", "focus on work")
            .await
            .unwrap();
        assert_eq!(written.domain_key, "reddit.com");
        assert_eq!(written.created_at, 1_000);
        assert_eq!(written.expires_at, 1_000 + 8 * 3_600_000);

        let read = store.read("reddit.com").await.unwrap().unwrap();
        assert_eq!(read, written);
    }

    #[tokio::test]
    async fn test_write_overwrites_and_restarts_ttl() {
        let (store, _kv, clock) = store_at(0);
        store.write("https://reddit.com", "first").await.unwrap();

        clock.advance(2 * HOUR);
        store.write("http://www.reddit.com/page", "second").await.unwrap();

        let read = store.read("reddit.com").await.unwrap().unwrap();
        assert_eq!(read.intention_text, "second");
        assert_eq!(read.created_at, 2 * 3_600_000);
        assert_eq!(store.list_active().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_read_evicts_expired() {
        let (store, kv, clock) = store_at(0);
        store.write("reddit.com", "focus").await.unwrap();

        clock.advance(9 * HOUR);
        assert!(store.read("reddit.com").await.unwrap().is_none());
        assert!(kv.get("reddit.com").await.unwrap().is_none());

        // Already gone, so the sweep has nothing left to count
        assert_eq!(store.sweep().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_entry_active_exactly_at_expiry() {
        let (store, _kv, clock) = store_at(0);
        let entry = store.write("reddit.com", "focus").await.unwrap();

        clock.set(entry.expires_at);
        assert!(store.read("reddit.com").await.unwrap().is_some());

        clock.set(entry.expires_at + 1);
        assert!(store.read("reddit.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sweep_only_touches_expired_intentions() {
        let (store, kv, clock) = store_at(0);
        store.write("old.example", "old").await.unwrap();
        clock.advance(4 * HOUR);
        store.write("new.example", "new").await.unwrap();
        kv.set_one("pendingRoute", json!("/settings")).await.unwrap();
        kv.set_one("legacy", json!({"intentionText": "x", "expiresAt": 0}))
            .await
            .unwrap();

        clock.advance(5 * HOUR);
        assert_eq!(store.sweep().await.unwrap(), 1);
        assert_eq!(store.sweep().await.unwrap(), 0);

        let remaining = kv.get_all().await.unwrap();
        assert!(remaining.contains_key("new.example"));
        assert!(remaining.contains_key("pendingRoute"));
        assert!(remaining.contains_key("legacy"));
        assert!(!remaining.contains_key("old.example"));
    }

    #[tokio::test]
    async fn test_read_ignores_foreign_value() {
        let (store, kv, _clock) = store_at(0);
        kv.set_one("pendingRoute", json!("/welcome")).await.unwrap();

        assert!(store.read("pendingRoute").await.unwrap().is_none());
        assert!(kv.get("pendingRoute").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_list_active_and_storage_info() {
        let (store, kv, clock) = store_at(0);
        store.write("a.example", "a").await.unwrap();
        clock.advance(HOUR);
        store.write("b.example", "b").await.unwrap();
        kv.set_one("pendingRoute", json!("/")).await.unwrap();

        clock.advance(7 * HOUR + Duration::from_millis(1));

        let active = store.list_active().await.unwrap();
        assert_eq!(active.len(), 1);
        assert!(active.contains_key("b.example"));

        let info = store.storage_info().await.unwrap();
        assert_eq!(info.total_entries, 3);
        assert_eq!(info.intention_entries, 2);
        assert_eq!(info.expired_count, 1);
        assert_eq!(info.active_count, 1);
        assert_eq!(info.intentions[0].domain_key, "a.example");
        assert!(info.intentions[0].is_expired);
        assert_eq!(info.intentions[0].ms_remaining, 0);
        assert_eq!(info.intentions[1].ms_remaining, 3_600_000 - 1);
    }

    #[tokio::test]
    async fn test_storage_info_with_out_of_range_expiry() {
        let (store, kv, _clock) = store_at(1_000);
        kv.set_one(
            "broken.example",
            json!({
                "kind": "intention",
                "intentionText": "x",
                "createdAt": 0,
                "expiresAt": i64::MIN
            }),
        )
        .await
        .unwrap();

        let info = store.storage_info().await.unwrap();
        assert_eq!(info.expired_count, 1);
        assert_eq!(info.intentions[0].ms_remaining, 0);
        assert_eq!(store.sweep().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_errors_surface_from_core_api() {
        let (store, kv, _clock) = store_at(0);
        kv.invalidate();

        assert!(store.write("reddit.com", "x").await.unwrap_err().is_unavailable());
        assert!(store.read("reddit.com").await.unwrap_err().is_unavailable());
        assert!(store.sweep().await.unwrap_err().is_unavailable());
        assert!(store.list_active().await.unwrap_err().is_unavailable());
    }
}
