//! Intention types.
//!
//! - `IntentionEntry`: an intention as seen by callers, keyed by domain
//! - `StoredRecord`: the tagged form written into the shared namespace
//! - `IntentionView`: an entry plus its remaining lifetime
//! - `StorageInfo`: debug view over the whole namespace

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An intention attached to a domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentionEntry {
    /// Normalized hostname the intention is stored under
    pub domain_key: String,
    /// Free-form user note
    pub intention_text: String,
    /// Creation time, epoch milliseconds
    pub created_at: i64,
    /// `created_at + ttl`, epoch milliseconds
    pub expires_at: i64,
}

impl IntentionEntry {
    /// Active iff `now <= expires_at`.
    pub fn is_active_at(&self, now_ms: i64) -> bool {
        now_ms <= self.expires_at
    }

    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        !self.is_active_at(now_ms)
    }

    /// Milliseconds until expiry, never negative.
    pub fn ms_remaining_at(&self, now_ms: i64) -> i64 {
        self.expires_at.saturating_sub(now_ms).max(0)
    }

    pub(crate) fn from_record(domain_key: impl Into<String>, record: IntentionRecord) -> Self {
        Self {
            domain_key: domain_key.into(),
            intention_text: record.intention_text,
            created_at: record.created_at,
            expires_at: record.expires_at,
        }
    }

    pub(crate) fn to_stored_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(StoredRecord::Intention(IntentionRecord {
            intention_text: self.intention_text.clone(),
            created_at: self.created_at,
            expires_at: self.expires_at,
        }))
    }
}

/// Tagged value written to the key-value store.
///
/// The `kind` tag is what marks a value as an intention; the namespace also
/// holds unrelated data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub(crate) enum StoredRecord {
    Intention(IntentionRecord),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IntentionRecord {
    pub intention_text: String,
    pub created_at: i64,
    pub expires_at: i64,
}

impl StoredRecord {
    /// Decode a stored value, or `None` if it is not an intention record.
    pub(crate) fn decode(value: &Value) -> Option<IntentionRecord> {
        match StoredRecord::deserialize(value) {
            Ok(StoredRecord::Intention(record)) => Some(record),
            Err(_) => None,
        }
    }
}

/// An active intention with its remaining lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentionView {
    pub intention_text: String,
    /// `max(0, expires_at - now)`
    pub ms_remaining: i64,
    pub expires_at: i64,
}

/// One intention as reported by [`StorageInfo`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentionDebugEntry {
    pub domain_key: String,
    pub intention_text: String,
    pub created_at: i64,
    pub expires_at: i64,
    pub is_expired: bool,
    pub ms_remaining: i64,
}

/// Snapshot of the shared namespace, for debugging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageInfo {
    /// Every key in the namespace, intention or not
    pub total_entries: usize,
    pub intention_entries: usize,
    pub expired_count: usize,
    pub active_count: usize,
    /// Sorted by `expires_at`, soonest first
    pub intentions: Vec<IntentionDebugEntry>,
}
