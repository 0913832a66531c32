//! Time-limited intentions attached to domains.
//!
//! An intention is a short note the user writes before visiting a site. It
//! is stored under the site's normalized domain key and expires after the
//! store's TTL (8 hours by default).
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use mindgate_core::intentions::{IntentionService, IntentionStore};
//! use mindgate_core::storage::MemoryKeyValueStore;
//!
//! # tokio_test::block_on(async {
//! let kv = Arc::new(MemoryKeyValueStore::new());
//! let store = IntentionStore::new(kv, Duration::from_secs(8 * 3600));
//! let intentions = IntentionService::new(Arc::new(store));
//!
//! intentions.write("https://www.reddit.com/r/rust", "check one thread").await.unwrap();
//! let entry = intentions.read("reddit.com").await.unwrap();
//! assert_eq!(entry.intention_text, "check one thread");
//! # });
//! ```

mod service;
mod store;
mod types;

pub use service::IntentionService;
pub use store::IntentionStore;
pub use types::{IntentionDebugEntry, IntentionEntry, IntentionView, StorageInfo};
