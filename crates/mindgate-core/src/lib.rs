//! mindgate-core - Core library for mindgate.
//!
//! This crate provides the intention store, the key-value storage it sits
//! on, the background message contract, and the sweep runtime for the
//! mindgate background service.
//!
//! # Example
//!
//! ```ignore
//! use mindgate_core::{BackgroundRuntime, MindgateConfig};
//!
//! let config = MindgateConfig::from_env();
//! let runtime = BackgroundRuntime::new(&config).await?;
//! runtime.start().await?;
//!
//! let intentions = runtime.intentions();
//! intentions.write("https://www.reddit.com/r/rust", "read one thread").await?;
//! let active = intentions.read("reddit.com").await;
//! ```

pub mod clock;
pub mod config;
pub mod domain;
pub mod error;
pub mod intentions;
pub mod lifecycle;
pub mod messages;
pub mod runtime;
pub mod scheduler;
pub mod storage;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{MindgateConfig, StorageBackend};
pub use domain::normalize_url;
pub use error::{ErrorCode, MindgateError, MindgateResult};
pub use intentions::{
    IntentionDebugEntry, IntentionEntry, IntentionService, IntentionStore, IntentionView,
    StorageInfo,
};
pub use lifecycle::{on_installed, InstallReason};
pub use messages::{BackgroundMessage, HostUi, MessageResponse, MessageRouter};
pub use runtime::BackgroundRuntime;
pub use scheduler::SweepScheduler;
pub use storage::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore};
