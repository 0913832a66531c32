//! Background runtime for the intention store.
//!
//! Wires storage, the intention store and the sweep scheduler together from
//! a [`MindgateConfig`], and owns their startup and shutdown.

use std::sync::Arc;

use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::config::{IntentionConfig, MindgateConfig, StorageBackend, StorageConfig};
use crate::error::{MindgateError, MindgateResult};
use crate::intentions::{IntentionService, IntentionStore};
use crate::scheduler::SweepScheduler;
use crate::storage::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore};

/// Open the key-value backend named by the storage config.
pub fn open_storage(config: &StorageConfig) -> MindgateResult<Arc<dyn KeyValueStore>> {
    let kv: Arc<dyn KeyValueStore> = match config.backend {
        StorageBackend::Memory => {
            debug!("Creating in-memory key-value store");
            Arc::new(MemoryKeyValueStore::new())
        }
        StorageBackend::Sqlite => {
            debug!(path = %config.path.display(), "Creating file-backed key-value store");
            Arc::new(SqliteKeyValueStore::new(&config.path)?)
        }
    };
    Ok(kv)
}

/// Background runtime managing the sweep lifecycle.
///
/// # Example
///
/// ```ignore
/// use mindgate_core::{BackgroundRuntime, MindgateConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = MindgateConfig::from_env();
///     let mut runtime = BackgroundRuntime::new(&config).await?;
///
///     // Startup sweep, then hourly sweeps
///     runtime.start().await?;
///
///     // ... application runs ...
///
///     runtime.shutdown().await?;
///     Ok(())
/// }
/// ```
pub struct BackgroundRuntime {
    intentions: IntentionService,
    scheduler: SweepScheduler,
    config: IntentionConfig,
}

impl BackgroundRuntime {
    /// Build storage and the intention store from `config`.
    ///
    /// This creates the scheduler but does not start it.
    pub async fn new(config: &MindgateConfig) -> MindgateResult<Self> {
        let kv = open_storage(&config.storage)?;
        Self::with_parts(kv, Arc::new(SystemClock), config.intentions.clone()).await
    }

    /// Build a runtime over an existing store and clock.
    pub async fn with_parts(
        kv: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        config: IntentionConfig,
    ) -> MindgateResult<Self> {
        debug!(
            ttl_secs = config.ttl_secs,
            sweep_interval_secs = config.sweep_interval_secs,
            sweep_on_start = config.sweep_on_start,
            "Creating BackgroundRuntime"
        );

        let store = IntentionStore::with_clock(kv, clock, config.ttl());
        let intentions = IntentionService::new(Arc::new(store));
        let scheduler = SweepScheduler::new(intentions.clone(), config.sweep_interval())
            .await
            .map_err(|e| MindgateError::internal(format!("Failed to create sweep scheduler: {}", e)))?;

        Ok(Self {
            intentions,
            scheduler,
            config,
        })
    }

    /// Run the startup sweep (if enabled) and start periodic sweeping.
    pub async fn start(&self) -> MindgateResult<()> {
        if self.config.sweep_on_start {
            let removed = self.intentions.sweep().await;
            info!(removed, "Startup sweep complete");
        }

        self.scheduler
            .start()
            .await
            .map_err(|e| MindgateError::internal(format!("Failed to start sweep scheduler: {}", e)))?;

        info!("Background runtime started");
        Ok(())
    }

    /// Stop periodic sweeping.
    pub async fn shutdown(&mut self) -> MindgateResult<()> {
        self.scheduler.shutdown().await.map_err(|e| {
            MindgateError::internal(format!("Failed to shutdown sweep scheduler: {}", e))
        })?;
        info!("Background runtime stopped");
        Ok(())
    }

    /// The lenient intention surface shared with the scheduler.
    pub fn intentions(&self) -> IntentionService {
        self.intentions.clone()
    }

    pub fn scheduler(&self) -> &SweepScheduler {
        &self.scheduler
    }

    pub fn config(&self) -> &IntentionConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::time::Duration;

    #[test]
    fn test_open_storage_memory() {
        let config = StorageConfig {
            backend: StorageBackend::Memory,
            ..Default::default()
        };
        assert!(open_storage(&config).is_ok());
    }

    #[test]
    fn test_open_storage_sqlite_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            backend: StorageBackend::Sqlite,
            path: dir.path().join("nested").join("storage.db"),
        };
        assert!(open_storage(&config).is_ok());
        assert!(dir.path().join("nested").join("storage.db").exists());
    }

    #[tokio::test]
    async fn test_start_runs_startup_sweep() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        let clock = Arc::new(ManualClock::new(0));
        let config = IntentionConfig {
            ttl_secs: 10,
            ..Default::default()
        };
        let mut runtime = BackgroundRuntime::with_parts(kv.clone(), clock.clone(), config)
            .await
            .unwrap();

        runtime.intentions().write("reddit.com", "x").await.unwrap();
        clock.advance(Duration::from_secs(11));

        runtime.start().await.unwrap();
        assert!(kv.get("reddit.com").await.unwrap().is_none());

        runtime.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_startup_sweep_can_be_disabled() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        let clock = Arc::new(ManualClock::new(0));
        let config = IntentionConfig {
            ttl_secs: 10,
            sweep_on_start: false,
            ..Default::default()
        };
        let mut runtime = BackgroundRuntime::with_parts(kv.clone(), clock.clone(), config)
            .await
            .unwrap();

        runtime.intentions().write("reddit.com", "x").await.unwrap();
        clock.advance(Duration::from_secs(11));

        runtime.start().await.unwrap();
        assert!(kv.get("reddit.com").await.unwrap().is_some());

        runtime.shutdown().await.unwrap();
    }
}
