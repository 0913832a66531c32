//! Install and update handling.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::{info, warn};

use crate::intentions::IntentionService;
use crate::messages::HostUi;

/// Why the extension was (re)installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InstallReason {
    Install,
    Update,
    ChromeUpdate,
    SharedModuleUpdate,
}

impl InstallReason {
    /// Whether the welcome page should be shown for this reason.
    pub fn shows_welcome(self) -> bool {
        matches!(self, InstallReason::Install | InstallReason::ChromeUpdate)
    }
}

/// Handle an install/update event.
///
/// Opens the welcome page when [`InstallReason::shows_welcome`] holds, then
/// sweeps expired intentions. A failure to open the page is logged and does
/// not stop the sweep. Returns the number of intentions swept.
pub async fn on_installed(
    reason: InstallReason,
    intentions: &IntentionService,
    ui: &dyn HostUi,
    welcome_url: &str,
) -> usize {
    info!(%reason, "Extension installed or updated");

    if reason.shows_welcome() {
        match ui.open_tab(welcome_url).await {
            Ok(()) => info!(url = welcome_url, "Opened welcome page"),
            Err(e) => warn!(url = welcome_url, error = %e, "Failed to open welcome page"),
        }
    }

    intentions.sweep().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::error::{MindgateError, MindgateResult};
    use crate::intentions::IntentionStore;
    use crate::storage::MemoryKeyValueStore;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Default)]
    struct TabRecorder {
        opened: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl HostUi for TabRecorder {
        async fn open_popup(&self) -> MindgateResult<()> {
            Ok(())
        }

        async fn open_tab(&self, url: &str) -> MindgateResult<()> {
            if self.fail {
                return Err(MindgateError::internal("tabs unavailable"));
            }
            self.opened.lock().unwrap().push(url.to_string());
            Ok(())
        }
    }

    async fn service_with_expired_entry() -> IntentionService {
        let kv = Arc::new(MemoryKeyValueStore::new());
        let clock = Arc::new(ManualClock::new(0));
        let store = IntentionStore::with_clock(kv, clock.clone(), Duration::from_secs(60));
        let service = IntentionService::new(Arc::new(store));
        service.write("reddit.com", "stale").await.unwrap();
        clock.advance(Duration::from_secs(120));
        service
    }

    #[test]
    fn test_reason_parsing() {
        assert_eq!(
            "chrome_update".parse::<InstallReason>().unwrap(),
            InstallReason::ChromeUpdate
        );
        assert_eq!(InstallReason::SharedModuleUpdate.to_string(), "shared_module_update");
        assert!(InstallReason::Install.shows_welcome());
        assert!(!InstallReason::Update.shows_welcome());
    }

    #[tokio::test]
    async fn test_install_opens_welcome_and_sweeps() {
        let service = service_with_expired_entry().await;
        let ui = TabRecorder::default();

        let swept = on_installed(InstallReason::Install, &service, &ui, "welcome.html").await;
        assert_eq!(swept, 1);
        assert_eq!(*ui.opened.lock().unwrap(), vec!["welcome.html".to_string()]);
    }

    #[tokio::test]
    async fn test_update_only_sweeps() {
        let service = service_with_expired_entry().await;
        let ui = TabRecorder::default();

        let swept = on_installed(InstallReason::Update, &service, &ui, "welcome.html").await;
        assert_eq!(swept, 1);
        assert!(ui.opened.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_welcome_failure_still_sweeps() {
        let service = service_with_expired_entry().await;
        let ui = TabRecorder {
            fail: true,
            ..Default::default()
        };

        let swept = on_installed(InstallReason::ChromeUpdate, &service, &ui, "welcome.html").await;
        assert_eq!(swept, 1);
    }
}
