//! Inbound background messages and their dispatch.
//!
//! Messages arrive as JSON objects tagged by `type`:
//!
//! ```json
//! {"type": "CLEANUP_INTENTIONS"}
//! {"type": "OPEN_POPUP_WITH_ROUTE", "route": "/settings"}
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info};

use crate::error::MindgateResult;
use crate::intentions::IntentionService;

/// Key holding the route the popup should open on next.
pub const PENDING_ROUTE_KEY: &str = "pendingRoute";

/// Route used when `OPEN_POPUP_WITH_ROUTE` carries none.
pub const DEFAULT_ROUTE: &str = "/";

/// Host surface the background service drives (popup, tabs).
#[async_trait]
pub trait HostUi: Send + Sync {
    /// Open the extension popup.
    async fn open_popup(&self) -> MindgateResult<()>;

    /// Open `url` in a new tab.
    async fn open_tab(&self, url: &str) -> MindgateResult<()>;
}

/// A message sent to the background service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BackgroundMessage {
    /// Sweep expired intentions now.
    CleanupIntentions,
    /// Report entry counts of the shared namespace.
    GetStorageInfo,
    OpenPopup,
    /// Remember a route for the popup, then open it.
    OpenPopupWithRoute {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        route: Option<String>,
    },
}

/// Reply to a [`BackgroundMessage`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageResponse {
    #[serde(rename_all = "camelCase")]
    Cleanup { cleaned_count: usize },
    #[serde(rename_all = "camelCase")]
    StorageInfo {
        total_entries: usize,
        intention_entries: usize,
    },
    Popup {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

impl MessageResponse {
    fn popup(result: MindgateResult<()>) -> Self {
        match result {
            Ok(()) => MessageResponse::Popup {
                success: true,
                error: None,
            },
            Err(e) => MessageResponse::Popup {
                success: false,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Routes [`BackgroundMessage`]s to the intention service and host UI.
#[derive(Clone)]
pub struct MessageRouter {
    intentions: IntentionService,
    ui: Arc<dyn HostUi>,
}

impl MessageRouter {
    pub fn new(intentions: IntentionService, ui: Arc<dyn HostUi>) -> Self {
        Self { intentions, ui }
    }

    /// Handle one message. Never fails; failures are reported in the reply.
    pub async fn dispatch(&self, message: BackgroundMessage) -> MessageResponse {
        debug!(?message, "Dispatching background message");

        match message {
            BackgroundMessage::CleanupIntentions => MessageResponse::Cleanup {
                cleaned_count: self.intentions.sweep().await,
            },
            BackgroundMessage::GetStorageInfo => {
                let (total_entries, intention_entries) = self
                    .intentions
                    .storage_info()
                    .await
                    .map(|info| (info.total_entries, info.intention_entries))
                    .unwrap_or((0, 0));
                MessageResponse::StorageInfo {
                    total_entries,
                    intention_entries,
                }
            }
            BackgroundMessage::OpenPopup => MessageResponse::popup(self.open_popup().await),
            BackgroundMessage::OpenPopupWithRoute { route } => {
                let route = route.unwrap_or_else(|| DEFAULT_ROUTE.to_string());
                MessageResponse::popup(self.open_popup_with_route(&route).await)
            }
        }
    }

    async fn open_popup(&self) -> MindgateResult<()> {
        self.ui.open_popup().await.map_err(|e| {
            error!(error = %e, "Failed to open popup");
            e
        })
    }

    async fn open_popup_with_route(&self, route: &str) -> MindgateResult<()> {
        self.intentions
            .store()
            .kv()
            .set_one(PENDING_ROUTE_KEY, Value::String(route.to_string()))
            .await
            .map_err(|e| {
                error!(route, error = %e, "Failed to store pending route");
                e
            })?;
        info!(route, "Stored pending popup route");
        self.open_popup().await
    }
}
