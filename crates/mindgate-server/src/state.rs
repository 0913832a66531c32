//! Server state management.

use std::sync::Arc;

use mindgate_client::BlockedSitesGateway;
use mindgate_core::{BackgroundRuntime, HostUi, IntentionService, MessageRouter};
use tokio::sync::RwLock;

use crate::ui::HeadlessUi;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub intentions: IntentionService,
    pub messages: MessageRouter,
    pub blocked_sites: BlockedSitesGateway,
    pub ui: Arc<HeadlessUi>,
    pub welcome_url: String,
    runtime: Arc<RwLock<Option<BackgroundRuntime>>>,
}

impl AppState {
    /// Create state over an intention service, without a background runtime.
    pub fn new(
        intentions: IntentionService,
        blocked_sites: BlockedSitesGateway,
        ui: Arc<HeadlessUi>,
        welcome_url: impl Into<String>,
    ) -> Self {
        let host_ui: Arc<dyn HostUi> = ui.clone();
        Self {
            messages: MessageRouter::new(intentions.clone(), host_ui),
            intentions,
            blocked_sites,
            ui,
            welcome_url: welcome_url.into(),
            runtime: Arc::new(RwLock::new(None)),
        }
    }

    /// Create state owning a started (or startable) runtime.
    pub fn new_with_runtime(
        runtime: BackgroundRuntime,
        blocked_sites: BlockedSitesGateway,
        ui: Arc<HeadlessUi>,
    ) -> Self {
        let welcome_url = runtime.config().welcome_url.clone();
        let mut state = Self::new(runtime.intentions(), blocked_sites, ui, welcome_url);
        state.runtime = Arc::new(RwLock::new(Some(runtime)));
        state
    }

    /// Take the runtime out for shutdown. Returns `None` the second time.
    pub async fn take_runtime(&self) -> Option<BackgroundRuntime> {
        self.runtime.write().await.take()
    }

    /// Whether a background runtime is attached.
    pub async fn has_runtime(&self) -> bool {
        self.runtime.read().await.is_some()
    }
}
