//! Host UI for a process without a browser attached.

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::info;

use mindgate_core::{HostUi, MindgateResult};

/// A UI action the service asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    PopupOpened,
    TabOpened(String),
}

/// [`HostUi`] that logs each request and broadcasts it to subscribers.
#[derive(Clone)]
pub struct HeadlessUi {
    events: broadcast::Sender<UiEvent>,
}

impl HeadlessUi {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(64);
        Self { events }
    }

    /// Receive UI events from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<UiEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: UiEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

impl Default for HeadlessUi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HostUi for HeadlessUi {
    async fn open_popup(&self) -> MindgateResult<()> {
        info!("Popup requested");
        self.emit(UiEvent::PopupOpened);
        Ok(())
    }

    async fn open_tab(&self, url: &str) -> MindgateResult<()> {
        info!(url, "Tab requested");
        self.emit(UiEvent::TabOpened(url.to_string()));
        Ok(())
    }
}
