//! Install/update endpoint.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use mindgate_core::{on_installed, InstallReason};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct InstalledRequest {
    pub reason: InstallReason,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledResponse {
    pub reason: InstallReason,
    pub cleaned_count: usize,
}

/// Report an install or update event.
/// POST /lifecycle/installed
pub async fn installed(
    State(state): State<AppState>,
    Json(request): Json<InstalledRequest>,
) -> Json<InstalledResponse> {
    let cleaned_count = on_installed(
        request.reason,
        &state.intentions,
        state.ui.as_ref(),
        &state.welcome_url,
    )
    .await;

    Json(InstalledResponse {
        reason: request.reason,
        cleaned_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::test_app;
    use crate::ui::UiEvent;
    use std::time::Duration;

    #[tokio::test]
    async fn test_install_opens_welcome() {
        let app = test_app();
        let mut events = app.state.ui.subscribe();

        let Json(reply) = installed(
            State(app.state.clone()),
            Json(InstalledRequest {
                reason: InstallReason::Install,
            }),
        )
        .await;
        assert_eq!(reply.cleaned_count, 0);
        assert_eq!(
            events.try_recv().unwrap(),
            UiEvent::TabOpened("src/popup/index.html#/welcome".to_string())
        );
    }

    #[tokio::test]
    async fn test_update_does_not_open_welcome() {
        let app = test_app();
        app.state.intentions.write("reddit.com", "x").await.unwrap();
        app.clock.advance(Duration::from_secs(3601));
        let mut events = app.state.ui.subscribe();

        let Json(reply) = installed(
            State(app.state.clone()),
            Json(InstalledRequest {
                reason: InstallReason::Update,
            }),
        )
        .await;
        assert_eq!(reply.reason, InstallReason::Update);
        assert_eq!(reply.cleaned_count, 1);
        assert!(events.try_recv().is_err());
    }
}
