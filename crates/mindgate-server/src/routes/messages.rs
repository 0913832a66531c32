//! Background message endpoint.

use axum::{extract::State, Json};

use mindgate_core::{BackgroundMessage, MessageResponse};

use crate::state::AppState;

/// Dispatch one background message.
/// POST /messages
///
/// Unknown `type` values are rejected by the JSON extractor.
pub async fn dispatch_message(
    State(state): State<AppState>,
    Json(message): Json<BackgroundMessage>,
) -> Json<MessageResponse> {
    Json(state.messages.dispatch(message).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::test_app;
    use std::time::Duration;

    #[tokio::test]
    async fn test_cleanup_message() {
        let app = test_app();
        app.state.intentions.write("reddit.com", "x").await.unwrap();
        app.clock.advance(Duration::from_secs(7200));

        let Json(reply) = dispatch_message(
            State(app.state.clone()),
            Json(BackgroundMessage::CleanupIntentions),
        )
        .await;
        assert_eq!(reply, MessageResponse::Cleanup { cleaned_count: 1 });
    }
}
