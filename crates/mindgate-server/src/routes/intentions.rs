//! Intention endpoints.

use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use mindgate_core::{IntentionEntry, IntentionView, MindgateError, StorageInfo};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Request body for writing an intention.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteIntentionRequest {
    /// Any URL or bare domain on the site.
    pub url: String,
    pub intention_text: String,
}

/// `?url=` query.
#[derive(Debug, Deserialize)]
pub struct UrlQuery {
    pub url: String,
}

/// Save an intention, replacing any previous one for the domain.
/// POST /intentions
pub async fn write_intention(
    State(state): State<AppState>,
    Json(request): Json<WriteIntentionRequest>,
) -> ApiResult<(StatusCode, Json<IntentionEntry>)> {
    if request.url.trim().is_empty() {
        return Err(MindgateError::validation("url must not be empty").into());
    }

    let entry = state
        .intentions
        .write(request.url.trim(), &request.intention_text)
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// Active intentions keyed by domain.
/// GET /intentions
pub async fn list_intentions(
    State(state): State<AppState>,
) -> Json<HashMap<String, IntentionEntry>> {
    Json(state.intentions.list_active().await)
}

/// Active intention for a URL, with its remaining time.
/// GET /intentions/lookup?url=
pub async fn lookup_intention(
    State(state): State<AppState>,
    Query(query): Query<UrlQuery>,
) -> ApiResult<Json<IntentionView>> {
    state
        .intentions
        .read_with_remaining(&query.url)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("No active intention for {}", query.url)))
}

/// Debug view of the storage namespace.
/// GET /intentions/debug
pub async fn storage_debug(State(state): State<AppState>) -> ApiResult<Json<StorageInfo>> {
    state.intentions.storage_info().await.map(Json).ok_or_else(|| {
        ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "STORE_001",
            "Storage info unavailable",
        )
    })
}
