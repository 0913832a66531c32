//! Blocked-sites endpoints.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::routes::UrlQuery;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct BlockedSitesBody {
    pub urls: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct PublishResponse {
    pub added: usize,
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub url: String,
    pub blocked: bool,
}

/// Blocked sites of the signed-in user, or the fallback list.
/// GET /blocked-sites
pub async fn get_blocked_sites(State(state): State<AppState>) -> Json<BlockedSitesBody> {
    Json(BlockedSitesBody {
        urls: state.blocked_sites.fetch_blocked_domains().await,
    })
}

/// Add sites for the signed-in user.
/// POST /blocked-sites
pub async fn publish_blocked_sites(
    State(state): State<AppState>,
    Json(body): Json<BlockedSitesBody>,
) -> ApiResult<Json<PublishResponse>> {
    let added = state
        .blocked_sites
        .publish_blocked_domains(&body.urls)
        .await?;
    Ok(Json(PublishResponse { added }))
}

/// Whether a URL is blocked. Fails open.
/// GET /blocked-sites/check?url=
pub async fn check_blocked(
    State(state): State<AppState>,
    Query(query): Query<UrlQuery>,
) -> Json<CheckResponse> {
    let blocked = state.blocked_sites.is_blocked(&query.url).await;
    Json(CheckResponse {
        url: query.url,
        blocked,
    })
}
