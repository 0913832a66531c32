//! Supabase implementation of [`BlockedSitesBackend`].
//!
//! Talks to GoTrue (`/auth/v1`) for the session user and PostgREST
//! (`/rest/v1`) for the blocked-sites table.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use mindgate_core::config::BackendConfig;
use mindgate_core::error::{ErrorCode, MindgateError, MindgateResult};

use crate::backend::{BlockedSitesBackend, UserIdentity};

/// Supabase-backed blocked-sites store.
pub struct SupabaseBackend {
    client: Client,
    url: String,
    anon_key: SecretString,
    access_token: Option<SecretString>,
    table: String,
}

#[derive(Debug, Deserialize)]
struct UrlRow {
    url: String,
}

impl SupabaseBackend {
    /// Create a backend for the project at `url`.
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into().trim_end_matches('/').to_string(),
            anon_key: SecretString::new(anon_key.into()),
            access_token: None,
            table: "blocked_sites".to_string(),
        }
    }

    /// Create a backend from configuration; URL and anon key are required.
    pub fn from_config(config: &BackendConfig) -> MindgateResult<Self> {
        let url = config
            .url
            .clone()
            .ok_or_else(|| MindgateError::Configuration("Supabase URL required".to_string()))?;
        let anon_key = config.anon_key.clone().ok_or_else(|| {
            MindgateError::Configuration("Supabase anon key required".to_string())
        })?;

        let mut backend = Self::new(url, anon_key).with_table(config.table.clone());
        if let Some(token) = &config.access_token {
            backend = backend.with_access_token(token.clone());
        }
        Ok(backend)
    }

    /// Act as the user owning this session token.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(SecretString::new(token.into()));
        self
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    fn headers(&self) -> MindgateResult<reqwest::header::HeaderMap> {
        let bearer = self
            .access_token
            .as_ref()
            .unwrap_or(&self.anon_key)
            .expose_secret();

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("apikey", header_value(self.anon_key.expose_secret())?);
        headers.insert(
            reqwest::header::AUTHORIZATION,
            header_value(&format!("Bearer {}", bearer))?,
        );
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            header_value("application/json")?,
        );
        Ok(headers)
    }

    fn rest_url(&self, path: &str) -> String {
        format!("{}/rest/v1{}", self.url, path)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1{}", self.url, path)
    }
}

fn header_value(value: &str) -> MindgateResult<reqwest::header::HeaderValue> {
    value
        .parse()
        .map_err(|_| MindgateError::Configuration("Invalid characters in Supabase credentials".to_string()))
}

fn connection_error(action: &str, err: reqwest::Error) -> MindgateError {
    MindgateError::Network {
        message: format!("Failed to {}: {}", action, err),
        code: ErrorCode::NetConnectionFailed,
        source: Some(Box::new(err)),
    }
}

async fn ensure_success(response: Response) -> MindgateResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(MindgateError::from_http_status(status.as_u16(), &body))
}

#[async_trait]
impl BlockedSitesBackend for SupabaseBackend {
    async fn current_user(&self) -> MindgateResult<Option<UserIdentity>> {
        if self.access_token.is_none() {
            debug!("No access token, no active session");
            return Ok(None);
        }

        let response = self
            .client
            .get(self.auth_url("/user"))
            .headers(self.headers()?)
            .send()
            .await
            .map_err(|e| connection_error("resolve session user", e))?;

        if matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            info!("Auth session missing or expired");
            return Ok(None);
        }

        let user: UserIdentity = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|e| connection_error("parse session user", e))?;
        Ok(Some(user))
    }

    async fn select_urls(&self, user_id: &str) -> MindgateResult<Vec<String>> {
        let response = self
            .client
            .get(self.rest_url(&format!("/{}", self.table)))
            .headers(self.headers()?)
            .query(&[("select", "url".to_string()), ("user_id", format!("eq.{}", user_id))])
            .send()
            .await
            .map_err(|e| connection_error("fetch blocked sites", e))?;

        let rows: Vec<UrlRow> = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|e| connection_error("parse blocked sites", e))?;
        Ok(rows.into_iter().map(|r| r.url).collect())
    }

    async fn insert_urls(&self, user_id: &str, urls: &[String]) -> MindgateResult<()> {
        if urls.is_empty() {
            return Ok(());
        }

        let rows: Vec<serde_json::Value> = urls
            .iter()
            .map(|url| json!({ "url": url, "user_id": user_id }))
            .collect();

        let response = self
            .client
            .post(self.rest_url(&format!("/{}", self.table)))
            .headers(self.headers()?)
            .header("Prefer", "return=minimal")
            .json(&rows)
            .send()
            .await
            .map_err(|e| connection_error("insert blocked sites", e))?;

        ensure_success(response).await?;
        Ok(())
    }
}
