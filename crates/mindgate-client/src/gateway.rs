//! Blocked-sites gateway.
//!
//! Reads fall back to a fixed block list when nobody is signed in or the
//! backend fails, and block checks fail open. Publishing surfaces errors.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use mindgate_core::config::DEFAULT_FALLBACK_DOMAINS;
use mindgate_core::domain::normalize_url;
use mindgate_core::MindgateResult;

use crate::backend::BlockedSitesBackend;

/// Whether `candidate` falls under the blocked entry `blocked`.
///
/// Both sides are normalized; the candidate matches on an equal domain or
/// when the raw candidate contains the blocked domain. An entry that
/// normalizes to nothing never matches.
pub fn blocked_match(candidate: &str, blocked: &str) -> bool {
    let blocked_domain = normalize_url(blocked);
    if blocked_domain.is_empty() {
        return false;
    }
    normalize_url(candidate) == blocked_domain || candidate.contains(&blocked_domain)
}

/// Per-user blocked sites over a [`BlockedSitesBackend`].
#[derive(Clone)]
pub struct BlockedSitesGateway {
    backend: Arc<dyn BlockedSitesBackend>,
    fallback: Vec<String>,
}

impl BlockedSitesGateway {
    /// Create a gateway using the default fallback list.
    pub fn new(backend: Arc<dyn BlockedSitesBackend>) -> Self {
        Self {
            backend,
            fallback: DEFAULT_FALLBACK_DOMAINS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// Replace the fallback list.
    pub fn with_fallback(mut self, fallback: Vec<String>) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn fallback(&self) -> &[String] {
        &self.fallback
    }

    /// Blocked URLs of the signed-in user; `None` when nobody is signed in.
    pub async fn try_fetch_blocked_domains(&self) -> MindgateResult<Option<Vec<String>>> {
        let Some(user) = self.backend.current_user().await? else {
            return Ok(None);
        };
        let urls = self.backend.select_urls(&user.id).await?;
        debug!(user_id = %user.id, count = urls.len(), "Fetched blocked sites");
        Ok(Some(urls))
    }

    /// Blocked URLs, or the fallback list when there is no user or the
    /// backend fails.
    pub async fn fetch_blocked_domains(&self) -> Vec<String> {
        match self.try_fetch_blocked_domains().await {
            Ok(Some(urls)) => urls,
            Ok(None) => {
                info!(count = self.fallback.len(), "No active session, using fallback block list");
                self.fallback.clone()
            }
            Err(e) => {
                warn!(error = %e, code = e.code().as_str(), "Failed to fetch blocked sites, using fallback block list");
                self.fallback.clone()
            }
        }
    }

    /// Add the given URLs for the signed-in user, skipping ones already stored.
    ///
    /// Returns the number of rows inserted; `0` when nobody is signed in or
    /// every URL is already present.
    pub async fn publish_blocked_domains(&self, urls: &[String]) -> MindgateResult<usize> {
        let Some(user) = self.backend.current_user().await? else {
            info!("No active session, not publishing blocked sites");
            return Ok(0);
        };

        let existing: HashSet<String> = self
            .backend
            .select_urls(&user.id)
            .await?
            .into_iter()
            .collect();

        let mut seen = HashSet::new();
        let missing: Vec<String> = urls
            .iter()
            .filter(|url| !existing.contains(*url) && seen.insert(url.as_str()))
            .cloned()
            .collect();

        if missing.is_empty() {
            debug!(user_id = %user.id, "No new blocked sites to add");
            return Ok(0);
        }

        self.backend.insert_urls(&user.id, &missing).await?;
        info!(user_id = %user.id, added = missing.len(), "Saved blocked sites");
        Ok(missing.len())
    }

    /// Whether `url` is blocked for the current user. Never fails.
    pub async fn is_blocked(&self, url: &str) -> bool {
        let blocked = self.fetch_blocked_domains().await;
        match blocked.iter().find(|b| blocked_match(url, b)) {
            Some(entry) => {
                debug!(url, blocked = %entry, "URL matches blocked site");
                true
            }
            None => false,
        }
    }
}
