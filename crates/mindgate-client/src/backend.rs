//! Remote store of per-user blocked sites.

use async_trait::async_trait;
use mindgate_core::MindgateResult;
use serde::{Deserialize, Serialize};

/// The signed-in user, as reported by the auth service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Row-level access to the blocked-sites table.
///
/// `current_user` returns `Ok(None)` when nobody is signed in; that is not
/// an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlockedSitesBackend: Send + Sync {
    /// Resolve the user of the current session.
    async fn current_user(&self) -> MindgateResult<Option<UserIdentity>>;

    /// URLs stored for `user_id`, in stored order.
    async fn select_urls(&self, user_id: &str) -> MindgateResult<Vec<String>>;

    /// Insert one `(user_id, url)` row per URL.
    async fn insert_urls(&self, user_id: &str, urls: &[String]) -> MindgateResult<()>;
}

/// Backend used when no remote project is configured: nobody is ever
/// signed in, so reads fall back and publishes are no-ops.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineBackend;

#[async_trait]
impl BlockedSitesBackend for OfflineBackend {
    async fn current_user(&self) -> MindgateResult<Option<UserIdentity>> {
        Ok(None)
    }

    async fn select_urls(&self, _user_id: &str) -> MindgateResult<Vec<String>> {
        Ok(Vec::new())
    }

    async fn insert_urls(&self, _user_id: &str, _urls: &[String]) -> MindgateResult<()> {
        Ok(())
    }
}
