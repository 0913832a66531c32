//! mindgate-client - Blocked-sites gateway for mindgate.
//!
//! This crate resolves the signed-in user against a remote backend and
//! reads or extends that user's list of blocked sites.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use mindgate_client::{BlockedSitesGateway, SupabaseBackend};
//!
//! let backend = SupabaseBackend::new("https://xyz.supabase.co", "anon-key")
//!     .with_access_token(session_token);
//! let gateway = BlockedSitesGateway::new(Arc::new(backend));
//!
//! // Falls back to a default list when nobody is signed in
//! let blocked = gateway.fetch_blocked_domains().await;
//! let stop = gateway.is_blocked("https://instagram.com/explore").await;
//! ```

mod backend;
mod gateway;
mod supabase;

pub use backend::{BlockedSitesBackend, OfflineBackend, UserIdentity};
pub use gateway::{blocked_match, BlockedSitesGateway};
pub use supabase::SupabaseBackend;
