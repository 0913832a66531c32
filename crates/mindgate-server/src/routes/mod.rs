//! Route definitions for the HTTP surface.

mod blocked_sites;
mod health;
mod intentions;
mod lifecycle;
mod messages;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Background message contract
        .route("/messages", post(messages::dispatch_message))
        // Intentions
        .route(
            "/intentions",
            post(intentions::write_intention).get(intentions::list_intentions),
        )
        .route("/intentions/lookup", get(intentions::lookup_intention))
        .route("/intentions/debug", get(intentions::storage_debug))
        // Blocked sites
        .route(
            "/blocked-sites",
            get(blocked_sites::get_blocked_sites).post(blocked_sites::publish_blocked_sites),
        )
        .route("/blocked-sites/check", get(blocked_sites::check_blocked))
        // Lifecycle
        .route("/lifecycle/installed", post(lifecycle::installed))
        // Attach state
        .with_state(state)
}

pub use blocked_sites::*;
pub use health::*;
pub use intentions::*;
pub use lifecycle::*;
pub use messages::*;
