//! mindgate-server - Background service host for mindgate.
//!
//! Runs the intention store, its sweep schedule and the blocked-sites
//! gateway in one process, and exposes them to the extension over HTTP.
//!
//! # Example
//!
//! ```ignore
//! use mindgate_server::{create_server, AppState};
//!
//! #[tokio::main]
//! async fn main() {
//!     let state = AppState::new_with_runtime(runtime, gateway, ui);
//!     let app = create_server(state);
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8787").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```

pub mod error;
pub mod factory;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod ui;

pub use error::{ApiError, ApiResult};
pub use factory::create_gateway;
pub use state::AppState;
pub use ui::{HeadlessUi, UiEvent};

use axum::{middleware as axum_middleware, Router};
use tower_http::trace::TraceLayer;

/// Create the server with all routes and middleware.
pub fn create_server(state: AppState) -> Router {
    routes::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors_layer())
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
}
