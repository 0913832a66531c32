//! mindgate-server - background service binary.
//!
//! Configuration is read from the file named by `MINDGATE_CONFIG` (TOML,
//! JSON or YAML) when set, then overridden by environment variables.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use mindgate_core::{BackgroundRuntime, MindgateConfig};
use mindgate_server::{create_gateway, create_server, AppState, HeadlessUi};
use tokio::signal;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

fn load_config() -> Result<MindgateConfig> {
    let config = match std::env::var("MINDGATE_CONFIG") {
        Ok(path) => MindgateConfig::from_file(&path)
            .with_context(|| format!("failed to load config from {}", path))?,
        Err(_) => MindgateConfig::default(),
    };
    Ok(config.merge_env())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive(Level::INFO.into())
                .add_directive("mindgate_server=debug".parse()?),
        )
        .init();

    let config = load_config()?;

    let runtime = BackgroundRuntime::new(&config)
        .await
        .context("failed to create background runtime")?;
    runtime.start().await?;
    info!(
        ttl_secs = config.intentions.ttl_secs,
        sweep_interval_secs = config.intentions.sweep_interval_secs,
        "Intention runtime started"
    );

    let gateway = create_gateway(&config.backend)?;
    let state = AppState::new_with_runtime(runtime, gateway, Arc::new(HeadlessUi::new()));
    let app = create_server(state.clone());

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Starting mindgate-server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            info!("Shutdown signal received, stopping sweeps...");
        })
        .await?;

    if let Some(mut runtime) = state.take_runtime().await {
        runtime.shutdown().await?;
    }

    info!("Server stopped cleanly");
    Ok(())
}
