//! Hypercache - A lightweight in-memory cache server
//!
//! Layers per-key TTL expiration over an admission-controlled, cost-bounded
//! concurrent store, with a background reaper and an HTTP API.

mod api;
mod cache;
mod config;
mod error;
mod metrics;
mod models;

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{create_router, AppState};
use config::Config;

/// Main entry point for the Hypercache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cache (validated sizing, store, reaper task)
/// 4. Create Axum router with all endpoints
/// 5. Start HTTP server on configured port
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hypercache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("starting Hypercache server");

    // Load configuration from environment variables
    let config = Config::from_env();
    info!(
        "configuration loaded: max_cost={}, num_counters={}, buffer_items={}, reap_interval={:?}, port={}",
        config.cache.max_cost,
        config.cache.num_counters,
        config.cache.buffer_items,
        config.cache.reap_interval,
        config.server_port
    );

    // Create application state; fails fast on invalid sizing parameters
    let state = AppState::from_config(&config).context("failed to create cache")?;
    info!("cache initialized, reaper running");

    // Create router with all endpoints
    let app = create_router(state.clone());

    // Bind to configured port
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("server listening on http://{}", addr);

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    // Stop the reaper and wait for it to observe the signal
    state.cache.close().await;
    info!("server shutdown complete");

    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("received SIGTERM, initiating shutdown...");
        }
    }
}
