//! Nav Cache - navigation cache and module preloading service
//!
//! Serves the navigation cache over HTTP for the fitness frontend.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nav_cache::{api::create_router, spawn_warmup_task, AppState, Config};

/// Main entry point for the navigation cache service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build cache, module registry and prefetch scheduler
/// 4. Start the delayed, tiered warm-up of page modules
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nav_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting navigation cache service");

    let config = Config::from_env();
    info!(
        "Configuration loaded: default_ttl={}ms, retry_attempts={}, prefetch_delay={}ms, port={}, assets={}",
        config.default_ttl_ms,
        config.retry_max_attempts,
        config.prefetch_delay_ms,
        config.server_port,
        config.asset_dir.display()
    );

    let state = AppState::from_config(&config).context("invalid configuration")?;
    info!(
        "Scheduler ready with {} adjacency entries",
        state.scheduler.adjacency().len()
    );

    let warmup_handle = spawn_warmup_task(
        state.scheduler.clone(),
        config.preload_tiers(),
        config.warmup_delay(),
    );

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(warmup_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the warm-up task if it is still running.
async fn shutdown_signal(warmup_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    if !warmup_handle.is_finished() {
        warmup_handle.abort();
        warn!("Warm-up task aborted");
    }
}
