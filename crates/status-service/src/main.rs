//! Build Status Service
//!
//! Entry point. Serves the greeting, login/refresh/protected token routes,
//! and the token-protected build status report.

use common::clock::{Clock, SystemClock};
use status_service::auth::TokenService;
use status_service::config::Config;
use status_service::observability::metrics::init_metrics_recorder;
use status_service::routes::{self, AppState};
use status_service::services::{ConfigCache, FileMetadataSource, GitRevisionSource};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    let fmt_layer = if std::env::var("LOG_FORMAT").is_ok_and(|v| v == "json") {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "status_service=debug,common=debug,tower_http=debug".into()),
        )
        .with(fmt_layer)
        .init();

    info!("Starting Build Status Service");

    // Load configuration
    let config = Config::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!(
        bind_address = %config.bind_address,
        build_number = %config.build_number,
        metadata_path = %config.metadata_path.display(),
        config_cache_ttl_seconds = config.config_cache_ttl.as_secs(),
        token_lifetime_seconds = config.token_lifetime.as_secs(),
        "Configuration loaded successfully"
    );

    // Initialize Prometheus metrics recorder
    let metrics_handle = init_metrics_recorder().map_err(|e| {
        error!("Failed to initialize metrics recorder: {}", e);
        e
    })?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let token_service = TokenService::new(config.token_lifetime, clock.clone()).map_err(|e| {
        error!("Failed to initialize token service: {}", e);
        e
    })?;

    let config_cache = ConfigCache::new(
        Arc::new(FileMetadataSource::new(config.metadata_path.clone())),
        Arc::new(GitRevisionSource::new(config.repo_dir.clone())),
        clock,
        config.config_cache_ttl,
    );

    // Parse bind address before moving config
    let bind_address = config.bind_address.clone();
    let drain_period = config.drain_period;

    // Create application state
    let state = Arc::new(AppState {
        config,
        token_service: Arc::new(token_service),
        config_cache: Arc::new(config_cache),
    });

    // Build application routes
    let app = routes::build_routes(state, metrics_handle);

    // Parse bind address
    let addr: SocketAddr = bind_address.parse().map_err(|e| {
        error!("Invalid bind address: {}", e);
        e
    })?;

    info!("Build Status Service listening on {}", addr);

    // Start server with graceful shutdown support
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(drain_period))
        .await?;

    info!("Build Status Service shutdown complete");

    Ok(())
}

/// Listens for shutdown signals (SIGTERM, SIGINT).
/// Returns when a shutdown signal is received and the drain period is complete.
async fn shutdown_signal(drain_period: Duration) {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received SIGINT, starting graceful shutdown..."),
            Err(e) => error!("Failed to listen for SIGINT: {}", e),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received SIGTERM, starting graceful shutdown...");
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    if drain_period.is_zero() {
        info!("Skipping drain period (DRAIN_SECONDS=0)");
    } else {
        warn!("Draining connections for {} seconds...", drain_period.as_secs());
        tokio::time::sleep(drain_period).await;
        info!("Drain period complete");
    }
}
