//! HTTP routes for the Status Service.
//!
//! Defines the Axum router and application state.

use crate::auth::TokenService;
use crate::config::Config;
use crate::handlers;
use crate::middleware::{http_metrics_middleware, require_auth, require_auth_exempt, AuthState};
use crate::services::ConfigCache;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

pub use crate::observability::metrics::init_metrics_recorder;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration.
    pub config: Config,

    /// Token issuance and verification.
    pub token_service: Arc<TokenService>,

    /// Metadata and revision cache backing `/status`.
    pub config_cache: Arc<ConfigCache>,
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `/` - Greeting - public
/// - `/login` - Issue a token - public
/// - `/refresh` - Exchange an expired token - public (reads its own header)
/// - `/health` - Liveness probe - public
/// - `/metrics` - Prometheus metrics - public
/// - `/status` - Build status - token consumed
/// - `/protected` - Claims echo - token verified but not consumed
/// - TraceLayer for request logging
/// - 30 second request timeout
/// - HTTP metrics middleware
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let auth_state = Arc::new(AuthState {
        token_service: state.token_service.clone(),
    });

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/", get(handlers::greeting))
        .route("/health", get(handlers::health_check))
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
        .with_state(state.clone());

    // Metrics route with its own state
    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    // Single-use routes (token consumed on success)
    let consuming_routes = Router::new()
        .route("/status", get(handlers::get_status))
        .route_layer(middleware::from_fn_with_state(
            auth_state.clone(),
            require_auth,
        ))
        .with_state(state);

    // Exempt routes (token verified, never consumed)
    let exempt_routes = Router::new()
        .route("/protected", get(handlers::protected))
        .route_layer(middleware::from_fn_with_state(
            auth_state,
            require_auth_exempt,
        ));

    // Merge routes and apply global middleware layers
    // Each `.layer` wraps everything added before it:
    // 1. TraceLayer - Log request details (innermost)
    // 2. TimeoutLayer - Timeout the traced request
    // 3. http_metrics_middleware - Record ALL responses, timeouts included (outermost)
    public_routes
        .merge(metrics_routes)
        .merge(consuming_routes)
        .merge(exempt_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(middleware::from_fn(http_metrics_middleware))
}
