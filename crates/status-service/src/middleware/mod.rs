//! HTTP middleware for the Status Service.
//!
//! # Components
//!
//! - `auth` - bearer token verification (consuming and exempt)
//! - `http_metrics` - request metrics for every response

pub mod auth;
pub mod http_metrics;

pub use auth::{bearer_token, require_auth, require_auth_exempt, AuthState};
pub use http_metrics::http_metrics_middleware;
