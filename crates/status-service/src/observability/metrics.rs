//! Metrics definitions for the Status Service.
//!
//! All metrics follow Prometheus naming conventions:
//! - `status_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded:
//! - `method`: 7 values max (GET, POST, PATCH, DELETE, PUT, HEAD, OPTIONS)
//! - `endpoint`: the known routes plus `/other`
//! - `status`: 3 values (success, error, timeout)
//! - `outcome`: bounded by `StatusError` variants and cache outcomes

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Initialize the Prometheus recorder and return the handle used to serve
/// `/metrics`.
///
/// Must be called before any metrics are recorded.
///
/// # Errors
///
/// Returns error if the recorder fails to install (e.g., already installed).
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Prefix("status_http_request".to_string()),
            &[
                0.005, 0.010, 0.025, 0.050, 0.100, 0.150, 0.200, 0.300, 0.500, 1.000, 2.000,
            ],
        )
        .map_err(|e| format!("Failed to set HTTP request buckets: {e}"))?
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {e}"))
}

// ============================================================================
// HTTP Request Metrics
// ============================================================================

/// Record HTTP request completion
///
/// Metric: `status_http_requests_total`, `status_http_request_duration_seconds`
/// Labels: `method`, `endpoint`, `status`
///
/// Captures every response, including framework-level 404/405s.
pub fn record_http_request(method: &str, endpoint: &str, status_code: u16, duration: Duration) {
    let normalized_endpoint = normalize_endpoint(endpoint);
    let status = categorize_status_code(status_code);

    histogram!("status_http_request_duration_seconds",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint,
        "status" => status
    )
    .record(duration.as_secs_f64());

    counter!("status_http_requests_total",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint,
        "status_code" => status_code.to_string()
    )
    .increment(1);
}

/// Categorize HTTP status code into success/error/timeout
fn categorize_status_code(status_code: u16) -> &'static str {
    match status_code {
        200..=299 => "success",
        408 | 504 => "timeout",
        _ => "error",
    }
}

/// Map a request path to a bounded endpoint label.
fn normalize_endpoint(path: &str) -> &'static str {
    match path {
        "/" => "/",
        "/status" => "/status",
        "/login" => "/login",
        "/refresh" => "/refresh",
        "/protected" => "/protected",
        "/health" => "/health",
        "/metrics" => "/metrics",
        _ => "/other",
    }
}

// ============================================================================
// Token Metrics
// ============================================================================

/// Record a token issuance (login or refresh).
///
/// Metric: `status_tokens_issued_total`
pub fn record_token_issued() {
    counter!("status_tokens_issued_total").increment(1);
}

/// Record a token verification attempt.
///
/// Metric: `status_token_verifications_total`
/// Labels: `outcome` ("success" or a `StatusError::kind()` value)
pub fn record_token_verification(outcome: &'static str) {
    counter!("status_token_verifications_total", "outcome" => outcome).increment(1);
}

// ============================================================================
// Configuration Cache Metrics
// ============================================================================

/// Record a configuration cache read.
///
/// Metric: `status_config_loads_total`
/// Labels: `outcome` ("hit", "reload", "error")
pub fn record_config_load(outcome: &'static str) {
    counter!("status_config_loads_total", "outcome" => outcome).increment(1);
}
