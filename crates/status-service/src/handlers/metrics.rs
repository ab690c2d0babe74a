//! Prometheus metrics endpoint handler.
//!
//! `/metrics` is unauthenticated so Prometheus can scrape it. Labels carry
//! no tokens or usernames.

use axum::{extract::State, response::IntoResponse};
use metrics_exporter_prometheus::PrometheusHandle;

/// Handler for GET /metrics
///
/// ```text
/// # TYPE status_http_requests_total counter
/// status_http_requests_total{method="GET",endpoint="/status",status_code="200"} 42
/// ```
#[tracing::instrument(skip_all, name = "status.metrics.scrape")]
pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    handle.render()
}
