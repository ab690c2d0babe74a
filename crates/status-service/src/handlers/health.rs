//! Liveness handler.

/// Handler for GET /health
///
/// Returns "OK" while the process is serving requests. Checks no
/// dependencies; an unreadable metadata file does not make the service dead.
#[tracing::instrument(skip_all, name = "status.health.liveness")]
pub async fn health_check() -> &'static str {
    "OK"
}
