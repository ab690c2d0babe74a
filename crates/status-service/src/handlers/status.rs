//! Build status handler.
//!
//! Reports the application description, the metadata version suffixed with
//! the build number, and the current source revision.

use crate::errors::StatusError;
use crate::models::{ApplicationStatus, StatusResponse};
use crate::routes::AppState;
use crate::services::ConfigSnapshot;
use axum::extract::State;
use axum::Json;
use std::sync::Arc;
use tracing::instrument;

/// Handler for GET /status
///
/// Requires a bearer token, which is consumed by the auth middleware.
///
/// ## Response
///
/// ```json
/// {"my-application": [{"description": "build status", "version": "1.0-42", "sha": "abc123"}]}
/// ```
///
/// ## Errors
///
/// - 500 if the configuration cannot be loaded
#[instrument(skip_all, name = "status.handlers.status")]
pub async fn get_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, StatusError> {
    let snapshot = state.config_cache.load().await?;

    Ok(Json(build_status(snapshot, &state.config.build_number)))
}

fn build_status(snapshot: ConfigSnapshot, build_number: &str) -> StatusResponse {
    StatusResponse {
        applications: vec![ApplicationStatus {
            description: snapshot.metadata.description,
            version: format!("{}-{}", snapshot.metadata.version, build_number),
            sha: snapshot.revision_id,
        }],
    }
}
