//! Token handlers: login, refresh, and the exempt protected resource.

use crate::auth::{Claims, UserIdentity};
use crate::errors::StatusError;
use crate::middleware::bearer_token;
use crate::models::{ProtectedResponse, TokenResponse};
use crate::routes::AppState;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::{Extension, Json};
use std::sync::Arc;
use tracing::instrument;

/// Handler for POST /login
///
/// Issues a token for the placeholder identity. Any previously issued
/// token stops verifying.
///
/// ## Errors
///
/// - 500 "Failed to generate token" if signing fails
#[instrument(skip_all, name = "status.handlers.login")]
pub async fn login(State(state): State<Arc<AppState>>) -> Result<Json<TokenResponse>, StatusError> {
    let token = state
        .token_service
        .issue(&UserIdentity::placeholder())
        .await?;

    Ok(Json(TokenResponse { token }))
}

/// Handler for POST /refresh
///
/// Exchanges an expired token (signed with the current secret) for a new
/// one with the same identity.
///
/// ## Errors
///
/// - 401 if no bearer token is presented
/// - 403 if the token is invalid
/// - 400 if the token has not expired yet
#[instrument(skip_all, name = "status.handlers.refresh")]
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, StatusError> {
    let presented = bearer_token(&headers)?;

    let token = state.token_service.refresh(presented).await?;

    Ok(Json(TokenResponse { token }))
}

/// Handler for GET /protected
///
/// Echoes the verified claims. Runs behind the exempt auth middleware, so
/// the token stays usable.
#[instrument(skip_all, name = "status.handlers.protected")]
pub async fn protected(Extension(claims): Extension<Claims>) -> Json<ProtectedResponse> {
    Json(ProtectedResponse {
        message: "Access granted to protected resource".to_string(),
        user: claims,
    })
}
