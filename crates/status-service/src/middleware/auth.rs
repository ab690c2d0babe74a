//! Authentication middleware for protected routes.
//!
//! Extracts the Bearer token from the Authorization header, verifies it with
//! the token service, and injects the claims into request extensions.
//!
//! Two variants exist: `require_auth` consumes the token (single use) and
//! `require_auth_exempt` verifies without consuming it.

use crate::auth::{Claims, TokenService};
use crate::errors::StatusError;
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use common::jwt::extract_bearer_token;
use std::sync::Arc;
use tracing::instrument;

/// State for the authentication middleware.
#[derive(Clone)]
pub struct AuthState {
    pub token_service: Arc<TokenService>,
}

/// Read the bearer token from the Authorization header.
///
/// # Errors
///
/// Returns `StatusError::MissingToken` if the header is absent, not valid
/// UTF-8, lacks the `Bearer ` scheme, or carries an empty token.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, StatusError> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    extract_bearer_token(header).map_err(|e| {
        tracing::debug!(target: "status.middleware.auth", "Missing or malformed Authorization header");
        StatusError::from(e)
    })
}

/// Authentication middleware that consumes the presented token.
///
/// # Authorization Header Format
///
/// ```text
/// Authorization: Bearer <token>
/// ```
///
/// # Response
///
/// - 401 if the token is missing or expired
/// - 403 if the token is invalid or was already used
/// - Otherwise continues with `Claims` in request extensions
#[instrument(skip_all, name = "status.middleware.auth")]
pub async fn require_auth(
    State(state): State<Arc<AuthState>>,
    req: Request,
    next: Next,
) -> Result<impl IntoResponse, StatusError> {
    authenticate(&state, req, next, false).await
}

/// Authentication middleware that leaves the token reusable.
#[instrument(skip_all, name = "status.middleware.auth_exempt")]
pub async fn require_auth_exempt(
    State(state): State<Arc<AuthState>>,
    req: Request,
    next: Next,
) -> Result<impl IntoResponse, StatusError> {
    authenticate(&state, req, next, true).await
}

async fn authenticate(
    state: &AuthState,
    mut req: Request,
    next: Next,
    exempt: bool,
) -> Result<Response, StatusError> {
    // Owned copy so no borrow of the request is held across the await
    let token = bearer_token(req.headers())?.to_string();
    let claims: Claims = state.token_service.verify(&token, exempt).await?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
