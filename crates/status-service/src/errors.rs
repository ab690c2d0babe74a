//! Status Service error types.
//!
//! All errors map to an HTTP status code and a fixed client message via the
//! `IntoResponse` impl. Every error is logged once, when it is turned into a
//! response, and the body is always `{"error": "<message>"}`. Internal causes
//! (I/O failures, signing failures) are logged server-side and never sent to
//! the client.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use common::jwt::JwtValidationError;
use serde::Serialize;
use thiserror::Error;

/// Realm advertised in `WWW-Authenticate` on 401 responses.
const AUTH_REALM: &str = "Bearer realm=\"status-service\"";

/// Status Service error type.
///
/// Maps to HTTP status codes:
/// - MissingToken, TokenExpired: 401 Unauthorized
/// - TokenReused, InvalidToken: 403 Forbidden
/// - RefreshNotNeeded: 400 Bad Request
/// - ConfigurationLoad, Internal: 500 Internal Server Error
#[derive(Debug, Error)]
pub enum StatusError {
    #[error("Unauthorized: Missing token")]
    MissingToken,

    #[error("Unauthorized: Token expired")]
    TokenExpired,

    #[error("Forbidden: Token has already been used")]
    TokenReused,

    #[error("Forbidden: Invalid token")]
    InvalidToken,

    #[error("Token is still valid, no need for refresh")]
    RefreshNotNeeded,

    #[error("Configuration load failed: {0}")]
    ConfigurationLoad(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl StatusError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            StatusError::MissingToken | StatusError::TokenExpired => StatusCode::UNAUTHORIZED,
            StatusError::TokenReused | StatusError::InvalidToken => StatusCode::FORBIDDEN,
            StatusError::RefreshNotNeeded => StatusCode::BAD_REQUEST,
            StatusError::ConfigurationLoad(_) | StatusError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// The fixed message returned to clients.
    pub fn client_message(&self) -> &'static str {
        match self {
            StatusError::MissingToken => "Unauthorized: Missing token",
            StatusError::TokenExpired => "Unauthorized: Token expired",
            StatusError::TokenReused => "Forbidden: Token has already been used",
            StatusError::InvalidToken => "Forbidden: Invalid token",
            StatusError::RefreshNotNeeded => "Token is still valid, no need for refresh",
            StatusError::ConfigurationLoad(_) => "Internal Server Error",
            StatusError::Internal(_) => "Failed to generate token",
        }
    }

    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            StatusError::MissingToken => "missing_token",
            StatusError::TokenExpired => "token_expired",
            StatusError::TokenReused => "token_reused",
            StatusError::InvalidToken => "invalid_token",
            StatusError::RefreshNotNeeded => "refresh_not_needed",
            StatusError::ConfigurationLoad(_) => "configuration_load",
            StatusError::Internal(_) => "internal",
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse<'a> {
    error: &'a str,
}

/// Log `message` and build a `{"error": message}` response with `status`.
pub fn report(status: StatusCode, message: &str) -> Response {
    if status.is_server_error() {
        tracing::error!(target: "status.errors", status = status.as_u16(), "{}", message);
    } else {
        tracing::warn!(target: "status.errors", status = status.as_u16(), "{}", message);
    }

    respond(status, message)
}

fn respond(status: StatusCode, message: &str) -> Response {
    let mut response = (status, Json(ErrorResponse { error: message })).into_response();

    if status == StatusCode::UNAUTHORIZED {
        response.headers_mut().insert(
            header::WWW_AUTHENTICATE,
            HeaderValue::from_static(AUTH_REALM),
        );
    }

    response
}

impl IntoResponse for StatusError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.client_message();

        match &self {
            // Logged with its cause by the configuration cache
            StatusError::ConfigurationLoad(_) => respond(status, message),
            StatusError::Internal(cause) => {
                // Log the actual cause server-side, return the fixed message to the client
                tracing::error!(
                    target: "status.errors",
                    status = status.as_u16(),
                    cause = %cause,
                    "{}",
                    message
                );
                respond(status, message)
            }
            _ => report(status, message),
        }
    }
}

impl From<JwtValidationError> for StatusError {
    fn from(err: JwtValidationError) -> Self {
        match err {
            JwtValidationError::MissingToken => StatusError::MissingToken,
            JwtValidationError::TokenTooLarge => StatusError::InvalidToken,
            JwtValidationError::Expired => StatusError::TokenExpired,
        }
    }
}
