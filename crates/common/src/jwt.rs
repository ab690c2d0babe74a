//! JWT utilities shared across Build Status services.
//!
//! This module provides common JWT handling utilities including:
//! - Size limits for DoS prevention
//! - Token lifetime constants
//! - Bearer token extraction from `Authorization` header values
//! - `exp` validation against an explicit clock reading
//!
//! # Security
//!
//! - Tokens are size-checked BEFORE parsing (DoS prevention)
//! - Expiry is compared against a caller-supplied `now`, so services can
//!   inject their own clock instead of relying on the JWT library's wall time
//!
//! # Usage
//!
//! ```rust,ignore
//! use common::jwt::{extract_bearer_token, check_token_size, validate_exp_at};
//!
//! let header = req.headers().get("authorization").and_then(|h| h.to_str().ok());
//! let token = extract_bearer_token(header)?;
//! check_token_size(token)?;
//! // ... verify signature ...
//! validate_exp_at(claims.exp, clock.now().timestamp())?;
//! ```

use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Constants
// =============================================================================

/// Maximum allowed JWT size in bytes (8KB).
///
/// JWTs larger than this size are rejected BEFORE any parsing or
/// cryptographic operations.
///
/// - Typical HS256 user token: ~200 bytes
/// - 8KB limit allows for reasonable expansion while preventing abuse
pub const MAX_JWT_SIZE_BYTES: usize = 8192; // 8KB

/// Default token lifetime (1 hour).
pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(3600);

/// Maximum configurable token lifetime (24 hours).
///
/// Prevents misconfiguration that would keep single-use tokens alive for
/// days.
pub const MAX_TOKEN_LIFETIME: Duration = Duration::from_secs(86_400);

/// Authorization scheme prefix for bearer tokens.
pub const BEARER_PREFIX: &str = "Bearer ";

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur while handling a JWT before or after signature
/// verification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JwtValidationError {
    /// No bearer token was presented.
    #[error("Missing bearer token")]
    MissingToken,

    /// Token size exceeds maximum allowed.
    #[error("Token exceeds maximum allowed size")]
    TokenTooLarge,

    /// Token `exp` claim is in the past.
    #[error("Token expired")]
    Expired,
}

// =============================================================================
// Functions
// =============================================================================

/// Extract the bearer token from an `Authorization` header value.
///
/// A missing header, a header without the `Bearer ` scheme, or an empty
/// token after the scheme are all treated as "no token presented".
///
/// # Errors
///
/// Returns `JwtValidationError::MissingToken` in every rejection case.
pub fn extract_bearer_token(header_value: Option<&str>) -> Result<&str, JwtValidationError> {
    let token = header_value
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .unwrap_or_default();

    if token.is_empty() {
        tracing::debug!(target: "common.jwt", "No bearer token in Authorization header");
        return Err(JwtValidationError::MissingToken);
    }

    Ok(token)
}

/// Reject tokens larger than [`MAX_JWT_SIZE_BYTES`].
///
/// # Errors
///
/// Returns `JwtValidationError::TokenTooLarge` if the token is oversized.
pub fn check_token_size(token: &str) -> Result<(), JwtValidationError> {
    if token.len() > MAX_JWT_SIZE_BYTES {
        tracing::debug!(
            target: "common.jwt",
            token_size = token.len(),
            max_size = MAX_JWT_SIZE_BYTES,
            "Token rejected: size exceeds maximum allowed"
        );
        return Err(JwtValidationError::TokenTooLarge);
    }

    Ok(())
}

/// Validate the `exp` claim against an explicit `now` (Unix epoch seconds).
///
/// A token is expired once `now` reaches `exp`; no leeway is applied.
///
/// # Errors
///
/// Returns `JwtValidationError::Expired` if `exp <= now`.
pub fn validate_exp_at(exp: i64, now: i64) -> Result<(), JwtValidationError> {
    if exp <= now {
        tracing::debug!(target: "common.jwt", exp = exp, now = now, "Token rejected: expired");
        return Err(JwtValidationError::Expired);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer_token_valid() {
        assert_eq!(extract_bearer_token(Some("Bearer abc.def.ghi")), Ok("abc.def.ghi"));
    }

    #[test]
    fn test_extract_bearer_token_missing_header() {
        assert_eq!(
            extract_bearer_token(None),
            Err(JwtValidationError::MissingToken)
        );
    }

    #[test]
    fn test_extract_bearer_token_wrong_scheme() {
        assert_eq!(
            extract_bearer_token(Some("Basic dXNlcjpwYXNz")),
            Err(JwtValidationError::MissingToken)
        );
        assert_eq!(
            extract_bearer_token(Some("bearer abc")),
            Err(JwtValidationError::MissingToken)
        );
    }

    #[test]
    fn test_extract_bearer_token_empty_token() {
        assert_eq!(
            extract_bearer_token(Some("Bearer ")),
            Err(JwtValidationError::MissingToken)
        );
        assert_eq!(
            extract_bearer_token(Some("Bearer    ")),
            Err(JwtValidationError::MissingToken)
        );
    }

    #[test]
    fn test_check_token_size_boundary() {
        let at_limit = "a".repeat(MAX_JWT_SIZE_BYTES);
        let over_limit = "a".repeat(MAX_JWT_SIZE_BYTES + 1);

        assert!(check_token_size(&at_limit).is_ok());
        assert_eq!(
            check_token_size(&over_limit),
            Err(JwtValidationError::TokenTooLarge)
        );
    }

    #[test]
    fn test_validate_exp_at_boundaries() {
        assert!(validate_exp_at(1001, 1000).is_ok());
        assert_eq!(validate_exp_at(1000, 1000), Err(JwtValidationError::Expired));
        assert_eq!(validate_exp_at(999, 1000), Err(JwtValidationError::Expired));
    }

    #[test]
    fn test_lifetime_constants() {
        assert_eq!(DEFAULT_TOKEN_LIFETIME.as_secs(), 3600);
        assert!(DEFAULT_TOKEN_LIFETIME <= MAX_TOKEN_LIFETIME);
    }
}
