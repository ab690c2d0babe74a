//! Status Service models.
//!
//! Response bodies returned by the HTTP handlers.

use crate::auth::Claims;
use serde::{Deserialize, Serialize};

/// Simple `{"message": ...}` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Body returned by `/login` and `/refresh`.
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Body returned by `/protected`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtectedResponse {
    pub message: String,

    /// Claims of the presented token.
    pub user: Claims,
}

/// One application entry of the status report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationStatus {
    pub description: String,

    /// `"{metadata version}-{build number}"`.
    pub version: String,

    /// Current source revision.
    pub sha: String,
}

/// Body returned by `/status`.
///
/// ```json
/// {"my-application": [{"description": "...", "version": "1.0-42", "sha": "abc123"}]}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(rename = "my-application")]
    pub applications: Vec<ApplicationStatus>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_response_shape() {
        let response = StatusResponse {
            applications: vec![ApplicationStatus {
                description: "build status".to_string(),
                version: "1.0-42".to_string(),
                sha: "abc123".to_string(),
            }],
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "my-application": [
                    {"description": "build status", "version": "1.0-42", "sha": "abc123"}
                ]
            })
        );
    }

    #[test]
    fn test_token_response_debug_redacts_token() {
        let response = TokenResponse {
            token: "eyJhbGciOiJIUzI1NiJ9.e30.sig".to_string(),
        };

        let debug_str = format!("{response:?}");
        assert!(debug_str.contains("[REDACTED]"));
        assert!(!debug_str.contains("eyJhbGci"));
    }
}
