//! Token claims and the identity they carry.
//!
//! The `username` field is redacted in Debug output to keep it out of logs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity asserted by a token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: i64,
    pub username: String,
}

impl UserIdentity {
    /// The fixed identity handed out by `/login`.
    ///
    /// There is no user store; every login is this user.
    pub fn placeholder() -> Self {
        Self {
            id: 1,
            username: "exampleuser".to_string(),
        }
    }
}

impl fmt::Debug for UserIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserIdentity")
            .field("id", &self.id)
            .field("username", &"[REDACTED]")
            .finish()
    }
}

/// Claims of a verified token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: i64,

    pub username: String,

    /// Issued-at timestamp (Unix epoch seconds).
    pub iat: i64,

    /// Expiration timestamp (Unix epoch seconds).
    pub exp: i64,
}

impl Claims {
    /// Build claims for `identity`, valid from `iat` until `exp`.
    pub fn new(identity: &UserIdentity, iat: i64, exp: i64) -> Self {
        Self {
            id: identity.id,
            username: identity.username.clone(),
            iat,
            exp,
        }
    }

    pub fn identity(&self) -> UserIdentity {
        UserIdentity {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

impl fmt::Debug for Claims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Claims")
            .field("id", &self.id)
            .field("username", &"[REDACTED]")
            .field("iat", &self.iat)
            .field("exp", &self.exp)
            .finish()
    }
}

/// Claims as read by refresh, where every field may be absent.
///
/// Refresh accepts tokens past their expiry, so it decodes leniently and
/// checks the identity fields itself.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct LenientClaims {
    #[serde(default)]
    pub id: Option<i64>,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub exp: Option<i64>,
}

impl LenientClaims {
    /// The carried identity, if both fields are present.
    pub fn identity(&self) -> Option<UserIdentity> {
        match (self.id, self.username.as_ref()) {
            (Some(id), Some(username)) => Some(UserIdentity {
                id,
                username: username.clone(),
            }),
            _ => None,
        }
    }
}
