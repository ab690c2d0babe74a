//! Token issuance, verification and rotation.
//!
//! # Protocol
//!
//! - Every issuance generates a fresh signing secret and replaces the old
//!   one, so only the most recently issued token can verify.
//! - A token verified on a consuming route is blacklisted; any later
//!   presentation fails with `TokenReused`, even on an exempt route.
//! - Expiry is checked against the injected [`Clock`], not the JWT
//!   library's wall clock.
//! - Refresh only re-issues tokens that have already expired.
//!
//! # Locking
//!
//! `keys` guards the current secret and the last issued token. `issue`
//! holds its write lock across generate, sign and swap so no token is ever
//! signed with a secret that is not (or will not immediately be) current.
//! `verify` holds the read lock only while decoding. The blacklist has its
//! own lock and is never held together with `keys`.

use crate::auth::blacklist::TokenBlacklist;
use crate::auth::claims::{Claims, LenientClaims, UserIdentity};
use crate::auth::signing_key::{generate_signing_secret, SigningSecret};
use crate::errors::StatusError;
use crate::observability::metrics::{record_token_issued, record_token_verification};
use common::clock::Clock;
use common::jwt::{check_token_size, validate_exp_at};
use common::secret::{ExposeSecret, SecretString};
use jsonwebtoken::{decode, encode, Algorithm, Header, Validation};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::instrument;

/// Current signing secret and the last token signed with it.
struct KeyState {
    secret: SigningSecret,
    last_issued: Option<SecretString>,
}

/// Issues, verifies and rotates single-use HS256 tokens.
pub struct TokenService {
    keys: RwLock<KeyState>,
    blacklist: TokenBlacklist,
    lifetime: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    /// Create a token service with a freshly generated secret.
    ///
    /// # Errors
    ///
    /// Returns `StatusError::Internal` if the secret cannot be generated.
    pub fn new(lifetime: Duration, clock: Arc<dyn Clock>) -> Result<Self, StatusError> {
        Ok(Self {
            keys: RwLock::new(KeyState {
                secret: generate_signing_secret()?,
                last_issued: None,
            }),
            blacklist: TokenBlacklist::new(),
            lifetime,
            clock,
        })
    }

    /// Issue a token for `identity`, rotating the signing secret.
    ///
    /// All previously issued tokens stop verifying once this returns.
    ///
    /// # Errors
    ///
    /// Returns `StatusError::Internal` if secret generation or signing fails.
    /// The current secret is left in place on failure.
    #[instrument(skip_all, name = "status.token.issue")]
    pub async fn issue(&self, identity: &UserIdentity) -> Result<String, StatusError> {
        let mut keys = self.keys.write().await;

        let secret = generate_signing_secret()?;
        let iat = self.clock.now().timestamp();
        let lifetime_secs = i64::try_from(self.lifetime.as_secs()).unwrap_or(i64::MAX);
        let claims = Claims::new(identity, iat, iat.saturating_add(lifetime_secs));

        let token = encode(&Header::new(Algorithm::HS256), &claims, &secret.encoding_key())
            .map_err(|e| StatusError::Internal(format!("Token signing failed: {e}")))?;

        keys.secret = secret;
        keys.last_issued = Some(SecretString::from(token.clone()));
        drop(keys);

        record_token_issued();
        tracing::debug!(
            target: "status.auth.token",
            user_id = identity.id,
            exp = claims.exp,
            "Issued token and rotated signing secret"
        );

        Ok(token)
    }

    /// Verify `token` and return its claims.
    ///
    /// Unless `exempt` is set, a successful verification consumes the token.
    ///
    /// # Errors
    ///
    /// - `MissingToken` - token is empty
    /// - `InvalidToken` - oversized, malformed, or not signed with the current secret
    /// - `TokenReused` - already consumed
    /// - `TokenExpired` - `exp` is not in the future
    #[instrument(skip_all, name = "status.token.verify", fields(exempt = exempt))]
    pub async fn verify(&self, token: &str, exempt: bool) -> Result<Claims, StatusError> {
        let result = self.verify_inner(token, exempt).await;

        let outcome = match &result {
            Ok(_) => "success",
            Err(e) => e.kind(),
        };
        record_token_verification(outcome);

        result
    }

    async fn verify_inner(&self, token: &str, exempt: bool) -> Result<Claims, StatusError> {
        if token.is_empty() {
            return Err(StatusError::MissingToken);
        }

        check_token_size(token)?;

        // Consumed tokens are rejected before any signature work
        if self.blacklist.contains(token).await {
            tracing::debug!(target: "status.auth.token", "Token rejected: already consumed");
            return Err(StatusError::TokenReused);
        }

        let claims = {
            let keys = self.keys.read().await;
            decode::<Claims>(token, &keys.secret.decoding_key(), &strict_validation())
                .map_err(|e| {
                    tracing::debug!(target: "status.auth.token", error = %e, "Token verification failed");
                    StatusError::InvalidToken
                })?
                .claims
        };

        validate_exp_at(claims.exp, self.clock.now().timestamp())?;

        if !exempt {
            if !self.blacklist.insert(token).await {
                tracing::debug!(
                    target: "status.auth.token",
                    "Token rejected: consumed by a concurrent request"
                );
                return Err(StatusError::TokenReused);
            }

            let mut keys = self.keys.write().await;
            if keys
                .last_issued
                .as_ref()
                .is_some_and(|last| last.expose_secret() == token)
            {
                keys.last_issued = None;
            }
        }

        Ok(claims)
    }

    /// Exchange an expired token for a new one carrying the same identity.
    ///
    /// The token must still be signed with the current secret. The
    /// blacklist is neither consulted nor modified.
    ///
    /// # Errors
    ///
    /// - `MissingToken` - token is empty
    /// - `InvalidToken` - bad signature, undecodable claims, or no identity
    /// - `RefreshNotNeeded` - token has not expired yet
    /// - `Internal` - issuing the replacement failed
    #[instrument(skip_all, name = "status.token.refresh")]
    pub async fn refresh(&self, token: &str) -> Result<String, StatusError> {
        if token.is_empty() {
            return Err(StatusError::MissingToken);
        }

        check_token_size(token)?;

        let claims = {
            let keys = self.keys.read().await;
            decode::<LenientClaims>(token, &keys.secret.decoding_key(), &lenient_validation())
                .map_err(|e| {
                    tracing::debug!(target: "status.auth.token", error = %e, "Refresh token rejected");
                    StatusError::InvalidToken
                })?
                .claims
        };

        let identity = claims.identity().ok_or_else(|| {
            tracing::debug!(target: "status.auth.token", "Refresh token carries no identity");
            StatusError::InvalidToken
        })?;
        let exp = claims.exp.ok_or(StatusError::InvalidToken)?;

        if validate_exp_at(exp, self.clock.now().timestamp()).is_ok() {
            return Err(StatusError::RefreshNotNeeded);
        }

        self.issue(&identity).await
    }

    /// The last issued token, if it has not been consumed yet.
    pub async fn last_issued(&self) -> Option<String> {
        self.keys
            .read()
            .await
            .last_issued
            .as_ref()
            .map(|token| token.expose_secret().to_string())
    }

    /// Number of consumed tokens.
    pub async fn blacklist_len(&self) -> usize {
        self.blacklist.len().await
    }
}

/// Signature and structure only; `exp` must be present but is compared
/// against the service clock afterwards.
fn strict_validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.leeway = 0;
    validation
}

/// Signature only; no claim is required.
fn lenient_validation() -> Validation {
    let mut validation = strict_validation();
    validation.required_spec_claims.clear();
    validation
}
