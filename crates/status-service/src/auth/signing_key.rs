//! HMAC signing secret.
//!
//! A `SigningSecret` is 64 bytes from the system CSPRNG. The token service
//! holds exactly one at a time and swaps in a fresh one on every issuance,
//! so replacing the secret invalidates every token signed with the old one.

use crate::errors::StatusError;
use common::secret::{ExposeSecret, SecretBox};
use jsonwebtoken::{DecodingKey, EncodingKey};
use ring::rand::{SecureRandom, SystemRandom};
use std::fmt;

/// Length of a generated signing secret in bytes.
pub const SIGNING_SECRET_LEN: usize = 64;

/// Symmetric key used to sign and verify HS256 tokens.
///
/// The bytes are zeroized on drop and never appear in `Debug` output.
pub struct SigningSecret {
    bytes: SecretBox<Vec<u8>>,
}

impl SigningSecret {
    /// Encoding key for signing with this secret.
    pub fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(self.bytes.expose_secret())
    }

    /// Decoding key for verifying with this secret.
    pub fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(self.bytes.expose_secret())
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.bytes.expose_secret().len()
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningSecret")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Generate a fresh signing secret from the system CSPRNG.
///
/// # Errors
///
/// Returns `StatusError::Internal` if the RNG fails.
pub fn generate_signing_secret() -> Result<SigningSecret, StatusError> {
    let rng = SystemRandom::new();
    let mut bytes = vec![0u8; SIGNING_SECRET_LEN];
    rng.fill(&mut bytes).map_err(|e| {
        StatusError::Internal(format!("Signing secret generation failed: {e}"))
    })?;

    Ok(SigningSecret {
        bytes: SecretBox::new(Box::new(bytes)),
    })
}
