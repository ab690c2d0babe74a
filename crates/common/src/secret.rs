//! Secret types for protecting sensitive values from accidental logging.
//!
//! This module re-exports types from the [`secrecy`] crate. Use these types
//! for signing keys and bearer tokens held server-side.
//!
//! `SecretBox<T>` and `SecretString` implement `Debug` with redaction, so any
//! struct that derives `Debug` while holding one gets safe logging behavior.
//! Secrets are zeroized when dropped, which matters for signing keys that are
//! rotated away on every token issuance.
//!
//! # Example
//!
//! ```rust
//! use common::secret::{ExposeSecret, SecretBox};
//!
//! #[derive(Debug)]
//! struct KeyHolder {
//!     key: SecretBox<Vec<u8>>,
//! }
//!
//! let holder = KeyHolder {
//!     key: SecretBox::new(Box::new(vec![7u8; 32])),
//! };
//!
//! // Debug output does not contain the key bytes
//! assert!(format!("{holder:?}").contains("REDACTED"));
//!
//! // Access requires an explicit call
//! assert_eq!(holder.key.expose_secret().len(), 32);
//! ```
//!
//! # Usage Guidelines
//!
//! Use `SecretString` for:
//! - Bearer tokens retained by the server (e.g., the last issued token)
//!
//! Use `SecretBox<Vec<u8>>` for:
//! - HMAC signing keys

pub use secrecy::{ExposeSecret, SecretBox, SecretString};
