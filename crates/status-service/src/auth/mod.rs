//! Token authentication for the Status Service.
//!
//! # Components
//!
//! - `signing_key` - rotating HMAC secret
//! - `blacklist` - consumed-token set
//! - `claims` - token claims and identity
//! - `token_service` - issue/verify/refresh protocol

pub mod blacklist;
pub mod claims;
pub mod signing_key;
pub mod token_service;

pub use claims::{Claims, UserIdentity};
pub use token_service::TokenService;
