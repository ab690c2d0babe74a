//! Common utilities and types shared across Build Status components.

#![warn(clippy::pedantic)]

/// Module for wall-clock abstraction (injectable for deterministic tests)
pub mod clock;

/// Module for secret types that prevent accidental logging
pub mod secret;

/// Module for JWT utilities (constants, bearer extraction, size checks)
pub mod jwt;
