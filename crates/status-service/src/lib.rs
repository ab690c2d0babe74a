//! Build Status Service Library
//!
//! A small HTTP service that reports build metadata and the current source
//! revision behind single-use bearer tokens.
//!
//! # Architecture
//!
//! ```text
//! routes/mod.rs -> middleware/auth.rs -> handlers/*.rs -> auth/token_service.rs
//!                                                      -> services/config_cache.rs
//! ```
//!
//! # Modules
//!
//! - `auth` - Signing secret rotation, token issue/verify/refresh, blacklist
//! - `config` - Service configuration from environment
//! - `errors` - Error types with HTTP status code mapping
//! - `handlers` - HTTP request handlers
//! - `middleware` - Bearer token and metrics middleware
//! - `models` - Response bodies
//! - `observability` - Prometheus metrics
//! - `routes` - Axum router setup
//! - `services` - Metadata/revision sources and the configuration cache

pub mod auth;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod routes;
pub mod services;
