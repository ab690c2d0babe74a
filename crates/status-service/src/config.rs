//! Status Service configuration.
//!
//! Configuration is loaded from environment variables. Every variable has a
//! default, so an empty environment yields a runnable service.

use crate::services::config_cache::DEFAULT_CACHE_TTL;
use common::jwt::{DEFAULT_TOKEN_LIFETIME, MAX_TOKEN_LIFETIME};
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Default listen port when neither `BIND_ADDRESS` nor `PORT` is set.
pub const DEFAULT_PORT: u16 = 3000;

/// Default build number reported in the status version string.
pub const DEFAULT_BUILD_NUMBER: &str = "0";

/// Default location of the metadata file.
pub const DEFAULT_METADATA_PATH: &str = "./metadata.json";

/// Status Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (default: "0.0.0.0:{PORT}").
    pub bind_address: String,

    /// Build number appended to the metadata version. Never validated.
    pub build_number: String,

    /// Path to the metadata JSON file.
    pub metadata_path: PathBuf,

    /// Repository to query for the current revision (default: working directory).
    pub repo_dir: Option<PathBuf>,

    /// Configuration cache window.
    pub config_cache_ttl: Duration,

    /// Validity window of issued tokens.
    pub token_lifetime: Duration,

    /// Drain period on shutdown.
    pub drain_period: Duration,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid port configuration: {0}")]
    InvalidPort(String),

    #[error("Invalid config cache TTL configuration: {0}")]
    InvalidCacheTtl(String),

    #[error("Invalid token lifetime configuration: {0}")]
    InvalidTokenLifetime(String),

    #[error("Invalid drain period configuration: {0}")]
    InvalidDrainPeriod(String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let bind_address = match vars.get("BIND_ADDRESS") {
            Some(address) => address.clone(),
            None => {
                let port = match vars.get("PORT") {
                    Some(value_str) => value_str.parse::<u16>().map_err(|e| {
                        ConfigError::InvalidPort(format!(
                            "PORT must be a valid port number, got '{value_str}': {e}"
                        ))
                    })?,
                    None => DEFAULT_PORT,
                };
                format!("0.0.0.0:{port}")
            }
        };

        let build_number = vars
            .get("BUILD_NUMBER")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BUILD_NUMBER.to_string());

        let metadata_path = vars
            .get("METADATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_METADATA_PATH));

        let repo_dir = vars.get("REPO_DIR").map(PathBuf::from);

        // Parse cache window with validation
        let config_cache_ttl = if let Some(value_str) = vars.get("CONFIG_CACHE_TTL_SECONDS") {
            let value: u64 = value_str.parse().map_err(|e| {
                ConfigError::InvalidCacheTtl(format!(
                    "CONFIG_CACHE_TTL_SECONDS must be a valid positive integer, got '{value_str}': {e}"
                ))
            })?;

            if value == 0 {
                return Err(ConfigError::InvalidCacheTtl(
                    "CONFIG_CACHE_TTL_SECONDS must be greater than 0".to_string(),
                ));
            }

            Duration::from_secs(value)
        } else {
            DEFAULT_CACHE_TTL
        };

        // Parse token lifetime with validation
        let token_lifetime = if let Some(value_str) = vars.get("TOKEN_LIFETIME_SECONDS") {
            let value: u64 = value_str.parse().map_err(|e| {
                ConfigError::InvalidTokenLifetime(format!(
                    "TOKEN_LIFETIME_SECONDS must be a valid positive integer, got '{value_str}': {e}"
                ))
            })?;

            if value == 0 {
                return Err(ConfigError::InvalidTokenLifetime(
                    "TOKEN_LIFETIME_SECONDS must be greater than 0".to_string(),
                ));
            }

            if value > MAX_TOKEN_LIFETIME.as_secs() {
                return Err(ConfigError::InvalidTokenLifetime(format!(
                    "TOKEN_LIFETIME_SECONDS must not exceed {} seconds, got {}",
                    MAX_TOKEN_LIFETIME.as_secs(),
                    value
                )));
            }

            Duration::from_secs(value)
        } else {
            DEFAULT_TOKEN_LIFETIME
        };

        let drain_period = match vars.get("DRAIN_SECONDS") {
            Some(value_str) => Duration::from_secs(value_str.parse().map_err(|e| {
                ConfigError::InvalidDrainPeriod(format!(
                    "DRAIN_SECONDS must be a valid non-negative integer, got '{value_str}': {e}"
                ))
            })?),
            None => Duration::ZERO,
        };

        Ok(Config {
            bind_address,
            build_number,
            metadata_path,
            repo_dir,
            config_cache_ttl,
            token_lifetime,
            drain_period,
        })
    }
}
