//! Service layer for the Status Service.
//!
//! # Components
//!
//! - `metadata` - application metadata source (`metadata.json`)
//! - `revision` - source-control revision lookup (`git rev-parse HEAD`)
//! - `config_cache` - time-windowed cache over both sources
//! - `mock` - in-memory sources for tests

pub mod config_cache;
pub mod metadata;
pub mod mock;
pub mod revision;

use thiserror::Error;

pub use config_cache::{ConfigCache, ConfigSnapshot};
pub use metadata::{AppMetadata, FileMetadataSource, MetadataSource};
pub use revision::{GitRevisionSource, RevisionSource};

/// Failure reading one of the configuration sources.
///
/// Carried into `StatusError::ConfigurationLoad` as a string; never shown to
/// clients.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid metadata: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("revision command failed: {0}")]
    Command(String),

    #[error("{0}")]
    Unavailable(String),
}
