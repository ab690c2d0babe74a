//! Application metadata.
//!
//! Metadata is a flat JSON object with required string fields `description`
//! and `version`. Any other top-level fields are kept but not reported.

use crate::services::SourceError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::instrument;

/// Parsed contents of the metadata file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppMetadata {
    pub description: String,
    pub version: String,

    /// Unused extra fields.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl AppMetadata {
    /// Parse metadata from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Parse` if the text is not a JSON object with
    /// string `description` and `version` fields.
    pub fn parse(text: &str) -> Result<Self, SourceError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Source of raw metadata text.
#[async_trait::async_trait]
pub trait MetadataSource: Send + Sync {
    /// Read the current metadata text.
    async fn read_metadata(&self) -> Result<String, SourceError>;
}

/// Reads metadata from a file on disk.
#[derive(Debug, Clone)]
pub struct FileMetadataSource {
    path: PathBuf,
}

impl FileMetadataSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl MetadataSource for FileMetadataSource {
    #[instrument(skip_all, name = "status.metadata.read")]
    async fn read_metadata(&self) -> Result<String, SourceError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| SourceError::Io {
                path: self.path.display().to_string(),
                source,
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_required_fields() {
        let metadata =
            AppMetadata::parse(r#"{"description": "build status", "version": "1.2"}"#).unwrap();

        assert_eq!(metadata.description, "build status");
        assert_eq!(metadata.version, "1.2");
        assert!(metadata.extra.is_empty());
    }

    #[test]
    fn test_parse_keeps_extra_fields() {
        let metadata = AppMetadata::parse(
            r#"{"description": "d", "version": "v", "owner": "platform", "tier": 2}"#,
        )
        .unwrap();

        assert_eq!(metadata.extra.len(), 2);
        assert_eq!(
            metadata.extra.get("owner"),
            Some(&serde_json::json!("platform"))
        );
    }

    #[test]
    fn test_parse_missing_version_fails() {
        let result = AppMetadata::parse(r#"{"description": "d"}"#);
        assert!(matches!(result, Err(SourceError::Parse(_))));
    }

    #[test]
    fn test_parse_non_string_version_fails() {
        let result = AppMetadata::parse(r#"{"description": "d", "version": 1}"#);
        assert!(matches!(result, Err(SourceError::Parse(_))));
    }

    #[test]
    fn test_parse_invalid_json_fails() {
        assert!(AppMetadata::parse("not json").is_err());
        assert!(AppMetadata::parse("[]").is_err());
    }

    #[tokio::test]
    async fn test_file_source_reads_file() {
        let path = std::env::temp_dir().join(format!(
            "status-service-metadata-{}.json",
            uuid::Uuid::new_v4()
        ));
        tokio::fs::write(&path, r#"{"description": "d", "version": "v"}"#)
            .await
            .unwrap();

        let text = FileMetadataSource::new(&path).read_metadata().await.unwrap();
        assert!(text.contains("\"version\""));

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_file_source_missing_file() {
        let source = FileMetadataSource::new("/nonexistent/status-service/metadata.json");

        let err = source.read_metadata().await.unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/status-service/metadata.json"));
    }
}
