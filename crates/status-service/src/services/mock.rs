//! In-memory metadata and revision sources for tests.
//!
//! Each mock counts its calls so tests can assert how often the
//! configuration cache actually reached its sources.

use crate::services::metadata::MetadataSource;
use crate::services::revision::RevisionSource;
use crate::services::SourceError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Mock metadata source.
///
/// Returns the configured text, or an error when the text is `None`.
#[derive(Debug)]
pub struct MockMetadataSource {
    content: Mutex<Option<String>>,
    call_count: AtomicUsize,
}

impl MockMetadataSource {
    /// Create a mock that returns `content`.
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            content: Mutex::new(Some(content.into())),
            call_count: AtomicUsize::new(0),
        }
    }

    /// Create a mock that returns `{"description": .., "version": ..}`.
    pub fn with_fields(description: &str, version: &str) -> Self {
        Self::with_content(
            serde_json::json!({ "description": description, "version": version }).to_string(),
        )
    }

    /// Create a mock whose reads always fail.
    pub fn failing() -> Self {
        Self {
            content: Mutex::new(None),
            call_count: AtomicUsize::new(0),
        }
    }

    /// Replace the returned text. `None` makes subsequent reads fail.
    pub fn set_content(&self, content: Option<String>) {
        if let Ok(mut guard) = self.content.lock() {
            *guard = content;
        }
    }

    /// Get the number of reads made.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl MetadataSource for MockMetadataSource {
    async fn read_metadata(&self) -> Result<String, SourceError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        self.content
            .lock()
            .ok()
            .and_then(|guard| guard.clone())
            .ok_or_else(|| SourceError::Unavailable("mock metadata unavailable".to_string()))
    }
}

/// Mock revision source.
#[derive(Debug)]
pub struct MockRevisionSource {
    revision: Mutex<Option<String>>,
    call_count: AtomicUsize,
}

impl MockRevisionSource {
    /// Create a mock that returns `revision`.
    pub fn with_revision(revision: impl Into<String>) -> Self {
        Self {
            revision: Mutex::new(Some(revision.into())),
            call_count: AtomicUsize::new(0),
        }
    }

    /// Create a mock whose lookups always fail.
    pub fn failing() -> Self {
        Self {
            revision: Mutex::new(None),
            call_count: AtomicUsize::new(0),
        }
    }

    /// Replace the returned revision. `None` makes subsequent lookups fail.
    pub fn set_revision(&self, revision: Option<String>) {
        if let Ok(mut guard) = self.revision.lock() {
            *guard = revision;
        }
    }

    /// Get the number of lookups made.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl RevisionSource for MockRevisionSource {
    async fn current_revision(&self) -> Result<String, SourceError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        self.revision
            .lock()
            .ok()
            .and_then(|guard| guard.clone())
            .ok_or_else(|| SourceError::Command("mock revision unavailable".to_string()))
    }
}
