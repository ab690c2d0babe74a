//! Time-windowed cache of application metadata and source revision.
//!
//! The cache is either cold or holds a complete snapshot together with the
//! time it was loaded. Reads inside the window never touch the sources. A
//! read past the window reloads both sources under the write lock; if either
//! fails, the previous snapshot is kept and the error is returned.

use crate::errors::StatusError;
use crate::observability::metrics::record_config_load;
use crate::services::metadata::{AppMetadata, MetadataSource};
use crate::services::revision::RevisionSource;
use chrono::{DateTime, Utc};
use common::clock::Clock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::instrument;

/// Default cache window (5 minutes).
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Configuration served to the status route.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigSnapshot {
    pub metadata: AppMetadata,
    pub revision_id: String,
}

/// Cached snapshot with its load time.
struct CachedConfig {
    snapshot: ConfigSnapshot,
    last_updated: DateTime<Utc>,
}

/// Configuration cache over a metadata source and a revision source.
pub struct ConfigCache {
    metadata_source: Arc<dyn MetadataSource>,
    revision_source: Arc<dyn RevisionSource>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    state: RwLock<Option<CachedConfig>>,
}

impl ConfigCache {
    pub fn new(
        metadata_source: Arc<dyn MetadataSource>,
        revision_source: Arc<dyn RevisionSource>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
    ) -> Self {
        Self {
            metadata_source,
            revision_source,
            clock,
            ttl,
            state: RwLock::new(None),
        }
    }

    /// Return the current configuration, reloading if the window has passed.
    ///
    /// # Errors
    ///
    /// Returns `StatusError::ConfigurationLoad` if a reload was needed and
    /// either source failed. The cached snapshot is left unchanged.
    #[instrument(skip_all, name = "status.config.load")]
    pub async fn load(&self) -> Result<ConfigSnapshot, StatusError> {
        {
            let state = self.state.read().await;
            if let Some(cached) = state.as_ref().filter(|c| self.is_fresh(c)) {
                record_config_load("hit");
                return Ok(cached.snapshot.clone());
            }
        }

        let mut state = self.state.write().await;

        // Another request may have reloaded while we waited for the lock
        if let Some(cached) = state.as_ref().filter(|c| self.is_fresh(c)) {
            record_config_load("hit");
            return Ok(cached.snapshot.clone());
        }

        match self.fetch().await {
            Ok(snapshot) => {
                tracing::debug!(
                    target: "status.config.cache",
                    version = %snapshot.metadata.version,
                    revision = %snapshot.revision_id,
                    "Configuration reloaded"
                );
                *state = Some(CachedConfig {
                    snapshot: snapshot.clone(),
                    last_updated: self.clock.now(),
                });
                record_config_load("reload");
                Ok(snapshot)
            }
            Err(cause) => {
                tracing::error!(
                    target: "status.config.cache",
                    error = %cause,
                    "Configuration reload failed, keeping previous state"
                );
                record_config_load("error");
                Err(StatusError::ConfigurationLoad(cause))
            }
        }
    }

    async fn fetch(&self) -> Result<ConfigSnapshot, String> {
        let text = self
            .metadata_source
            .read_metadata()
            .await
            .map_err(|e| e.to_string())?;
        let metadata = AppMetadata::parse(&text).map_err(|e| e.to_string())?;
        let revision_id = self
            .revision_source
            .current_revision()
            .await
            .map_err(|e| e.to_string())?;

        Ok(ConfigSnapshot {
            metadata,
            revision_id,
        })
    }

    fn is_fresh(&self, cached: &CachedConfig) -> bool {
        let elapsed_ms = self
            .clock
            .now()
            .signed_duration_since(cached.last_updated)
            .num_milliseconds();
        let ttl_ms = i64::try_from(self.ttl.as_millis()).unwrap_or(i64::MAX);

        elapsed_ms < ttl_ms
    }
}
