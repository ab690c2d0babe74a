//! Consumed-token set.
//!
//! Holds every token string that has been used once on a consuming route.
//! Entries are never evicted; expired tokens stay until the process exits.

use std::collections::HashSet;
use tokio::sync::RwLock;

/// Set of consumed token strings.
#[derive(Debug, Default)]
pub struct TokenBlacklist {
    inner: RwLock<HashSet<String>>,
}

impl TokenBlacklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `token` as consumed.
    ///
    /// Returns `true` if this call inserted it, `false` if it was already
    /// present. Concurrent callers racing on the same token see exactly one
    /// `true`.
    pub async fn insert(&self, token: &str) -> bool {
        self.inner.write().await.insert(token.to_string())
    }

    pub async fn contains(&self, token: &str) -> bool {
        self.inner.read().await.contains(token)
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}
