//! Source-control revision lookup.

use crate::services::SourceError;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::instrument;

/// Source of the current revision identifier.
#[async_trait::async_trait]
pub trait RevisionSource: Send + Sync {
    /// Return the current revision (commit hash).
    async fn current_revision(&self) -> Result<String, SourceError>;
}

/// Runs `git rev-parse HEAD`, optionally in a given repository directory.
#[derive(Debug, Clone)]
pub struct GitRevisionSource {
    repo_dir: Option<PathBuf>,
}

impl GitRevisionSource {
    /// Look up the revision of the repository at `repo_dir`, or of the
    /// working directory when `None`.
    pub fn new(repo_dir: Option<PathBuf>) -> Self {
        Self { repo_dir }
    }
}

#[async_trait::async_trait]
impl RevisionSource for GitRevisionSource {
    #[instrument(skip_all, name = "status.revision.git")]
    async fn current_revision(&self) -> Result<String, SourceError> {
        let mut command = Command::new("git");
        command.args(["rev-parse", "HEAD"]).kill_on_drop(true);
        if let Some(dir) = &self.repo_dir {
            command.current_dir(dir);
        }

        let output = command
            .output()
            .await
            .map_err(|e| SourceError::Command(format!("failed to run git: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SourceError::Command(format!(
                "git rev-parse exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        parse_revision(&output.stdout)
    }
}

/// Trim command output down to the revision identifier.
fn parse_revision(stdout: &[u8]) -> Result<String, SourceError> {
    let revision = String::from_utf8_lossy(stdout).trim().to_string();

    if revision.is_empty() {
        return Err(SourceError::Command(
            "git rev-parse produced no output".to_string(),
        ));
    }

    Ok(revision)
}
