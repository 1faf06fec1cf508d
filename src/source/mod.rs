//! Repository acquisition.
//!
//! A [`RepositorySource`] turns an identifier into a bounded
//! [`RepositorySnapshot`]. Acquisition failures are fatal for the request;
//! nothing downstream runs without a snapshot.

pub mod github;
pub mod identifier;
pub mod manifest;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use crate::models::RepositorySnapshot;
use crate::models::snapshot::SnapshotError;

pub use github::GithubSource;
pub use identifier::RepoId;

/// Errors while acquiring a snapshot.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("invalid repository identifier {0}")]
    InvalidIdentifier(String),

    #[error("repository not found: {0}")]
    NotFound(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("invalid snapshot: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Acquisition collaborator.
#[async_trait]
pub trait RepositorySource: Send + Sync {
    async fn fetch(&self, identifier: &str) -> Result<RepositorySnapshot, SourceError>;
}

/// Replays a snapshot previously saved as JSON (see `gitgrade snapshot`).
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and validate the snapshot file.
    pub fn load(&self) -> Result<RepositorySnapshot, SourceError> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| SourceError::Io {
            path: self.path.clone(),
            source: e,
        })?;
        serde_json::from_str(&content)
            .map_err(|e| SourceError::Decode(format!("{}: {e}", self.path.display())))
    }
}

#[async_trait]
impl RepositorySource for FileSource {
    async fn fetch(&self, identifier: &str) -> Result<RepositorySnapshot, SourceError> {
        let snapshot = self.load()?;
        if let Ok(id) = RepoId::parse(identifier) {
            if id.to_string() != snapshot.full_name() {
                warn!(
                    requested = %id,
                    snapshot = %snapshot.full_name(),
                    "snapshot file describes a different repository"
                );
            }
        }
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_snapshot(dir: &Path) -> PathBuf {
        let snapshot = RepositorySnapshot::builder("octo", "widgets")
            .file_tree(["README.md", ".github/workflows/ci.yml"])
            .readme(Some("# Widgets".into()))
            .build()
            .unwrap();
        let path = dir.join("snapshot.json");
        std::fs::write(&path, serde_json::to_string_pretty(&snapshot).unwrap()).unwrap();
        path
    }

    #[tokio::test]
    async fn file_source_loads_saved_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSource::new(write_snapshot(dir.path()));
        let snapshot = source.fetch("octo/widgets").await.unwrap();
        assert_eq!(snapshot.full_name(), "octo/widgets");
        assert!(snapshot.has_ci());
        assert_eq!(snapshot.readme(), Some("# Widgets"));
    }

    #[tokio::test]
    async fn file_source_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSource::new(dir.path().join("absent.json"));
        let err = source.fetch("octo/widgets").await.unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
    }

    #[tokio::test]
    async fn file_source_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"owner": "", "name": "x"}"#).unwrap();
        let err = FileSource::new(path).fetch("x/x").await.unwrap_err();
        assert!(matches!(err, SourceError::Decode(_)));
    }
}
