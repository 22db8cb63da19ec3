//! Storage for files uploaded through file-type connectors.
//!
//! Upload happens in the connector API; the management server only needs
//! deletion, which runs synchronously during a deletion attempt because
//! the file listing lives in the connector's configuration and must be
//! captured before the connector row is reaped.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FileStoreError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid file location: {0}")]
    InvalidLocation(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type FileStoreResult<T> = Result<T, FileStoreError>;

#[async_trait]
pub trait FileStore: Send + Sync {
    /// Delete a stored file by its connector-config location.
    async fn delete_file(&self, location: &str) -> FileStoreResult<()>;

    /// Get the backend type name (for logging/debugging).
    fn backend_name(&self) -> &'static str;
}

/// Filesystem-backed file store rooted at a configured directory.
pub struct FilesystemFileStore {
    root: PathBuf,
}

impl FilesystemFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a location to a path under the root, rejecting absolute
    /// paths and parent-directory traversal.
    fn resolve(&self, location: &str) -> FileStoreResult<PathBuf> {
        let relative = Path::new(location);
        let traverses = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if relative.is_absolute() || traverses {
            return Err(FileStoreError::InvalidLocation(location.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl FileStore for FilesystemFileStore {
    #[tracing::instrument(skip(self))]
    async fn delete_file(&self, location: &str) -> FileStoreResult<()> {
        let path = self.resolve(location)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(location, "Deleted connector file");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(FileStoreError::NotFound(location.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn backend_name(&self) -> &'static str {
        "filesystem"
    }
}
