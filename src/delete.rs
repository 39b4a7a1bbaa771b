//! Removal of orphaned local files.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, instrument};

/// Errors from deleting a local file.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// The file vanished before deletion.
    #[error("{path} no longer exists")]
    Missing {
        /// File that was to be deleted.
        path: PathBuf,
    },

    /// Any other IO failure.
    #[error("cannot delete {path}: {source}")]
    Io {
        /// File that was to be deleted.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

/// Removes a local file.
#[async_trait]
pub trait Deleter: Send + Sync {
    /// Deletes the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DeleteError`] when the file cannot be removed.
    async fn delete(&self, path: &Path) -> Result<(), DeleteError>;
}

/// Deletes files from the local file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsDeleter;

#[async_trait]
impl Deleter for FsDeleter {
    #[instrument(skip(self), fields(path = %path.display()))]
    async fn delete(&self, path: &Path) -> Result<(), DeleteError> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => {
                info!("orphan deleted");
                Ok(())
            }
            Err(source) if source.kind() == io::ErrorKind::NotFound => Err(DeleteError::Missing {
                path: path.to_path_buf(),
            }),
            Err(source) => Err(DeleteError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_fs_deleter_removes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Old [X].mp3");
        std::fs::write(&path, b"x").unwrap();

        FsDeleter.delete(&path).await.unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_fs_deleter_reports_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = FsDeleter
            .delete(&dir.path().join("gone [G].mp3"))
            .await
            .unwrap_err();
        assert!(matches!(err, DeleteError::Missing { .. }));
    }
}
