//! Disk-backed storage gateway.
//!
//! `LocalStorage` implements [`Storage`] over the real file system using
//! `tokio::fs`. Opening the backend creates the document and cache roots if
//! they are missing; everything else operates on the paths it is given.

use std::path::Path;

use super::layout::StorageLayout;
use super::traits::{BoxFuture, Storage, StorageEntry, StorageError};

/// File-system storage rooted at a [`StorageLayout`].
#[derive(Debug, Clone)]
pub struct LocalStorage {
    layout: StorageLayout,
}

impl LocalStorage {
    /// Open the backend, creating the document and cache roots.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` when a root directory cannot be created.
    pub async fn open(layout: StorageLayout) -> Result<Self, StorageError> {
        for root in [layout.document_dir(), layout.cache_dir()] {
            tokio::fs::create_dir_all(root)
                .await
                .map_err(|e| StorageError::Io {
                    path: root.to_path_buf(),
                    source: e,
                })?;
        }
        Ok(LocalStorage { layout })
    }

    /// The layout this backend was opened with.
    pub fn layout(&self) -> &StorageLayout {
        &self.layout
    }
}

impl Storage for LocalStorage {
    fn document_dir(&self) -> &Path {
        self.layout.document_dir()
    }

    fn cache_dir(&self) -> &Path {
        self.layout.cache_dir()
    }

    fn bundle_dir(&self) -> Option<&Path> {
        self.layout.bundle_dir()
    }

    fn uri(&self, path: &Path) -> String {
        format!("file://{}", path.display())
    }

    fn read_text(&self, path: &Path) -> BoxFuture<'_, Result<String, StorageError>> {
        let path = path.to_path_buf();
        Box::pin(async move {
            tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| StorageError::from_io(&path, e))
        })
    }

    fn write_text(&self, path: &Path, contents: &str) -> BoxFuture<'_, Result<(), StorageError>> {
        let path = path.to_path_buf();
        let contents = contents.to_string();
        Box::pin(async move {
            tokio::fs::write(&path, contents)
                .await
                .map_err(|e| StorageError::Io { path, source: e })
        })
    }

    fn delete(&self, path: &Path) -> BoxFuture<'_, Result<bool, StorageError>> {
        let path = path.to_path_buf();
        Box::pin(async move {
            // Stat first so symlinks are removed as links, not as their targets.
            let meta = match tokio::fs::symlink_metadata(&path).await {
                Ok(m) => m,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
                Err(e) => return Err(StorageError::Io { path, source: e }),
            };

            let result = if meta.is_dir() {
                tokio::fs::remove_dir_all(&path).await
            } else {
                tokio::fs::remove_file(&path).await
            };

            match result {
                Ok(()) => Ok(true),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
                Err(e) => Err(StorageError::Io { path, source: e }),
            }
        })
    }

    fn entry(&self, path: &Path) -> BoxFuture<'_, StorageEntry> {
        let uri = self.uri(path);
        let path = path.to_path_buf();
        Box::pin(async move {
            match tokio::fs::metadata(&path).await {
                Ok(meta) => StorageEntry {
                    uri,
                    exists: true,
                    is_directory: meta.is_dir(),
                    size: if meta.is_file() { meta.len() } else { 0 },
                },
                // Missing or unreadable paths are reported as absent.
                Err(_) => StorageEntry::absent(uri),
            }
        })
    }
}
