//! In-memory storage gateway.
//!
//! `MemoryStorage` implements [`Storage`] over process-local maps. It exists
//! for tests and embedding scenarios that need gateway semantics without a
//! real file system, and it mirrors [`LocalStorage`] behavior exactly:
//! missing reads fail with `NotFound`, writes require their parent directory,
//! deletes are idempotent, metadata queries never fail.
//!
//! [`LocalStorage`]: super::local::LocalStorage

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use parking_lot::RwLock;

use super::layout::StorageLayout;
use super::traits::{BoxFuture, Storage, StorageEntry, StorageError};

/// Map-backed storage with `mem://` URIs.
#[derive(Debug)]
pub struct MemoryStorage {
    layout: StorageLayout,
    files: RwLock<HashMap<PathBuf, String>>,
    dirs: RwLock<HashSet<PathBuf>>,
}

impl MemoryStorage {
    /// Create an empty backend with synthetic roots.
    pub fn new() -> Self {
        Self::with_layout(StorageLayout::new("/memory/documents", "/memory/cache"))
    }

    /// Create an empty backend rooted at the given layout.
    pub fn with_layout(layout: StorageLayout) -> Self {
        let mut dirs = HashSet::new();
        dirs.insert(layout.document_dir().to_path_buf());
        dirs.insert(layout.cache_dir().to_path_buf());
        if let Some(bundle) = layout.bundle_dir() {
            dirs.insert(bundle.to_path_buf());
        }
        MemoryStorage {
            layout,
            files: RwLock::new(HashMap::new()),
            dirs: RwLock::new(dirs),
        }
    }

    /// Seed a file, registering its ancestors as directories.
    pub fn with_file(self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        let path = path.into();
        self.register_ancestors(&path);
        self.files.write().insert(path, contents.into());
        self
    }

    /// Register a directory so files can be written beneath it.
    pub fn add_dir(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.register_ancestors(&path);
        self.dirs.write().insert(path);
    }

    fn register_ancestors(&self, path: &Path) {
        let mut dirs = self.dirs.write();
        let mut current = path.parent();
        while let Some(dir) = current {
            if dir.as_os_str().is_empty() {
                break;
            }
            dirs.insert(dir.to_path_buf());
            current = dir.parent();
        }
    }

    fn dir_exists(&self, path: &Path) -> bool {
        self.dirs.read().contains(path)
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for MemoryStorage {
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
        format!("mem://{}", path.display())
    }

    fn read_text(&self, path: &Path) -> BoxFuture<'_, Result<String, StorageError>> {
        let result = self
            .files
            .read()
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(path.to_path_buf()));
        Box::pin(async move { result })
    }

    fn write_text(&self, path: &Path, contents: &str) -> BoxFuture<'_, Result<(), StorageError>> {
        let result = match path.parent() {
            Some(parent) if self.dir_exists(parent) => {
                self.files
                    .write()
                    .insert(path.to_path_buf(), contents.to_string());
                Ok(())
            }
            _ => Err(StorageError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "parent directory does not exist",
                ),
            }),
        };
        Box::pin(async move { result })
    }

    fn delete(&self, path: &Path) -> BoxFuture<'_, Result<bool, StorageError>> {
        let removed = if self.files.write().remove(path).is_some() {
            true
        } else if self.dirs.write().remove(path) {
            // Recursive removal: drop everything beneath the directory.
            self.files.write().retain(|p, _| !p.starts_with(path));
            self.dirs.write().retain(|p| !p.starts_with(path));
            true
        } else {
            false
        };
        Box::pin(async move { Ok(removed) })
    }

    fn entry(&self, path: &Path) -> BoxFuture<'_, StorageEntry> {
        let uri = self.uri(path);
        let entry = if self.dir_exists(path) {
            StorageEntry {
                uri,
                exists: true,
                is_directory: true,
                size: 0,
            }
        } else if let Some(contents) = self.files.read().get(path) {
            StorageEntry {
                uri,
                exists: true,
                is_directory: false,
                size: contents.len() as u64,
            }
        } else {
            StorageEntry::absent(uri)
        };
        Box::pin(async move { entry })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_write_then_read_roundtrip() {
        let storage = MemoryStorage::new();
        let path = storage.document_dir().join("notes.txt");

        storage.write_text(&path, "hello").await.unwrap();
        assert_eq!(storage.read_text(&path).await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_read_missing_file_is_not_found() {
        let storage = MemoryStorage::new();
        let path = storage.document_dir().join("missing.txt");

        let err = storage.read_text(&path).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_write_into_missing_parent_fails() {
        let storage = MemoryStorage::new();
        let path = storage.document_dir().join("no-such-dir").join("a.txt");

        let err = storage.write_text(&path, "x").await.unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));
    }

    #[tokio::test]
    async fn test_add_dir_allows_nested_writes() {
        let storage = MemoryStorage::new();
        let dir = storage.document_dir().join("nested");
        storage.add_dir(&dir);

        storage.write_text(&dir.join("a.txt"), "x").await.unwrap();
        assert!(storage.entry(&dir).await.is_directory);
    }

    #[tokio::test]
    async fn test_with_file_seeds_contents() {
        let storage = MemoryStorage::new().with_file("/seeded/data.txt", "payload");

        assert_eq!(
            storage.read_text(Path::new("/seeded/data.txt")).await.unwrap(),
            "payload"
        );
        // Ancestors were registered along the way.
        assert!(storage.entry(Path::new("/seeded")).await.is_directory);
    }

    #[tokio::test]
    async fn test_delete_existing_and_missing() {
        let storage = MemoryStorage::new();
        let path = storage.document_dir().join("doomed.txt");
        storage.write_text(&path, "x").await.unwrap();

        assert!(storage.delete(&path).await.unwrap());
        assert!(!storage.delete(&path).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_directory_removes_children() {
        let storage = MemoryStorage::new();
        let dir = storage.document_dir().join("tree");
        storage.add_dir(&dir);
        storage.write_text(&dir.join("leaf.txt"), "x").await.unwrap();

        assert!(storage.delete(&dir).await.unwrap());
        assert!(!storage.entry(&dir).await.exists);
        assert!(!storage.entry(&dir.join("leaf.txt")).await.exists);
    }

    #[tokio::test]
    async fn test_entry_reports_size_in_bytes() {
        let storage = MemoryStorage::new();
        let path = storage.document_dir().join("sized.txt");
        storage.write_text(&path, "12345").await.unwrap();

        let entry = storage.entry(&path).await;
        assert!(entry.exists);
        assert_eq!(entry.size, 5);
        assert!(entry.uri.starts_with("mem://"));
    }

    #[tokio::test]
    async fn test_entry_for_missing_path_is_absent() {
        let storage = MemoryStorage::new();
        let entry = storage.entry(Path::new("/memory/documents/ghost")).await;

        assert!(!entry.exists);
        assert_eq!(entry.size, 0);
    }

    #[tokio::test]
    async fn test_concurrent_access() {
        let storage = Arc::new(MemoryStorage::new());
        let mut handles = Vec::new();

        for i in 0..8 {
            let storage = Arc::clone(&storage);
            handles.push(tokio::spawn(async move {
                let path = storage.document_dir().join(format!("file-{i}.txt"));
                storage.write_text(&path, "data").await.unwrap();
                storage.read_text(&path).await.unwrap()
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap(), "data");
        }
    }
}
