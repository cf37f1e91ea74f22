//! Core traits for the storage gateway.
//!
//! The `Storage` trait provides a narrow interface over a device file system:
//! well-known directory roots, text file round-trips, deletion, and metadata
//! queries. All storage backends implement this trait, allowing callers to use
//! any backend through a consistent interface.
//!
//! # Design Principles
//!
//! - **Narrow surface**: Only the operations the download layer actually
//!   needs, no general-purpose VFS ambitions
//! - **Absence as a value**: Metadata queries never fail; a missing file is
//!   reported as `exists: false`
//! - **Idempotent delete**: Removing something that is not there succeeds and
//!   reports `false`
//! - **Dyn-compatible**: Uses `Pin<Box<dyn Future>>` for trait object support
//!
//! # Example
//!
//! ```ignore
//! use fetchstore::storage::{LocalStorage, Storage, StorageLayout};
//!
//! let layout = StorageLayout::resolve("fetchstore")?;
//! let storage = LocalStorage::open(layout).await?;
//!
//! let path = storage.document_dir().join("notes.txt");
//! storage.write_text(&path, "hello").await?;
//! let entry = storage.entry(&path).await;
//! assert!(entry.exists);
//! ```

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// I/O failure while reading, writing, or deleting a file.
    #[error("i/o failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A read was attempted on a file that does not exist.
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A platform directory root could not be resolved.
    #[error("storage root unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    /// Wrap an I/O error with the path it occurred on.
    ///
    /// `NotFound` is surfaced as its own variant so callers can match on it
    /// without digging into `std::io::ErrorKind`.
    pub fn from_io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            StorageError::NotFound(path.to_path_buf())
        } else {
            StorageError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Metadata record for a single path.
///
/// Returned by [`Storage::entry`]. The query itself never fails: a path that
/// cannot be inspected (missing, unreadable) is reported as absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageEntry {
    /// Canonical URI of the path within the backend (`file://...`, `mem://...`).
    pub uri: String,
    /// Whether something exists at the path.
    pub exists: bool,
    /// Whether the path names a directory.
    pub is_directory: bool,
    /// Size in bytes; 0 when absent or unknown.
    pub size: u64,
}

impl StorageEntry {
    /// Build the record for a path that does not exist.
    pub fn absent(uri: String) -> Self {
        StorageEntry {
            uri,
            exists: false,
            is_directory: false,
            size: 0,
        }
    }
}

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Gateway over a device file system.
///
/// Backends expose three well-known directory roots and a small set of file
/// operations. The interface is intentionally minimal: callers that need more
/// than text round-trips and metadata should talk to the backend directly.
///
/// # Directory Roots
///
/// - **Document directory**: persistent, always available. Downloads land here.
/// - **Cache directory**: always available, contents may be discarded.
/// - **Bundle directory**: read-only files shipped with the application;
///   `None` on platforms without the concept.
///
/// # Error Behavior
///
/// Read, write, and delete propagate failures as [`StorageError`]. Metadata
/// queries via [`entry`](Storage::entry) never fail; see [`StorageEntry`].
///
/// # Dyn Compatibility
///
/// This trait uses `Pin<Box<dyn Future>>` for async methods to support
/// trait objects (`Arc<dyn Storage>`), which is how the download layer
/// holds its backend.
pub trait Storage: Send + Sync {
    /// Persistent per-application document root.
    fn document_dir(&self) -> &Path;

    /// Per-application cache root.
    fn cache_dir(&self) -> &Path;

    /// Read-only bundle root, when the platform has one.
    fn bundle_dir(&self) -> Option<&Path>;

    /// Canonical URI for a path within this backend.
    fn uri(&self, path: &Path) -> String;

    /// Read an entire file as UTF-8 text.
    ///
    /// # Returns
    ///
    /// - `Ok(contents)` if the file exists and is valid UTF-8
    /// - `Err(StorageError::NotFound)` if there is no file at the path
    /// - `Err(StorageError::Io)` for any other failure
    fn read_text(&self, path: &Path) -> BoxFuture<'_, Result<String, StorageError>>;

    /// Write text to a file, creating or truncating it.
    ///
    /// Parent directories are not created implicitly; writing into a missing
    /// directory fails with `StorageError::Io`.
    fn write_text(&self, path: &Path, contents: &str) -> BoxFuture<'_, Result<(), StorageError>>;

    /// Delete a file or directory.
    ///
    /// Directories are removed recursively. The operation is idempotent:
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if something existed and was removed
    /// - `Ok(false)` if nothing existed at the path
    /// - `Err(_)` if removal itself failed
    fn delete(&self, path: &Path) -> BoxFuture<'_, Result<bool, StorageError>>;

    /// Query metadata for a path.
    ///
    /// Never fails. A path that cannot be inspected is reported with
    /// `exists: false` and `size: 0`.
    fn entry(&self, path: &Path) -> BoxFuture<'_, StorageEntry>;
}

/// Strip a `<scheme>://` prefix from a URI, yielding a plain path.
///
/// Callers of the facade may hold either a URI (as handed out by
/// [`Storage::uri`]) or a bare path; both are accepted everywhere a path
/// is expected.
pub fn uri_to_path(uri: &str) -> PathBuf {
    match uri.split_once("://") {
        Some((_, rest)) => PathBuf::from(rest),
        None => PathBuf::from(uri),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::NotFound(PathBuf::from("/tmp/missing.txt"));
        assert_eq!(format!("{}", err), "file not found: /tmp/missing.txt");

        let err = StorageError::Unavailable("no data dir".to_string());
        assert!(format!("{}", err).contains("no data dir"));
    }

    #[test]
    fn test_storage_error_from_io_maps_not_found() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = StorageError::from_io(Path::new("/tmp/a"), io_err);
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[test]
    fn test_storage_error_from_io_keeps_other_kinds() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = StorageError::from_io(Path::new("/tmp/a"), io_err);
        assert!(matches!(err, StorageError::Io { .. }));
        assert!(format!("{}", err).contains("/tmp/a"));
    }

    #[test]
    fn test_absent_entry() {
        let entry = StorageEntry::absent("file:///nowhere".to_string());
        assert!(!entry.exists);
        assert!(!entry.is_directory);
        assert_eq!(entry.size, 0);
        assert_eq!(entry.uri, "file:///nowhere");
    }

    #[test]
    fn test_uri_to_path_strips_scheme() {
        assert_eq!(uri_to_path("file:///a/b.txt"), PathBuf::from("/a/b.txt"));
        assert_eq!(uri_to_path("mem:///fake/x"), PathBuf::from("/fake/x"));
    }

    #[test]
    fn test_uri_to_path_passes_plain_paths_through() {
        assert_eq!(uri_to_path("/a/b.txt"), PathBuf::from("/a/b.txt"));
        assert_eq!(uri_to_path("relative/c.txt"), PathBuf::from("relative/c.txt"));
    }
}
