//! Directory roots a storage backend works within.
//!
//! A [`StorageLayout`] pins down the three well-known roots (document, cache,
//! bundle) before a backend is opened. Production code resolves them from the
//! platform via [`StorageLayout::resolve`]; tests and embedders construct
//! layouts explicitly.

use std::path::{Path, PathBuf};

use super::traits::StorageError;

/// Resolved directory roots for a storage backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    document_dir: PathBuf,
    cache_dir: PathBuf,
    bundle_dir: Option<PathBuf>,
}

impl StorageLayout {
    /// Build a layout from explicit roots.
    ///
    /// No bundle directory is assumed; attach one with
    /// [`with_bundle_dir`](Self::with_bundle_dir) if the platform has it.
    pub fn new(document_dir: impl Into<PathBuf>, cache_dir: impl Into<PathBuf>) -> Self {
        StorageLayout {
            document_dir: document_dir.into(),
            cache_dir: cache_dir.into(),
            bundle_dir: None,
        }
    }

    /// Attach a read-only bundle directory.
    pub fn with_bundle_dir(mut self, bundle_dir: impl Into<PathBuf>) -> Self {
        self.bundle_dir = Some(bundle_dir.into());
        self
    }

    /// Resolve the layout from the platform's standard directories.
    ///
    /// The document root is `<data_dir>/<app_name>` and the cache root is
    /// `<cache_dir>/<app_name>`. The bundle root is the directory holding the
    /// running executable; it is omitted when that cannot be determined.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unavailable` when the platform reports no data
    /// or cache directory (headless environments without a home directory).
    pub fn resolve(app_name: &str) -> Result<Self, StorageError> {
        let data_root = dirs::data_dir()
            .ok_or_else(|| StorageError::Unavailable("no platform data directory".to_string()))?;
        let cache_root = dirs::cache_dir()
            .ok_or_else(|| StorageError::Unavailable("no platform cache directory".to_string()))?;

        let bundle_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));

        Ok(StorageLayout {
            document_dir: data_root.join(app_name),
            cache_dir: cache_root.join(app_name),
            bundle_dir,
        })
    }

    /// Persistent document root.
    pub fn document_dir(&self) -> &Path {
        &self.document_dir
    }

    /// Cache root.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Read-only bundle root, when present.
    pub fn bundle_dir(&self) -> Option<&Path> {
        self.bundle_dir.as_deref()
    }
}
