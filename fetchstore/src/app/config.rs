//! Application configuration for FetchStoreApp.
//!
//! This module defines `AppConfig` which combines all configuration needed
//! to bootstrap the application: the storage roots, transfer settings, and
//! logging destination. Settings come from the builder API or from the
//! user's INI config file.

use std::path::{Path, PathBuf};

use ini::Ini;

use super::error::AppError;
use crate::storage::StorageLayout;

/// Application name used for platform directory resolution.
pub const DEFAULT_APP_NAME: &str = "fetchstore";

/// Default transfer timeout in seconds.
///
/// Matches the transport default; kept here so the config file can state
/// it explicitly.
pub const DEFAULT_TRANSFER_TIMEOUT_SECS: u64 = 300;

/// Transfer configuration for the application.
#[derive(Clone, Debug)]
pub struct TransferConfig {
    /// Timeout for a whole transfer, in seconds.
    pub timeout_secs: u64,

    /// Whether transfers may reuse partially downloaded files.
    pub cache_partial: bool,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TRANSFER_TIMEOUT_SECS,
            cache_partial: true,
        }
    }
}

impl TransferConfig {
    /// Set the transfer timeout.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Enable or disable reuse of partial downloads.
    pub fn with_cache_partial(mut self, cache_partial: bool) -> Self {
        self.cache_partial = cache_partial;
        self
    }
}

/// Application configuration combining all component configs.
///
/// This is the top-level configuration passed to `FetchStoreApp::start()`.
/// Directory overrides are optional; anything left `None` is resolved from
/// the platform's standard directories under [`app_name`](Self::app_name).
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Name used for platform directory resolution.
    pub app_name: String,

    /// Override for the document root.
    pub document_dir: Option<PathBuf>,

    /// Override for the cache root.
    pub cache_dir: Option<PathBuf>,

    /// Override for the read-only bundle root.
    pub bundle_dir: Option<PathBuf>,

    /// Transfer settings.
    pub transfer: TransferConfig,

    /// Log filter directives, e.g. `fetchstore=debug`.
    pub log_filter: Option<String>,

    /// Log file path; logs go to stderr when unset.
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new(DEFAULT_APP_NAME)
    }
}

impl AppConfig {
    /// Create a new application config with default settings.
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            document_dir: None,
            cache_dir: None,
            bundle_dir: None,
            transfer: TransferConfig::default(),
            log_filter: None,
            log_file: None,
        }
    }

    /// Load the user configuration file, falling back to defaults.
    ///
    /// The file lives at `<config_dir>/fetchstore/config.ini`; a missing
    /// file is not an error.
    pub fn load() -> Result<Self, AppError> {
        match Self::user_config_path() {
            Some(path) if path.exists() => Self::from_ini_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Path of the user configuration file, when the platform has a
    /// config directory.
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(DEFAULT_APP_NAME).join("config.ini"))
    }

    /// Parse an INI configuration file.
    ///
    /// Recognized sections and keys:
    ///
    /// ```ini
    /// [storage]
    /// document_dir = /data/fetchstore/documents
    /// cache_dir = /data/fetchstore/cache
    /// bundle_dir = /opt/fetchstore/assets
    ///
    /// [transfer]
    /// timeout_secs = 300
    /// cache_partial = true
    ///
    /// [logging]
    /// filter = fetchstore=info
    /// file = /var/log/fetchstore.log
    /// ```
    ///
    /// Unknown sections and keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` when the file cannot be read or a value
    /// does not parse.
    pub fn from_ini_file(path: &Path) -> Result<Self, AppError> {
        let ini = Ini::load_from_file(path)
            .map_err(|e| AppError::Config(format!("cannot read {}: {}", path.display(), e)))?;

        let mut config = Self::default();

        if let Some(storage) = ini.section(Some("storage")) {
            if let Some(dir) = storage.get("document_dir") {
                config.document_dir = Some(PathBuf::from(dir));
            }
            if let Some(dir) = storage.get("cache_dir") {
                config.cache_dir = Some(PathBuf::from(dir));
            }
            if let Some(dir) = storage.get("bundle_dir") {
                config.bundle_dir = Some(PathBuf::from(dir));
            }
        }

        if let Some(transfer) = ini.section(Some("transfer")) {
            if let Some(raw) = transfer.get("timeout_secs") {
                config.transfer.timeout_secs = raw.parse().map_err(|_| {
                    AppError::Config(format!("invalid transfer.timeout_secs: {raw}"))
                })?;
            }
            if let Some(raw) = transfer.get("cache_partial") {
                config.transfer.cache_partial = parse_bool(raw).ok_or_else(|| {
                    AppError::Config(format!("invalid transfer.cache_partial: {raw}"))
                })?;
            }
        }

        if let Some(logging) = ini.section(Some("logging")) {
            if let Some(filter) = logging.get("filter") {
                config.log_filter = Some(filter.to_string());
            }
            if let Some(file) = logging.get("file") {
                config.log_file = Some(PathBuf::from(file));
            }
        }

        Ok(config)
    }

    /// Override the document root.
    pub fn with_document_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.document_dir = Some(dir.into());
        self
    }

    /// Override the cache root.
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    /// Override the bundle root.
    pub fn with_bundle_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.bundle_dir = Some(dir.into());
        self
    }

    /// Replace the transfer settings.
    pub fn with_transfer(mut self, transfer: TransferConfig) -> Self {
        self.transfer = transfer;
        self
    }

    /// Set the log filter directives.
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = Some(filter.into());
        self
    }

    /// Route logs to a file.
    pub fn with_log_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.log_file = Some(file.into());
        self
    }

    /// Resolve the storage layout this config describes.
    ///
    /// Explicit overrides win; anything missing falls back to the platform
    /// directories for [`app_name`](Self::app_name).
    pub(crate) fn layout(&self) -> Result<StorageLayout, AppError> {
        let (document_dir, cache_dir, platform_bundle) =
            match (&self.document_dir, &self.cache_dir) {
                (Some(document), Some(cache)) => (document.clone(), cache.clone(), None),
                _ => {
                    let resolved = StorageLayout::resolve(&self.app_name)?;
                    (
                        self.document_dir
                            .clone()
                            .unwrap_or_else(|| resolved.document_dir().to_path_buf()),
                        self.cache_dir
                            .clone()
                            .unwrap_or_else(|| resolved.cache_dir().to_path_buf()),
                        resolved.bundle_dir().map(Path::to_path_buf),
                    )
                }
            };

        let mut layout = StorageLayout::new(document_dir, cache_dir);
        if let Some(bundle) = self.bundle_dir.clone().or(platform_bundle) {
            layout = layout.with_bundle_dir(bundle);
        }
        Ok(layout)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_transfer_config_default() {
        let config = TransferConfig::default();
        assert_eq!(config.timeout_secs, 300);
        assert!(config.cache_partial);
    }

    #[test]
    fn test_transfer_config_builder() {
        let config = TransferConfig::default()
            .with_timeout_secs(60)
            .with_cache_partial(false);
        assert_eq!(config.timeout_secs, 60);
        assert!(!config.cache_partial);
    }

    #[test]
    fn test_app_config_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.app_name, "fetchstore");
        assert!(config.document_dir.is_none());
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_app_config_builders() {
        let config = AppConfig::new("myapp")
            .with_document_dir("/d")
            .with_cache_dir("/c")
            .with_bundle_dir("/b")
            .with_log_filter("myapp=trace");

        assert_eq!(config.document_dir, Some(PathBuf::from("/d")));
        assert_eq!(config.cache_dir, Some(PathBuf::from("/c")));
        assert_eq!(config.bundle_dir, Some(PathBuf::from("/b")));
        assert_eq!(config.log_filter.as_deref(), Some("myapp=trace"));
    }

    #[test]
    fn test_explicit_dirs_resolve_without_platform() {
        let config = AppConfig::new("myapp")
            .with_document_dir("/d")
            .with_cache_dir("/c");

        let layout = config.layout().unwrap();
        assert_eq!(layout.document_dir(), Path::new("/d"));
        assert_eq!(layout.cache_dir(), Path::new("/c"));
        assert!(layout.bundle_dir().is_none());
    }

    #[test]
    fn test_bundle_override_applies() {
        let config = AppConfig::new("myapp")
            .with_document_dir("/d")
            .with_cache_dir("/c")
            .with_bundle_dir("/assets");

        let layout = config.layout().unwrap();
        assert_eq!(layout.bundle_dir(), Some(Path::new("/assets")));
    }

    #[test]
    fn test_from_ini_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(
            &path,
            "[storage]\n\
             document_dir = /data/docs\n\
             cache_dir = /data/cache\n\
             \n\
             [transfer]\n\
             timeout_secs = 120\n\
             cache_partial = no\n\
             \n\
             [logging]\n\
             filter = fetchstore=debug\n\
             file = /var/log/fetchstore.log\n",
        )
        .unwrap();

        let config = AppConfig::from_ini_file(&path).unwrap();
        assert_eq!(config.document_dir, Some(PathBuf::from("/data/docs")));
        assert_eq!(config.cache_dir, Some(PathBuf::from("/data/cache")));
        assert_eq!(config.transfer.timeout_secs, 120);
        assert!(!config.transfer.cache_partial);
        assert_eq!(config.log_filter.as_deref(), Some("fetchstore=debug"));
        assert_eq!(config.log_file, Some(PathBuf::from("/var/log/fetchstore.log")));
    }

    #[test]
    fn test_from_ini_file_empty_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "").unwrap();

        let config = AppConfig::from_ini_file(&path).unwrap();
        assert_eq!(config.transfer.timeout_secs, 300);
        assert!(config.document_dir.is_none());
    }

    #[test]
    fn test_from_ini_file_rejects_bad_timeout() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[transfer]\ntimeout_secs = soon\n").unwrap();

        let err = AppConfig::from_ini_file(&path).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn test_from_ini_file_rejects_bad_bool() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[transfer]\ncache_partial = maybe\n").unwrap();

        let err = AppConfig::from_ini_file(&path).unwrap_err();
        assert!(err.to_string().contains("cache_partial"));
    }

    #[test]
    fn test_parse_bool_variants() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("yes"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("off"), None);
    }

    #[test]
    fn test_missing_ini_file_is_config_error() {
        let err = AppConfig::from_ini_file(Path::new("/nonexistent/config.ini")).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
