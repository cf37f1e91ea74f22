//! Logging initialization.
//!
//! Wraps `tracing-subscriber` setup behind one call. Console output uses
//! local timestamps; when a log file is configured, output goes to a
//! non-blocking file writer instead and the returned guard must be held
//! for the life of the process so buffered lines reach disk.

use std::fmt;
use std::fs;
use std::path::PathBuf;

use time::format_description::well_known::Rfc3339;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset and no override is given.
pub const DEFAULT_LOG_FILTER: &str = "fetchstore=info";

/// Where and how verbosely to log.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    /// Filter directives, e.g. `fetchstore=debug`. Overrides `RUST_LOG`.
    pub filter: Option<String>,
    /// Append output to this file instead of stderr.
    pub file: Option<PathBuf>,
}

impl LogConfig {
    pub fn new() -> Self {
        LogConfig::default()
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    fn env_filter(&self) -> EnvFilter {
        match &self.filter {
            Some(directives) => EnvFilter::new(directives),
            None => EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        }
    }
}

/// Failure to bring up the logging pipeline.
#[derive(Debug)]
pub enum LogError {
    /// The log file's directory could not be created or opened.
    File { path: PathBuf, source: std::io::Error },
    /// A subscriber was already installed.
    AlreadyInitialized,
}

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogError::File { path, source } => {
                write!(f, "cannot open log file {}: {}", path.display(), source)
            }
            LogError::AlreadyInitialized => write!(f, "logging was already initialized"),
        }
    }
}

impl std::error::Error for LogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LogError::File { source, .. } => Some(source),
            LogError::AlreadyInitialized => None,
        }
    }
}

/// Install the global subscriber described by `config`.
///
/// Returns a guard when logging to a file; dropping it flushes and stops
/// the background writer thread.
pub fn init(config: &LogConfig) -> Result<Option<WorkerGuard>, LogError> {
    let filter = config.env_filter();
    let timer = LocalTime::new(Rfc3339);

    match &config.file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|e| LogError::File {
                    path: path.clone(),
                    source: e,
                })?;
            }
            let file = fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| LogError::File {
                    path: path.clone(),
                    source: e,
                })?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_timer(timer)
                .with_writer(writer)
                .with_ansi(false)
                .try_init()
                .map_err(|_| LogError::AlreadyInitialized)?;
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_timer(timer)
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|_| LogError::AlreadyInitialized)?;
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_filter_takes_priority() {
        let config = LogConfig::new().with_filter("fetchstore=trace");
        assert_eq!(config.filter.as_deref(), Some("fetchstore=trace"));
        // EnvFilter has no equality, so check the rendered directives.
        assert_eq!(config.env_filter().to_string(), "fetchstore=trace");
    }

    #[test]
    fn test_default_config_has_no_file() {
        let config = LogConfig::new();
        assert!(config.file.is_none());
        assert!(config.filter.is_none());
    }

    #[test]
    fn test_file_error_display_names_path() {
        let err = LogError::File {
            path: PathBuf::from("/nope/fetchstore.log"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("/nope/fetchstore.log"));
        assert!(rendered.contains("denied"));
    }

    #[test]
    fn test_init_rejects_unwritable_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("taken");
        std::fs::create_dir(&blocker).unwrap();

        // A directory where the file should be forces the open to fail.
        let config = LogConfig::new().with_file(&blocker);
        match init(&config) {
            Err(LogError::File { path, .. }) => assert_eq!(path, blocker),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected file error"),
        }
    }
}
