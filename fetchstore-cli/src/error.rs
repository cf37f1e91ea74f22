//! CLI error types.

use std::fmt;

use fetchstore::app::AppError;
use fetchstore::logging::LogError;
use fetchstore::storage::StorageError;

/// Errors that can occur while running a CLI command.
#[derive(Debug)]
pub enum CliError {
    /// Configuration error.
    Config(String),

    /// Application bootstrap failure.
    App(AppError),

    /// Storage operation failure.
    Storage(StorageError),

    /// Logging setup failure.
    Logging(LogError),

    /// A download did not produce a file.
    Download(String),

    /// Terminal interaction failed.
    Prompt(String),

    /// Output rendering failed.
    Render(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::App(e) => write!(f, "{}", e),
            CliError::Storage(e) => write!(f, "{}", e),
            CliError::Logging(e) => write!(f, "Failed to set up logging: {}", e),
            CliError::Download(msg) => write!(f, "Download failed: {}", msg),
            CliError::Prompt(msg) => write!(f, "Prompt failed: {}", msg),
            CliError::Render(msg) => write!(f, "Failed to render output: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::App(e) => Some(e),
            CliError::Storage(e) => Some(e),
            CliError::Logging(e) => Some(e),
            _ => None,
        }
    }
}

impl From<AppError> for CliError {
    fn from(e: AppError) -> Self {
        CliError::App(e)
    }
}

impl From<StorageError> for CliError {
    fn from(e: StorageError) -> Self {
        CliError::Storage(e)
    }
}

impl From<LogError> for CliError {
    fn from(e: LogError) -> Self {
        CliError::Logging(e)
    }
}

impl From<dialoguer::Error> for CliError {
    fn from(e: dialoguer::Error) -> Self {
        CliError::Prompt(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_error_display() {
        let err = CliError::Download("network lost".to_string());
        assert!(err.to_string().contains("Download failed"));
        assert!(err.to_string().contains("network lost"));
    }

    #[test]
    fn test_app_error_passes_through() {
        let err = CliError::from(AppError::Config("bad timeout".to_string()));
        assert!(err.to_string().contains("bad timeout"));
    }
}
