//! Transfer error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors a transport can fail with.
///
/// Variants carry string context rather than source errors so they stay
/// `Clone` for scripted test transports. The tracker only ever renders them
/// through `Display` before absorbing them into its observable state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    /// The request could not be sent or the connection broke mid-stream.
    #[error("request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    /// The server answered with a non-success status.
    #[error("server returned status {status} for {url}")]
    Status { url: String, status: u16 },

    /// The destination file could not be written.
    #[error("writing {} failed: {reason}", path.display())]
    Write { path: PathBuf, reason: String },

    /// The transfer exceeded the configured timeout.
    #[error("transfer of {url} timed out after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },
}
