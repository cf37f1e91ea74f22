//! Transport seam for resumable transfers.
//!
//! The tracker never talks to the network directly; it hands a
//! [`TransferRequest`] and a progress callback to whatever [`Transport`] it
//! was built with. Production code uses [`HttpTransport`], tests use the
//! scripted mock below.
//!
//! [`HttpTransport`]: super::http::HttpTransport

use std::collections::HashMap;
use std::path::PathBuf;

use super::error::TransferError;
use super::progress::ProgressCallback;
use crate::storage::BoxFuture;

/// One transfer order: where from, where to, and whether bytes already on
/// disk may be reused.
#[derive(Debug, Clone)]
pub struct TransferRequest {
    /// Source URL.
    pub source_url: String,
    /// Absolute destination path.
    pub destination: PathBuf,
    /// When true, a complete destination file is kept as-is and a partial
    /// one is resumed; when false, the transfer always starts from scratch.
    pub cache: bool,
}

/// What a settled transfer produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferResponse {
    /// URI of the downloaded file.
    pub uri: String,
    /// MIME type reported by the server, when any.
    pub mime_type: Option<String>,
    /// Response headers of the final request.
    pub headers: HashMap<String, String>,
}

impl TransferResponse {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The Content-Length header parsed as an integer, when present and
    /// well-formed.
    pub fn content_length(&self) -> Option<u64> {
        self.header("content-length").and_then(|v| v.parse().ok())
    }
}

/// A resumable-transfer primitive.
///
/// Implementations move the bytes at `request.source_url` into
/// `request.destination`, reporting progress along the way. The result
/// distinguishes three shapes:
///
/// - `Ok(Some(response))`: the transfer completed
/// - `Ok(None)`: the transfer settled without producing a usable result
/// - `Err(e)`: the transfer failed
///
/// `Ok(None)` exists because callers must treat an empty result exactly like
/// a failure without any error to show for it.
pub trait Transport: Send + Sync {
    /// Run one transfer to completion.
    fn transfer(
        &self,
        request: TransferRequest,
        on_progress: ProgressCallback,
    ) -> BoxFuture<'_, Result<Option<TransferResponse>, TransferError>>;
}
