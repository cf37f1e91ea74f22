//! The download lifecycle tracker.

use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use tracing::{info, warn};

use super::state::DownloadState;
use super::transport::{TransferRequest, Transport};
use crate::storage::{uri_to_path, Storage, StorageError};

/// Message recorded when a transfer settles without a usable result, and
/// the fallback front ends show when no message was recorded at all.
pub const FALLBACK_ERROR_MESSAGE: &str = "download failed";

/// What a download invocation handed back to its caller.
///
/// A failed download yields the sentinel value with both fields `None`;
/// the reason lives in the tracker's state, not in the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadResult {
    /// URI of the downloaded file.
    pub uri: Option<String>,
    /// MIME type reported by the server.
    pub mime_type: Option<String>,
}

impl DownloadResult {
    /// The sentinel value returned for every failed or rejected download.
    pub fn failure() -> Self {
        DownloadResult {
            uri: None,
            mime_type: None,
        }
    }

    /// Whether the download produced a file.
    pub fn is_success(&self) -> bool {
        self.uri.is_some()
    }
}

/// Projected metadata for a single file.
///
/// Unlike [`StorageEntry`](crate::storage::StorageEntry), the size is only
/// reported for files that exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileInfo {
    /// Canonical URI of the path.
    pub uri: String,
    /// Whether something exists at the path.
    pub exists: bool,
    /// Whether the path names a directory.
    pub is_directory: bool,
    /// Size in bytes, present only when the file exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// Stateful facade over a storage backend and a transfer transport.
///
/// The tracker runs at most one download at a time and keeps an observable
/// [`DownloadState`] describing it: front ends poll [`snapshot`] while a
/// transfer is in flight and inspect the settled fields afterwards. Transfer
/// failures are absorbed into that state; only the storage passthroughs
/// return errors to the caller.
///
/// # Lifecycle
///
/// ```text
/// Idle ──download()──► InFlight ──settle──► Succeeded / Failed ──► Idle
///           ▲                                                       │
///           └───────────────────────────────────────────────────────┘
/// ```
///
/// `success`, `error`, `size`, `file`, and `progress` persist across returns
/// to idle; only `downloading` distinguishes an in-flight tracker.
///
/// # Example
///
/// ```ignore
/// use fetchstore::download::{DownloadTracker, HttpTransport};
/// use fetchstore::storage::{LocalStorage, StorageLayout};
/// use std::sync::Arc;
///
/// let storage = LocalStorage::open(StorageLayout::resolve("fetchstore")?).await?;
/// let tracker = DownloadTracker::new(Arc::new(storage), Arc::new(HttpTransport::new()));
///
/// let result = tracker.download("https://example.com/report.pdf", "report.pdf").await;
/// match result.uri {
///     Some(uri) => println!("saved to {uri}"),
///     None => eprintln!("failed: {:?}", tracker.last_error()),
/// }
/// ```
///
/// [`snapshot`]: DownloadTracker::snapshot
pub struct DownloadTracker {
    storage: Arc<dyn Storage>,
    transport: Arc<dyn Transport>,
    state: Arc<RwLock<DownloadState>>,
    cache: bool,
}

impl DownloadTracker {
    /// Create a tracker over the given backend and transport.
    pub fn new(storage: Arc<dyn Storage>, transport: Arc<dyn Transport>) -> Self {
        DownloadTracker {
            storage,
            transport,
            state: Arc::new(RwLock::new(DownloadState::new())),
            cache: true,
        }
    }

    /// Control whether transfers may reuse bytes already on disk.
    ///
    /// Defaults to true.
    pub fn with_cache(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }

    /// A point-in-time copy of the observable state.
    pub fn snapshot(&self) -> DownloadState {
        self.state.read().clone()
    }

    /// Whether a transfer is currently in flight.
    pub fn is_downloading(&self) -> bool {
        self.state.read().downloading
    }

    /// Message of the most recent failure, if any.
    pub fn last_error(&self) -> Option<String> {
        self.state.read().error.clone()
    }

    /// Download `source_url` into the document directory as
    /// `destination_name`.
    ///
    /// While the transfer runs, progress events update the observable state.
    /// On success the state records the file URI, the parsed Content-Length
    /// (when the server sent one), and latches `success`; the result carries
    /// the URI and MIME type. On failure the state records the error message,
    /// the previous success fields stay as they were, and the sentinel
    /// failure result is returned. The error is never propagated.
    ///
    /// A call made while another download is in flight is rejected: it
    /// returns the sentinel immediately and leaves the state alone.
    pub async fn download(&self, source_url: &str, destination_name: &str) -> DownloadResult {
        {
            let mut state = self.state.write();
            if state.downloading {
                warn!(url = source_url, "download rejected, transfer already in flight");
                return DownloadResult::failure();
            }
            state.begin();
        }

        let destination = self.storage.document_dir().join(destination_name);
        info!(
            url = source_url,
            destination = %destination.display(),
            "starting download"
        );

        let request = TransferRequest {
            source_url: source_url.to_string(),
            destination,
            cache: self.cache,
        };
        let progress_state = Arc::clone(&self.state);
        let outcome = self
            .transport
            .transfer(
                request,
                Box::new(move |written, expected| {
                    progress_state.write().record_progress(written, expected);
                }),
            )
            .await;

        let mut state = self.state.write();
        let result = match outcome {
            Ok(Some(response)) => {
                let content_length = response.content_length();
                info!(url = source_url, size = ?content_length, "download complete");
                state.record_success(response.uri.clone(), content_length);
                DownloadResult {
                    uri: Some(response.uri),
                    mime_type: response.mime_type,
                }
            }
            Ok(None) => {
                warn!(url = source_url, "download settled without a result");
                state.record_failure(FALLBACK_ERROR_MESSAGE);
                DownloadResult::failure()
            }
            Err(e) => {
                warn!(url = source_url, error = %e, "download failed");
                state.record_failure(e.to_string());
                DownloadResult::failure()
            }
        };
        // Every path that called begin() settles here, exactly once.
        state.finish();
        result
    }

    /// Metadata for a file, by URI or plain path.
    ///
    /// Read-only and idempotent; absence is reported as `exists: false`
    /// with no size.
    pub async fn file_info(&self, uri: &str) -> FileInfo {
        let path = uri_to_path(uri);
        let entry = self.storage.entry(&path).await;
        FileInfo {
            uri: entry.uri,
            exists: entry.exists,
            is_directory: entry.is_directory,
            size: if entry.exists { Some(entry.size) } else { None },
        }
    }

    /// Persistent document root of the underlying storage.
    pub fn document_dir(&self) -> &Path {
        self.storage.document_dir()
    }

    /// Cache root of the underlying storage.
    pub fn cache_dir(&self) -> &Path {
        self.storage.cache_dir()
    }

    /// Bundle root of the underlying storage, when the platform has one.
    pub fn bundle_dir(&self) -> Option<&Path> {
        self.storage.bundle_dir()
    }

    /// Read a text file from the underlying storage.
    pub async fn read_text(&self, path: &Path) -> Result<String, StorageError> {
        self.storage.read_text(path).await
    }

    /// Write a text file through the underlying storage.
    pub async fn write_text(&self, path: &Path, contents: &str) -> Result<(), StorageError> {
        self.storage.write_text(path, contents).await
    }

    /// Delete a file or directory through the underlying storage.
    pub async fn delete(&self, path: &Path) -> Result<bool, StorageError> {
        self.storage.delete(path).await
    }
}
