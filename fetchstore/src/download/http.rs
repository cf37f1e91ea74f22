//! HTTP transport with resume support.
//!
//! This module provides the production [`Transport`] implementation:
//! - Resumable downloads via HTTP Range requests
//! - Reuse of already-complete destination files
//! - Progress callbacks for UI updates

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::debug;

use super::error::TransferError;
use super::progress::ProgressCallback;
use super::transport::{TransferRequest, TransferResponse, Transport};
use crate::storage::BoxFuture;

/// Default timeout for HTTP requests in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 300; // 5 minutes

/// Buffer size for writing during downloads (64KB).
const BUFFER_SIZE: usize = 64 * 1024;

/// What a HEAD probe of the source reported.
#[derive(Debug)]
struct SourceInfo {
    total_size: u64,
    supports_range: bool,
    mime_type: Option<String>,
    headers: HashMap<String, String>,
}

/// What the pre-flight probe decided about an existing destination file.
#[derive(Debug)]
enum ResumePlan {
    /// Start the transfer from scratch.
    Fresh,
    /// Issue a Range request starting at the existing length.
    Resume { start_byte: u64, info: SourceInfo },
    /// The file on disk already matches the server's reported length.
    AlreadyComplete(SourceInfo),
}

/// Decide how an existing destination file of `existing_size` bytes is used.
fn plan_resume(existing_size: u64, info: SourceInfo) -> ResumePlan {
    if info.total_size > 0 && existing_size == info.total_size {
        ResumePlan::AlreadyComplete(info)
    } else if info.supports_range && info.total_size > existing_size {
        ResumePlan::Resume {
            start_byte: existing_size,
            info,
        }
    } else {
        ResumePlan::Fresh
    }
}

/// HTTP-based transfer transport.
///
/// Implements the [`Transport`] trait with support for:
/// - Range requests for resuming partial destination files
/// - Skipping the network entirely when the destination is already complete
/// - Progress reporting
#[derive(Debug)]
pub struct HttpTransport {
    client: Client,
    timeout: Duration,
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport {
    /// Create a new HTTP transport with default settings.
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a new HTTP transport with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("fetchstore/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, timeout }
    }

    /// The configured request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn run(
        &self,
        request: TransferRequest,
        on_progress: ProgressCallback,
    ) -> Result<Option<TransferResponse>, TransferError> {
        let url = request.source_url.as_str();
        let dest = request.destination.as_path();

        // Check existing file for resume
        let existing_size = if request.cache {
            match tokio::fs::metadata(dest).await {
                Ok(meta) => meta.len(),
                Err(_) => 0,
            }
        } else {
            0
        };

        let mut resume: Option<(u64, SourceInfo)> = None;
        if existing_size > 0 {
            let info = self.query_source_info(url).await?;
            match plan_resume(existing_size, info) {
                // Already complete: respond from disk without touching the
                // network.
                ResumePlan::AlreadyComplete(info) => {
                    debug!(url, size = existing_size, "destination already complete");
                    on_progress(existing_size, existing_size);
                    return Ok(Some(self.response_for(dest, info.mime_type, info.headers)));
                }
                ResumePlan::Resume { start_byte, info } => resume = Some((start_byte, info)),
                ResumePlan::Fresh => {}
            }
        }
        let start_byte = resume.as_ref().map_or(0, |(start, _)| *start);

        // Build request with optional Range header
        let mut get = self.client.get(url);
        if start_byte > 0 {
            debug!(url, start_byte, "resuming partial download");
            get = get.header("Range", format!("bytes={}-", start_byte));
        }

        let response = get.send().await.map_err(|e| self.request_error(url, e))?;
        let status = response.status();

        // A 416 to a Range request means the server considers the file
        // complete at its reported length. Without a resume in play no Range
        // was sent, and the status falls through to the error below.
        if status.as_u16() == 416 {
            if let Some((_, info)) = resume {
                on_progress(existing_size, existing_size);
                return Ok(Some(self.response_for(dest, info.mime_type, info.headers)));
            }
        }

        if !status.is_success() {
            return Err(TransferError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // A 200 to a Range request means the server ignored it; start over.
        let resumed = start_byte > 0 && status.as_u16() == 206;
        let start = if resumed { start_byte } else { 0 };
        let total = response
            .content_length()
            .map(|remainder| start + remainder)
            .unwrap_or(0);

        let headers = header_map(response.headers());
        let mime_type = mime_from_headers(response.headers());

        let file = self.prepare_destination(dest, resumed).await?;
        let mut writer = BufWriter::with_capacity(BUFFER_SIZE, file);
        let mut downloaded = start;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| self.request_error(url, e))?;
            writer
                .write_all(&chunk)
                .await
                .map_err(|e| TransferError::Write {
                    path: dest.to_path_buf(),
                    reason: e.to_string(),
                })?;
            downloaded += chunk.len() as u64;
            on_progress(downloaded, total);
        }

        writer.flush().await.map_err(|e| TransferError::Write {
            path: dest.to_path_buf(),
            reason: e.to_string(),
        })?;

        Ok(Some(self.response_for(dest, mime_type, headers)))
    }

    /// Query total size and range support via HEAD request.
    async fn query_source_info(&self, url: &str) -> Result<SourceInfo, TransferError> {
        let head = self
            .client
            .head(url)
            .send()
            .await
            .map_err(|e| self.request_error(url, e))?;

        if !head.status().is_success() {
            return Err(TransferError::Status {
                url: url.to_string(),
                status: head.status().as_u16(),
            });
        }

        let total_size = head
            .headers()
            .get("content-length")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(0);

        let supports_range = head
            .headers()
            .get("accept-ranges")
            .map(|v| v.to_str().unwrap_or("") == "bytes")
            .unwrap_or(false);

        Ok(SourceInfo {
            total_size,
            supports_range,
            mime_type: mime_from_headers(head.headers()),
            headers: header_map(head.headers()),
        })
    }

    /// Open the destination for writing (append when resuming).
    async fn prepare_destination(&self, dest: &Path, resumed: bool) -> Result<File, TransferError> {
        if resumed {
            OpenOptions::new()
                .append(true)
                .open(dest)
                .await
                .map_err(|e| TransferError::Write {
                    path: dest.to_path_buf(),
                    reason: e.to_string(),
                })
        } else {
            if let Some(parent) = dest.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| TransferError::Write {
                        path: parent.to_path_buf(),
                        reason: e.to_string(),
                    })?;
            }
            File::create(dest).await.map_err(|e| TransferError::Write {
                path: dest.to_path_buf(),
                reason: e.to_string(),
            })
        }
    }

    fn response_for(
        &self,
        dest: &Path,
        mime_type: Option<String>,
        headers: HashMap<String, String>,
    ) -> TransferResponse {
        TransferResponse {
            uri: format!("file://{}", dest.display()),
            mime_type,
            headers,
        }
    }

    fn request_error(&self, url: &str, e: reqwest::Error) -> TransferError {
        if e.is_timeout() {
            TransferError::Timeout {
                url: url.to_string(),
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            TransferError::Request {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    }
}

impl Transport for HttpTransport {
    fn transfer(
        &self,
        request: TransferRequest,
        on_progress: ProgressCallback,
    ) -> BoxFuture<'_, Result<Option<TransferResponse>, TransferError>> {
        Box::pin(async move { self.run(request, on_progress).await })
    }
}

/// Copy response headers into a plain map, dropping non-UTF-8 values.
fn header_map(headers: &reqwest::header::HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect()
}

/// MIME type from a Content-Type header, parameters stripped.
fn mime_from_headers(headers: &reqwest::header::HeaderMap) -> Option<String> {
    headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|v| v.trim().to_string())
}
