//! Tracked downloads over a pluggable transport.
//!
//! The [`DownloadTracker`] is the public face of this module. It owns an
//! observable [`DownloadState`], runs one transfer at a time through a
//! [`Transport`], and lands files in the document directory of a
//! [`Storage`](crate::storage::Storage) backend.
//!
//! ```text
//!                      ┌──────────────────┐
//!     download(url) ──►│ DownloadTracker  │──► DownloadResult
//!     snapshot()    ◄──│  DownloadState   │
//!                      └────────┬─────────┘
//!                               │ transfer(request, on_progress)
//!                               ▼
//!                      ┌──────────────────┐
//!                      │ Transport        │  HttpTransport: resumable
//!                      │ (trait object)   │  HTTP with range requests
//!                      └────────┬─────────┘
//!                               ▼
//!                         document_dir/
//! ```
//!
//! [`HttpTransport`] is the production transport; tests swap in a scripted
//! implementation of the same trait.

mod error;
mod http;
mod progress;
mod state;
mod tracker;
mod transport;

pub use error::TransferError;
pub use http::HttpTransport;
pub use progress::{percent, ProgressCallback};
pub use state::DownloadState;
pub use tracker::{DownloadResult, DownloadTracker, FileInfo, FALLBACK_ERROR_MESSAGE};
pub use transport::{TransferRequest, TransferResponse, Transport};
