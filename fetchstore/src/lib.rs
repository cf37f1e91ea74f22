//! FetchStore - Tracked downloads into a managed local file store
//!
//! This library provides a stateful facade over a local file store plus a
//! resumable download primitive with observable progress. Front ends poll
//! the tracker's state while a transfer runs and read the settled fields
//! afterwards; the file store itself stays behind a narrow trait so tests
//! and embedders can swap it out.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                          app                               │
//! │   AppConfig ──► FetchStoreApp ──► DownloadTracker          │
//! └───────────────────┬────────────────────┬───────────────────┘
//!                     │                    │
//!          ┌──────────▼────────┐ ┌─────────▼─────────┐
//!          │      storage      │ │     download      │
//!          │  Storage (trait)  │ │ Transport (trait) │
//!          │  LocalStorage     │ │ HttpTransport     │
//!          │  MemoryStorage    │ │ DownloadState     │
//!          └───────────────────┘ └───────────────────┘
//! ```
//!
//! # Quick start
//!
//! ```ignore
//! use fetchstore::app::{AppConfig, FetchStoreApp};
//!
//! let app = FetchStoreApp::start(AppConfig::load()?).await?;
//! let tracker = app.tracker();
//!
//! let result = tracker.download("https://example.com/report.pdf", "report.pdf").await;
//! if let Some(uri) = result.uri {
//!     println!("saved to {uri}");
//! }
//! ```

pub mod app;
pub mod download;
pub mod logging;
pub mod storage;

pub use app::{AppConfig, FetchStoreApp};
pub use download::{DownloadResult, DownloadState, DownloadTracker, FileInfo, HttpTransport};
pub use storage::{LocalStorage, MemoryStorage, Storage, StorageEntry, StorageError, StorageLayout};
