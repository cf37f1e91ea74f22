//! Application bootstrap and lifecycle management.
//!
//! This module provides the `FetchStoreApp` type which handles proper
//! initialization sequencing: configuration, storage, transport, tracker.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        FetchStoreApp                         │
//! │                                                              │
//! │  1. AppConfig ───────► StorageLayout (overrides + platform)  │
//! │                                                              │
//! │  2. LocalStorage ────► document / cache / bundle roots       │
//! │                                                              │
//! │  3. HttpTransport ───► DownloadTracker                       │
//! │                        (observable download state)           │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use fetchstore::app::{AppConfig, FetchStoreApp};
//!
//! // Start the application
//! let app = FetchStoreApp::start(AppConfig::load()?).await?;
//!
//! // Use the tracker
//! let tracker = app.tracker();
//!
//! // Teardown
//! app.shutdown();
//! ```

mod bootstrap;
mod config;
mod error;

pub use bootstrap::FetchStoreApp;
pub use config::{AppConfig, TransferConfig, DEFAULT_APP_NAME, DEFAULT_TRANSFER_TIMEOUT_SECS};
pub use error::AppError;
