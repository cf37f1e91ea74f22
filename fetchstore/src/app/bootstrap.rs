//! Application bootstrap implementation.
//!
//! This module contains `FetchStoreApp` which handles the initialization
//! sequence: resolve the storage layout, open the backend (creating its
//! roots), then wire the download tracker over it.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Runtime;
use tracing::info;

use super::config::AppConfig;
use super::error::AppError;
use crate::download::{DownloadTracker, HttpTransport, Transport};
use crate::storage::{LocalStorage, Storage};

/// FetchStore application with proper service lifecycle management.
///
/// This struct ensures components come up in the correct order:
/// 1. Storage backend first (its roots must exist on disk)
/// 2. Transport, configured from the transfer settings
/// 3. The download tracker over both
///
/// # Example
///
/// ```ignore
/// use fetchstore::app::{AppConfig, FetchStoreApp};
///
/// let config = AppConfig::load()?;
/// let app = FetchStoreApp::start(config).await?;
///
/// let tracker = app.tracker();
/// tracker.download("https://example.com/report.pdf", "report.pdf").await;
/// ```
pub struct FetchStoreApp {
    /// The download tracker wired over storage and transport.
    tracker: Arc<DownloadTracker>,

    /// Storage backend, shared with the tracker.
    storage: Arc<dyn Storage>,

    /// Application configuration (retained for accessors).
    config: AppConfig,

    /// Optional owned runtime (when created via `start_sync()`).
    ///
    /// When the app is created via `start_sync()`, it owns its own Tokio
    /// runtime. When created via `start()`, this is `None` and the caller's
    /// runtime is used.
    runtime: Option<Runtime>,
}

impl FetchStoreApp {
    /// Start the application with the given configuration.
    ///
    /// Opens the storage backend and wires an HTTP transport configured
    /// from `config.transfer`.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage layout cannot be resolved or its
    /// roots cannot be created.
    pub async fn start(config: AppConfig) -> Result<Self, AppError> {
        Self::start_internal(config, None).await
    }

    /// Start the application with a caller-supplied transport.
    ///
    /// Used by embedders and tests that substitute the HTTP transport with
    /// their own [`Transport`] implementation.
    pub async fn start_with_transport(
        config: AppConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, AppError> {
        Self::start_internal(config, Some(transport)).await
    }

    /// Start the application synchronously (creates its own runtime).
    ///
    /// This method is useful when calling from a non-async context (like
    /// CLI commands). The runtime is kept alive for the lifetime of the
    /// `FetchStoreApp` instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime cannot be created or startup fails.
    pub fn start_sync(config: AppConfig) -> Result<Self, AppError> {
        // Create a dedicated runtime for the application
        let runtime = Runtime::new().map_err(|e| AppError::RuntimeCreation(e.to_string()))?;

        // Start on the runtime, then attach the runtime to the app
        let mut app = runtime.block_on(Self::start_internal(config, None))?;
        app.runtime = Some(runtime);

        Ok(app)
    }

    /// Internal start method used by both sync and async entry points.
    async fn start_internal(
        config: AppConfig,
        transport: Option<Arc<dyn Transport>>,
    ) -> Result<Self, AppError> {
        info!("Starting FetchStoreApp");

        // 1. Open the storage backend, creating its roots
        let layout = config.layout()?;
        let storage = LocalStorage::open(layout).await.map_err(AppError::Storage)?;

        info!(
            document_dir = %storage.document_dir().display(),
            cache_dir = %storage.cache_dir().display(),
            "Storage opened"
        );

        let storage: Arc<dyn Storage> = Arc::new(storage);

        // 2. Wire the transport
        let transport = match transport {
            Some(transport) => transport,
            None => {
                info!(
                    timeout_secs = config.transfer.timeout_secs,
                    "Using HTTP transport"
                );
                Arc::new(HttpTransport::with_timeout(Duration::from_secs(
                    config.transfer.timeout_secs,
                )))
            }
        };

        // 3. The tracker over both
        let tracker = DownloadTracker::new(Arc::clone(&storage), transport)
            .with_cache(config.transfer.cache_partial);

        info!(
            cache_partial = config.transfer.cache_partial,
            "Download tracker ready"
        );

        Ok(Self {
            tracker: Arc::new(tracker),
            storage,
            config,
            runtime: None, // Set by caller if sync
        })
    }

    /// Get the download tracker.
    ///
    /// The tracker is shared; clones observe the same download state.
    pub fn tracker(&self) -> Arc<DownloadTracker> {
        Arc::clone(&self.tracker)
    }

    /// Get the storage backend for direct access.
    pub fn storage(&self) -> Arc<dyn Storage> {
        Arc::clone(&self.storage)
    }

    /// Get the configuration the app was started with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get a handle to the application's Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called when:
    /// - The app was created via `start()` (async) and no external runtime
    ///   is active
    /// - The app was created via `start_sync()` but its runtime has been
    ///   dropped
    pub fn runtime_handle(&self) -> tokio::runtime::Handle {
        self.runtime
            .as_ref()
            .map(|r| r.handle().clone())
            .unwrap_or_else(|| {
                // If no owned runtime, try to get current runtime handle
                tokio::runtime::Handle::current()
            })
    }

    /// Shut the application down.
    ///
    /// Consumes the app, releasing the owned runtime if any. Must not be
    /// called from inside an async context when the app was created via
    /// `start_sync()`.
    pub fn shutdown(self) {
        info!("FetchStoreApp shutdown complete");
    }
}
