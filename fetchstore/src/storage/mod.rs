//! Storage gateway over the device file system.
//!
//! This module defines the narrow [`Storage`] trait the rest of the crate
//! builds on, plus two backends:
//!
//! - [`LocalStorage`]: `tokio::fs` against real directories resolved from the
//!   platform (or supplied explicitly)
//! - [`MemoryStorage`]: a map-backed fake with identical semantics, for tests
//!   and embedders
//!
//! # Architecture
//!
//! ```text
//! DownloadTracker ────► Arc<dyn Storage> ────► LocalStorage (tokio::fs)
//!                                       └────► MemoryStorage (maps)
//!                              ▲
//!                       StorageLayout
//!                 (document / cache / bundle roots)
//! ```

mod layout;
mod local;
mod memory;
mod traits;

pub use layout::StorageLayout;
pub use local::LocalStorage;
pub use memory::MemoryStorage;
pub use traits::{uri_to_path, BoxFuture, Storage, StorageEntry, StorageError};
