//! CLI command implementations.
//!
//! Each command module exposes its clap argument types and a `run`
//! function taking the resolved application configuration.

pub mod dirs;
pub mod fetch;
pub mod info;
pub mod store;
