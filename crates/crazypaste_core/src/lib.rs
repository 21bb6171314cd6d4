//! Core domain library for CrazyPaste (config, storage, models).

/// Wall-clock abstraction used by expiration checks.
pub mod clock;
/// Configuration loading and defaults.
pub mod config;
/// Shared constants.
pub mod constants;
/// Database access layer.
pub mod db;
/// Application error types (storage/domain).
pub mod error;
/// Data models for requests, persistence, and read views.
pub mod models;

#[cfg(test)]
pub(crate) mod test_support;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use constants::*;
pub use db::Database;
pub use error::AppError;
