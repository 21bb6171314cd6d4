//! Shared constants used across CrazyPaste crates.

/// Default API port for CrazyPaste.
pub const DEFAULT_PORT: u16 = 38421;

/// Default maximum paste size accepted by the API layer.
pub const DEFAULT_MAX_PASTE_SIZE: usize = 10 * 1024 * 1024;

/// Default number of entries returned by the recent-pastes listing.
pub const DEFAULT_RECENT_LIMIT: usize = 10;
/// Upper bound applied to caller-supplied recent limits at the HTTP layer.
pub const MAX_RECENT_LIMIT: usize = 100;

/// Title stored when a paste is created without one.
pub const DEFAULT_TITLE: &str = "Untitled Paste";
/// Language marker stored when a paste is created without one.
pub const PLAIN_TEXT_LANGUAGE: &str = "plaintext";

/// Length of generated paste identifiers.
pub const PASTE_ID_LEN: usize = 8;

/// Default base URL for CLI/API clients.
pub const DEFAULT_CLI_SERVER_URL: &str = "http://localhost:38421";
