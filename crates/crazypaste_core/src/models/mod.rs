//! Data models.

/// Expiration selectors and timestamp mapping.
pub mod expiration;
/// Static language table.
pub mod language;
/// Paste record and read models.
pub mod paste;
