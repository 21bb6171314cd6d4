//! HTTP request handlers.

/// Language table endpoint.
pub mod meta;
/// Paste-related endpoints.
pub mod paste;
