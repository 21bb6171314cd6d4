//! Shared test-only helpers for crazypaste_core.

use crate::clock::ManualClock;
use crate::models::paste::CreatePasteRequest;
use crate::Database;
use std::sync::Arc;
use tempfile::TempDir;

/// Fixed starting point for manual clocks (2024-01-01T00:00:00Z).
pub(crate) const T0: i64 = 1_704_067_200_000;

/// Creates an isolated temporary database on a manual clock.
///
/// Keep the [`TempDir`] alive for the full test to preserve the backing files.
///
/// # Panics
/// Panics if temp-dir creation, path conversion, or database initialization
/// fails in the test environment.
pub(crate) fn setup_temp_db() -> (Database, Arc<ManualClock>, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let db_path = temp_dir.path().join("test.db");
    let clock = Arc::new(ManualClock::new(T0));
    let db = Database::with_clock(db_path.to_str().expect("db path"), clock.clone()).expect("db");
    (db, clock, temp_dir)
}

/// Minimal creation request with `content`.
pub(crate) fn request(content: &str) -> CreatePasteRequest {
    CreatePasteRequest {
        content: content.to_string(),
        ..Default::default()
    }
}

/// Creation request with an expiration selector.
pub(crate) fn request_expiring(content: &str, selector: &str) -> CreatePasteRequest {
    CreatePasteRequest {
        expiration: Some(selector.to_string()),
        ..request(content)
    }
}
