//! Shared integration-test server bootstrap helpers.

use axum_test::TestServer;
use crazypaste_core::ManualClock;
use crazypaste_server::{create_app, AppState, Config, Database};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// 2024-01-01T00:00:00Z in epoch milliseconds.
pub(crate) const T0: i64 = 1_704_067_200_000;
pub(crate) const MINUTE: i64 = 60_000;

pub(crate) struct TestApp {
    pub server: TestServer,
    pub clock: Arc<ManualClock>,
    pub db: Arc<Database>,
    _temp: TempDir,
}

pub(crate) fn test_config_for_db_path(db_path: &Path) -> Config {
    Config {
        port: 0,
        db_path: db_path.to_str().expect("db path").to_string(),
        max_paste_size: 1024,
        auto_backup: false,
        recent_exclude_burn: true,
        recent_exclude_protected: true,
        sweep_interval_secs: 0,
    }
}

pub(crate) fn setup_with_config<F>(adjust: F) -> TestApp
where
    F: FnOnce(&mut Config),
{
    let temp = TempDir::new().expect("temp dir");
    let mut config = test_config_for_db_path(&temp.path().join("test.db"));
    adjust(&mut config);

    let clock = Arc::new(ManualClock::new(T0));
    let db = Database::with_clock(&config.db_path, clock.clone()).expect("open db");
    let state = AppState::new(config, db);
    let db = state.db.clone();
    let server = TestServer::new(create_app(state, false)).expect("server");
    TestApp {
        server,
        clock,
        db,
        _temp: temp,
    }
}

pub(crate) fn setup_test_server() -> TestApp {
    setup_with_config(|_| {})
}
