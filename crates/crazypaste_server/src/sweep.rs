//! Periodic removal of expired pastes.
//!
//! Reads already delete expired pastes lazily; the sweep only keeps the
//! stored document from accumulating pastes nobody reads again.

use crate::Database;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Spawn a task that calls `sweep_expired` every `interval`.
///
/// Abort the returned handle to stop it.
pub fn spawn_expiry_sweeper(db: Arc<Database>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            run_sweep(db.clone()).await;
        }
    })
}

async fn run_sweep(db: Arc<Database>) {
    match tokio::task::spawn_blocking(move || db.pastes.sweep_expired()).await {
        Ok(Ok(0)) => {}
        Ok(Ok(removed)) => tracing::info!("Expiry sweep removed {} paste(s)", removed),
        Ok(Err(err)) => tracing::warn!("Expiry sweep failed: {}", err),
        Err(err) => tracing::error!("Expiry sweep task did not complete: {}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::spawn_expiry_sweeper;
    use crazypaste_core::models::paste::CreatePasteRequest;
    use crazypaste_core::{Database, ManualClock};
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;

    #[tokio::test]
    async fn sweeper_removes_expired_pastes_in_background() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("db");
        let clock = Arc::new(ManualClock::new(1_704_067_200_000));
        let db = Arc::new(
            Database::with_clock(path.to_str().expect("path"), clock.clone()).expect("db"),
        );
        let paste = db
            .pastes
            .create(CreatePasteRequest {
                content: "short lived".to_string(),
                expiration: Some("10m".to_string()),
                ..Default::default()
            })
            .expect("create");

        clock.advance_millis(11 * 60_000);
        let handle = spawn_expiry_sweeper(db.clone(), Duration::from_millis(10));

        let mut swept = false;
        for _ in 0..100 {
            tokio::time::sleep(Duration::from_millis(10)).await;
            let stored = db.pastes.export_json().expect("export");
            if !stored.contains(&paste.id) {
                swept = true;
                break;
            }
        }
        handle.abort();
        assert!(swept, "sweeper should remove the expired paste");
    }
}
