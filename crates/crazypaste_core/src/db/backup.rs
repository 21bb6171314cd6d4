//! File-level backups of the redb database.

use super::redb_file_path;
use crate::error::AppError;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Backup manager for a configured database directory.
pub struct BackupManager {
    db_file: PathBuf,
}

impl BackupManager {
    /// Create a backup manager for the database directory `db_path`.
    pub fn new(db_path: &str) -> Self {
        Self {
            db_file: redb_file_path(db_path),
        }
    }

    /// Whether there is a database file to back up.
    pub fn has_database(&self) -> bool {
        self.db_file.exists()
    }

    /// Copy the database file next to itself with a timestamp suffix.
    ///
    /// Take backups before opening the database or after the last write
    /// transaction has committed.
    ///
    /// # Returns
    /// The backup path, or `None` when no database file exists yet.
    ///
    /// # Errors
    /// Returns an error if the clock is unusable or copying fails.
    pub fn create_backup(&self) -> Result<Option<PathBuf>, AppError> {
        if !self.has_database() {
            return Ok(None);
        }

        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|err| {
                AppError::StorageMessage(format!(
                    "Failed to compute backup timestamp from system clock: {}",
                    err
                ))
            })?
            .as_millis();
        let backup_path = self
            .db_file
            .with_extension(format!("redb.backup.{}", timestamp));

        std::fs::copy(&self.db_file, &backup_path).map_err(|err| {
            AppError::StorageMessage(format!(
                "Failed to copy {:?} to {:?}: {}",
                self.db_file, backup_path, err
            ))
        })?;
        tracing::info!("Created database backup at: {:?}", backup_path);
        Ok(Some(backup_path))
    }
}

#[cfg(test)]
mod tests {
    use super::BackupManager;
    use crate::models::paste::CreatePasteRequest;
    use crate::Database;
    use tempfile::TempDir;

    #[test]
    fn backup_of_missing_database_is_none() {
        let temp = TempDir::new().expect("temp dir");
        let manager = BackupManager::new(temp.path().join("db").to_str().expect("path"));
        assert!(manager.create_backup().expect("backup").is_none());
    }

    #[test]
    fn backup_copy_opens_with_same_pastes() {
        let temp = TempDir::new().expect("temp dir");
        let db_dir = temp.path().join("db");
        let db_dir = db_dir.to_str().expect("path");
        let id = {
            let db = Database::new(db_dir).expect("db");
            db.pastes
                .create(CreatePasteRequest {
                    content: "backed up".to_string(),
                    ..Default::default()
                })
                .expect("create")
                .id
        };

        let backup = BackupManager::new(db_dir)
            .create_backup()
            .expect("backup")
            .expect("backup path");

        let restored_dir = temp.path().join("restored");
        std::fs::create_dir_all(&restored_dir).expect("restored dir");
        std::fs::copy(&backup, restored_dir.join("data.redb")).expect("restore copy");
        let restored = Database::new(restored_dir.to_str().expect("path")).expect("restored db");
        let paste = restored.pastes.peek(&id).expect("peek").expect("paste");
        assert_eq!(paste.content, "backed up");
    }
}
