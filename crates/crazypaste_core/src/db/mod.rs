//! Database layer for CrazyPaste.

/// Backup utilities.
pub mod backup;
/// Paste storage operations.
pub mod paste;
/// redb table definitions.
pub mod tables;

use crate::clock::{Clock, SystemClock};
use crate::error::AppError;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Database handle with access to the paste store.
pub struct Database {
    pub db: Arc<redb::Database>,
    pub pastes: paste::PasteDb,
    path: PathBuf,
}

#[cfg(test)]
mod tests;

/// Resolve the redb file inside a configured database directory.
pub fn redb_file_path(db_dir: &str) -> PathBuf {
    Path::new(db_dir).join(tables::REDB_FILE_NAME)
}

impl Database {
    /// Open the database using the system clock.
    ///
    /// # Returns
    /// A fully initialized [`Database`].
    ///
    /// # Errors
    /// Returns [`AppError::Locked`] when another process holds the file, or a
    /// storage error when the file cannot be opened or initialized.
    pub fn new(path: &str) -> Result<Self, AppError> {
        Self::with_clock(path, Arc::new(SystemClock))
    }

    /// Open the database with an explicit time source.
    ///
    /// `path` is a directory; the redb file lives inside it.
    ///
    /// # Errors
    /// Same as [`Database::new`].
    pub fn with_clock(path: &str, clock: Arc<dyn Clock>) -> Result<Self, AppError> {
        std::fs::create_dir_all(path).map_err(|err| {
            AppError::StorageMessage(format!(
                "Failed to create database directory '{}': {}",
                path, err
            ))
        })?;

        let file = redb_file_path(path);
        let db = Arc::new(redb::Database::create(&file)?);
        tracing::debug!("Opened database at {}", file.display());

        Ok(Self {
            pastes: paste::PasteDb::new(db.clone(), clock)?,
            db,
            path: file,
        })
    }

    /// Clone this handle for another subsystem in the same process.
    ///
    /// Avoids a second `redb::Database::create`, which would fail on the
    /// file lock held by this process.
    ///
    /// # Errors
    /// Returns an error if table initialization fails.
    pub fn share(&self) -> Result<Self, AppError> {
        Ok(Self {
            pastes: paste::PasteDb::new(self.db.clone(), self.pastes.clock())?,
            db: self.db.clone(),
            path: self.path.clone(),
        })
    }

    /// Location of the redb file backing this handle.
    pub fn file_path(&self) -> &Path {
        &self.path
    }
}
