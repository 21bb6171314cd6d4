//! Application error types for core storage and domain logic.
use thiserror::Error;

/// Top-level application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] redb::Error),

    #[error("Storage error: {0}")]
    StorageMessage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not found")]
    NotFound,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Password required")]
    PasswordRequired,

    #[error("Invalid password")]
    InvalidPassword,

    #[error("Locked: {0}")]
    Locked(String),
}

impl AppError {
    /// Whether the error came from the persistence layer rather than from the
    /// request itself.
    pub fn is_storage_failure(&self) -> bool {
        matches!(
            self,
            Self::Database(_) | Self::StorageMessage(_) | Self::Serialization(_)
        )
    }
}

impl From<redb::DatabaseError> for AppError {
    fn from(value: redb::DatabaseError) -> Self {
        match value {
            redb::DatabaseError::DatabaseAlreadyOpen => Self::Locked(
                "Another CrazyPaste instance already has the database open.\n\
                 Close it first, or set DB_PATH to use a different database location."
                    .to_string(),
            ),
            other => Self::Database(other.into()),
        }
    }
}

impl From<redb::TransactionError> for AppError {
    fn from(value: redb::TransactionError) -> Self {
        Self::Database(value.into())
    }
}

impl From<redb::TableError> for AppError {
    fn from(value: redb::TableError) -> Self {
        Self::Database(value.into())
    }
}

impl From<redb::StorageError> for AppError {
    fn from(value: redb::StorageError) -> Self {
        Self::Database(value.into())
    }
}

impl From<redb::CommitError> for AppError {
    fn from(value: redb::CommitError) -> Self {
        Self::Database(value.into())
    }
}

#[cfg(test)]
mod tests {
    use super::AppError;

    #[test]
    fn storage_failures_are_distinguishable_from_request_errors() {
        assert!(AppError::StorageMessage("disk full".to_string()).is_storage_failure());
        let parse_err = serde_json::from_str::<Vec<u8>>("not json").unwrap_err();
        assert!(AppError::from(parse_err).is_storage_failure());

        assert!(!AppError::NotFound.is_storage_failure());
        assert!(!AppError::BadRequest("empty".to_string()).is_storage_failure());
        assert!(!AppError::PasswordRequired.is_storage_failure());
    }

    #[test]
    fn already_open_database_maps_to_locked() {
        let err = AppError::from(redb::DatabaseError::DatabaseAlreadyOpen);
        assert!(matches!(err, AppError::Locked(_)));
    }
}
