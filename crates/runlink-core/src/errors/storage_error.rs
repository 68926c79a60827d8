//! Storage-layer errors for repository and mapping-store operations.

use super::error_code::{self, RunlinkErrorCode};

/// Errors raised by the artifact/job-run repositories and the mapping store.
///
/// The correlation engine passes these through untouched as its distinguished
/// storage failure; it never retries.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    Sqlite { message: String },

    #[error("Migration failed at version {version}: {message}")]
    MigrationFailed { version: u32, message: String },

    #[error("Database busy (another operation in progress)")]
    DbBusy,

    /// A stored row breaks the repository contract (NULL owner run, malformed id).
    #[error("Contract violation in {table}: {reason}")]
    ContractViolation { table: String, reason: String },

    #[error("Connection lock poisoned: {message}")]
    LockPoisoned { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

/// Convenience type alias.
pub type StorageResult<T> = Result<T, StorageError>;

impl StorageError {
    pub fn contract(table: &str, reason: impl Into<String>) -> Self {
        Self::ContractViolation {
            table: table.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        match e {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: rusqlite::ffi::ErrorCode::DatabaseBusy,
                    ..
                },
                _,
            ) => Self::DbBusy,
            other => Self::Sqlite {
                message: other.to_string(),
            },
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization {
            message: e.to_string(),
        }
    }
}

impl RunlinkErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DbBusy => error_code::DB_BUSY,
            Self::MigrationFailed { .. } => error_code::MIGRATION_FAILED,
            Self::ContractViolation { .. } => error_code::CONTRACT_VIOLATION,
            Self::LockPoisoned { .. } => error_code::LOCK_POISONED,
            Self::Serialization { .. } => error_code::SERIALIZATION_ERROR,
            Self::Sqlite { .. } => error_code::STORAGE_ERROR,
        }
    }
}
