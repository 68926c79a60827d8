//! Stable error codes surfaced to callers and logs.

/// Implemented by every runlink error enum.
pub trait RunlinkErrorCode {
    fn error_code(&self) -> &'static str;
}

pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const DB_BUSY: &str = "DB_BUSY";
pub const MIGRATION_FAILED: &str = "MIGRATION_FAILED";
pub const CONTRACT_VIOLATION: &str = "CONTRACT_VIOLATION";
pub const LOCK_POISONED: &str = "LOCK_POISONED";
pub const SERIALIZATION_ERROR: &str = "SERIALIZATION_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
