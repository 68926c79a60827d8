//! Error types for runlink (thiserror), one enum per layer.

pub mod config_error;
pub mod error_code;
pub mod recovery;
pub mod storage_error;

pub use config_error::ConfigError;
pub use error_code::RunlinkErrorCode;
pub use recovery::RecoveryAction;
pub use storage_error::{StorageError, StorageResult};
