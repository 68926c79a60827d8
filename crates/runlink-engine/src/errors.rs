//! Engine-level errors.

use runlink_core::errors::{ConfigError, RecoveryAction, StorageError};
use runlink_core::RunlinkErrorCode;

/// Failures surfaced by the correlation engine and mapping service.
///
/// Non-findings (disabled strategies, unknown runs, no artifacts) are empty
/// results, never errors.
#[derive(Debug, thiserror::Error)]
pub enum CorrelationError {
    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type CorrelationResult<T> = Result<T, CorrelationError>;

impl CorrelationError {
    /// Advisory only; the engine itself never retries.
    pub fn recovery_action(&self) -> RecoveryAction {
        match self {
            Self::Storage(e) => RecoveryAction::for_error(e),
            Self::Config(_) => RecoveryAction::Escalate,
        }
    }
}

impl RunlinkErrorCode for CorrelationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Storage(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
        }
    }
}
