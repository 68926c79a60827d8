//! RecoveryAction: what a caller should do when a storage operation fails.
//!
//! Advisory only. Nothing in runlink retries on its own; callers that persist
//! correlation output decide their own retry policy from this.

use std::fmt;

use super::StorageError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Transient failure like SQLITE_BUSY.
    Retry,
    /// Bad data or a bug. Must reach a human.
    Escalate,
}

impl RecoveryAction {
    pub fn for_error(error: &StorageError) -> Self {
        match error {
            StorageError::DbBusy => Self::Retry,
            StorageError::Sqlite { .. } => Self::Retry,
            StorageError::LockPoisoned { .. } => Self::Escalate,
            StorageError::MigrationFailed { .. } => Self::Escalate,
            StorageError::ContractViolation { .. } => Self::Escalate,
            StorageError::Serialization { .. } => Self::Escalate,
        }
    }
}

impl fmt::Display for RecoveryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Retry => write!(f, "Retry"),
            Self::Escalate => write!(f, "Escalate"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busy_is_retryable() {
        assert_eq!(RecoveryAction::for_error(&StorageError::DbBusy), RecoveryAction::Retry);
    }

    #[test]
    fn test_contract_violation_escalates() {
        let err = StorageError::contract("cicd_job_run_artifacts", "NULL owner");
        assert_eq!(RecoveryAction::for_error(&err), RecoveryAction::Escalate);
        assert_eq!(RecoveryAction::Escalate.to_string(), "Escalate");
    }
}
