//! JobRun: one execution instance of a CI/CD job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRun {
    pub id: Uuid,
    pub job_id: Uuid,
    pub job_run_number: i64,
    pub status: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl JobRun {
    /// New run with a fresh id, created now, no status yet.
    pub fn new(job_id: Uuid, job_run_number: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            job_id,
            job_run_number,
            status: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}
