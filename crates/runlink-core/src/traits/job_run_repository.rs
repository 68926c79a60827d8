//! `IJobRunRepository`: Resolves run ids to runs.

use std::sync::Arc;

use uuid::Uuid;

use crate::errors::StorageResult;
use crate::types::JobRun;

pub trait IJobRunRepository: Send + Sync {
    fn insert_job_run(&self, tenant: &str, run: &JobRun) -> StorageResult<Uuid>;

    /// `Ok(None)` for an unknown id.
    fn get_job_run(&self, tenant: &str, id: Uuid) -> StorageResult<Option<JobRun>>;

    /// Every run id of the tenant, ascending.
    fn list_job_run_ids(&self, tenant: &str) -> StorageResult<Vec<Uuid>>;
}

// ─── Arc blanket impl ───────────────────────────────────────────────

impl<T: IJobRunRepository + ?Sized> IJobRunRepository for Arc<T> {
    fn insert_job_run(&self, tenant: &str, run: &JobRun) -> StorageResult<Uuid> {
        (**self).insert_job_run(tenant, run)
    }
    fn get_job_run(&self, tenant: &str, id: Uuid) -> StorageResult<Option<JobRun>> {
        (**self).get_job_run(tenant, id)
    }
    fn list_job_run_ids(&self, tenant: &str) -> StorageResult<Vec<Uuid>> {
        (**self).list_job_run_ids(tenant)
    }
}
