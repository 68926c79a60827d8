//! `IArtifactRepository`: Paginated/filtered artifact reads plus inserts.

use std::sync::Arc;

use uuid::Uuid;

use crate::errors::StorageResult;
use crate::types::{Artifact, ArtifactFilter};

/// Read/write access to the artifacts of a tenant.
///
/// Implementations must reject rows whose owning run id is NULL with
/// `StorageError::ContractViolation` instead of handing them to callers.
pub trait IArtifactRepository: Send + Sync {
    /// Insert one artifact. Returns its id.
    fn insert_artifact(&self, tenant: &str, artifact: &Artifact) -> StorageResult<Uuid>;

    /// Atomically replace every artifact of `job_run_id` with `artifacts`.
    /// Each artifact is stored under `job_run_id` whatever its own field says.
    /// Returns the ids of the inserted artifacts in input order.
    fn replace_artifacts(
        &self,
        tenant: &str,
        job_run_id: Uuid,
        artifacts: &[Artifact],
    ) -> StorageResult<Vec<Uuid>>;

    fn get_artifact(&self, tenant: &str, id: Uuid) -> StorageResult<Option<Artifact>>;

    /// One page of matching artifacts ordered by `(job_run_id, id)`.
    fn list_artifacts(
        &self,
        tenant: &str,
        filter: &ArtifactFilter,
        offset: usize,
        limit: usize,
    ) -> StorageResult<Vec<Artifact>>;

    fn count_artifacts(&self, tenant: &str, filter: &ArtifactFilter) -> StorageResult<u64>;
}

// ─── Arc blanket impl ───────────────────────────────────────────────

impl<T: IArtifactRepository + ?Sized> IArtifactRepository for Arc<T> {
    fn insert_artifact(&self, tenant: &str, artifact: &Artifact) -> StorageResult<Uuid> {
        (**self).insert_artifact(tenant, artifact)
    }
    fn replace_artifacts(
        &self,
        tenant: &str,
        job_run_id: Uuid,
        artifacts: &[Artifact],
    ) -> StorageResult<Vec<Uuid>> {
        (**self).replace_artifacts(tenant, job_run_id, artifacts)
    }
    fn get_artifact(&self, tenant: &str, id: Uuid) -> StorageResult<Option<Artifact>> {
        (**self).get_artifact(tenant, id)
    }
    fn list_artifacts(
        &self,
        tenant: &str,
        filter: &ArtifactFilter,
        offset: usize,
        limit: usize,
    ) -> StorageResult<Vec<Artifact>> {
        (**self).list_artifacts(tenant, filter, offset, limit)
    }
    fn count_artifacts(&self, tenant: &str, filter: &ArtifactFilter) -> StorageResult<u64> {
        (**self).count_artifacts(tenant, filter)
    }
}
