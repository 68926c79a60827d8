//! `InMemoryRunlinkStore`: In-memory test double for all three storage traits.
//!
//! Used by engine tests and property tests to avoid SQLite round-trips.
//! Follows the same ordering contracts as the SQLite implementation.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use uuid::Uuid;

use crate::errors::{StorageError, StorageResult};
use crate::types::{Artifact, ArtifactFilter, IntermediateMapping, JobRun};

use super::{IArtifactRepository, IJobRunRepository, IMappingStore};

#[derive(Default)]
struct TenantData {
    runs: BTreeMap<Uuid, JobRun>,
    artifacts: Vec<Artifact>,
    mappings: BTreeMap<Uuid, BTreeSet<Uuid>>,
}

/// In-memory store. Set `fail_reads` to make every read return `DbBusy`.
#[derive(Default)]
pub struct InMemoryRunlinkStore {
    tenants: Mutex<HashMap<String, TenantData>>,
    fail_reads: AtomicBool,
}

impl InMemoryRunlinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent read fail with `StorageError::DbBusy`.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, HashMap<String, TenantData>>> {
        self.tenants.lock().map_err(|e| StorageError::LockPoisoned {
            message: e.to_string(),
        })
    }

    fn check_read(&self) -> StorageResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::DbBusy);
        }
        Ok(())
    }
}

impl IArtifactRepository for InMemoryRunlinkStore {
    fn insert_artifact(&self, tenant: &str, artifact: &Artifact) -> StorageResult<Uuid> {
        let mut tenants = self.lock()?;
        let data = tenants.entry(tenant.to_string()).or_default();
        if data.artifacts.iter().any(|a| a.id == artifact.id) {
            return Err(StorageError::Sqlite {
                message: format!("duplicate artifact id {}", artifact.id),
            });
        }
        data.artifacts.push(artifact.clone());
        Ok(artifact.id)
    }

    fn replace_artifacts(
        &self,
        tenant: &str,
        job_run_id: Uuid,
        artifacts: &[Artifact],
    ) -> StorageResult<Vec<Uuid>> {
        let mut tenants = self.lock()?;
        let data = tenants.entry(tenant.to_string()).or_default();
        data.artifacts.retain(|a| a.job_run_id != job_run_id);
        let mut ids = Vec::with_capacity(artifacts.len());
        for artifact in artifacts {
            let mut owned = artifact.clone();
            owned.job_run_id = job_run_id;
            ids.push(owned.id);
            data.artifacts.push(owned);
        }
        Ok(ids)
    }

    fn get_artifact(&self, tenant: &str, id: Uuid) -> StorageResult<Option<Artifact>> {
        self.check_read()?;
        let tenants = self.lock()?;
        Ok(tenants
            .get(tenant)
            .and_then(|d| d.artifacts.iter().find(|a| a.id == id).cloned()))
    }

    fn list_artifacts(
        &self,
        tenant: &str,
        filter: &ArtifactFilter,
        offset: usize,
        limit: usize,
    ) -> StorageResult<Vec<Artifact>> {
        self.check_read()?;
        let tenants = self.lock()?;
        let Some(data) = tenants.get(tenant) else {
            return Ok(Vec::new());
        };
        let mut matching: Vec<&Artifact> =
            data.artifacts.iter().filter(|a| filter.matches(a)).collect();
        matching.sort_by_key(|a| (a.job_run_id, a.id));
        Ok(matching.into_iter().skip(offset).take(limit).cloned().collect())
    }

    fn count_artifacts(&self, tenant: &str, filter: &ArtifactFilter) -> StorageResult<u64> {
        self.check_read()?;
        let tenants = self.lock()?;
        Ok(tenants.get(tenant).map_or(0, |d| {
            d.artifacts.iter().filter(|a| filter.matches(a)).count() as u64
        }))
    }
}

impl IJobRunRepository for InMemoryRunlinkStore {
    fn insert_job_run(&self, tenant: &str, run: &JobRun) -> StorageResult<Uuid> {
        let mut tenants = self.lock()?;
        let data = tenants.entry(tenant.to_string()).or_default();
        data.runs.insert(run.id, run.clone());
        Ok(run.id)
    }

    fn get_job_run(&self, tenant: &str, id: Uuid) -> StorageResult<Option<JobRun>> {
        self.check_read()?;
        let tenants = self.lock()?;
        Ok(tenants.get(tenant).and_then(|d| d.runs.get(&id).cloned()))
    }

    fn list_job_run_ids(&self, tenant: &str) -> StorageResult<Vec<Uuid>> {
        self.check_read()?;
        let tenants = self.lock()?;
        Ok(tenants
            .get(tenant)
            .map(|d| d.runs.keys().copied().collect())
            .unwrap_or_default())
    }
}

impl IMappingStore for InMemoryRunlinkStore {
    fn upsert_mapping(&self, tenant: &str, mapping: &IntermediateMapping) -> StorageResult<()> {
        let mut tenants = self.lock()?;
        let data = tenants.entry(tenant.to_string()).or_default();
        data.mappings
            .entry(mapping.anchor_run_id)
            .or_default()
            .extend(mapping.correlated_run_ids.iter().copied());
        Ok(())
    }

    fn replace_mapping(&self, tenant: &str, mapping: &IntermediateMapping) -> StorageResult<()> {
        let mut tenants = self.lock()?;
        let data = tenants.entry(tenant.to_string()).or_default();
        data.mappings
            .insert(mapping.anchor_run_id, mapping.correlated_run_ids.clone());
        Ok(())
    }

    fn get_mapping(
        &self,
        tenant: &str,
        anchor_run_id: Uuid,
    ) -> StorageResult<Option<IntermediateMapping>> {
        self.check_read()?;
        let tenants = self.lock()?;
        Ok(tenants
            .get(tenant)
            .and_then(|d| d.mappings.get(&anchor_run_id))
            .filter(|set| !set.is_empty())
            .map(|set| IntermediateMapping::new(anchor_run_id, set.iter().copied())))
    }

    fn list_mappings(
        &self,
        tenant: &str,
        offset: usize,
        limit: usize,
    ) -> StorageResult<Vec<IntermediateMapping>> {
        self.check_read()?;
        let tenants = self.lock()?;
        Ok(tenants
            .get(tenant)
            .map(|d| {
                d.mappings
                    .iter()
                    .filter(|(_, set)| !set.is_empty())
                    .skip(offset)
                    .take(limit)
                    .map(|(anchor, set)| IntermediateMapping::new(*anchor, set.iter().copied()))
                    .collect()
            })
            .unwrap_or_default())
    }

    fn delete_mappings_for_run(&self, tenant: &str, run_id: Uuid) -> StorageResult<usize> {
        let mut tenants = self.lock()?;
        let Some(data) = tenants.get_mut(tenant) else {
            return Ok(0);
        };
        let mut removed = data.mappings.remove(&run_id).map_or(0, |set| set.len());
        for set in data.mappings.values_mut() {
            if set.remove(&run_id) {
                removed += 1;
            }
        }
        data.mappings.retain(|_, set| !set.is_empty());
        Ok(removed)
    }

    fn count_mappings(&self, tenant: &str) -> StorageResult<u64> {
        self.check_read()?;
        let tenants = self.lock()?;
        Ok(tenants.get(tenant).map_or(0, |d| {
            d.mappings.values().filter(|set| !set.is_empty()).count() as u64
        }))
    }
}
