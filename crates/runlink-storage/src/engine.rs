//! RunlinkStorageEngine: SQLite implementation of the three storage traits.
//!
//! Each trait method delegates to a free function in `queries/`, routed
//! through the pool: writes to the writer, reads round-robin to readers.

use std::path::Path;

use tracing::{debug, info};
use uuid::Uuid;

use runlink_core::config::StorageConfig;
use runlink_core::errors::{StorageError, StorageResult};
use runlink_core::traits::{IArtifactRepository, IJobRunRepository, IMappingStore};
use runlink_core::types::{Artifact, ArtifactFilter, IntermediateMapping, JobRun};

use crate::migrations;
use crate::pool::ConnectionPool;
use crate::queries::{artifacts, job_runs, mappings};

pub struct RunlinkStorageEngine {
    pool: ConnectionPool,
}

impl RunlinkStorageEngine {
    /// Open a file-backed engine with default pool settings.
    pub fn open(path: &Path) -> StorageResult<Self> {
        Self::open_with_config(&StorageConfig {
            db_path: Some(path.to_path_buf()),
            ..StorageConfig::default()
        })
    }

    /// Open according to `[storage]` config. No `db_path` means in-memory.
    pub fn open_with_config(config: &StorageConfig) -> StorageResult<Self> {
        let pool = match &config.db_path {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent).map_err(|e| StorageError::Sqlite {
                        message: format!("failed to create {}: {e}", parent.display()),
                    })?;
                }
                let pool = ConnectionPool::open(path, config)?;
                info!(path = %path.display(), readers = pool.reader_count(), "opened runlink database");
                pool
            }
            None => ConnectionPool::open_in_memory(config)?,
        };
        let engine = Self { pool };
        engine.initialize()?;
        Ok(engine)
    }

    /// Open an in-memory engine (for testing).
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::open_with_config(&StorageConfig::default())
    }

    fn initialize(&self) -> StorageResult<()> {
        self.pool.with_writer(|conn| migrations::migrate(conn).map(|_| ()))
    }

    /// Execute a closure with the writer connection.
    ///
    /// Prefer trait methods for normal usage.
    pub fn with_writer<F, T>(&self, f: F) -> StorageResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> StorageResult<T>,
    {
        self.pool.with_writer(f)
    }

    pub fn with_reader<F, T>(&self, f: F) -> StorageResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> StorageResult<T>,
    {
        self.pool.with_reader(f)
    }

    pub fn is_wal_mode(&self) -> bool {
        self.pool.is_wal_mode()
    }
}

impl IArtifactRepository for RunlinkStorageEngine {
    fn insert_artifact(&self, tenant: &str, artifact: &Artifact) -> StorageResult<Uuid> {
        self.pool
            .with_writer(|conn| artifacts::insert_artifact(conn, tenant, artifact))?;
        Ok(artifact.id)
    }

    fn replace_artifacts(
        &self,
        tenant: &str,
        job_run_id: Uuid,
        list: &[Artifact],
    ) -> StorageResult<Vec<Uuid>> {
        let ids = self
            .pool
            .with_writer(|conn| artifacts::replace_artifacts(conn, tenant, job_run_id, list))?;
        debug!(tenant, %job_run_id, count = ids.len(), "replaced artifacts");
        Ok(ids)
    }

    fn get_artifact(&self, tenant: &str, id: Uuid) -> StorageResult<Option<Artifact>> {
        self.pool
            .with_reader(|conn| artifacts::get_artifact(conn, tenant, id))
    }

    fn list_artifacts(
        &self,
        tenant: &str,
        filter: &ArtifactFilter,
        offset: usize,
        limit: usize,
    ) -> StorageResult<Vec<Artifact>> {
        self.pool
            .with_reader(|conn| artifacts::list_artifacts(conn, tenant, filter, offset, limit))
    }

    fn count_artifacts(&self, tenant: &str, filter: &ArtifactFilter) -> StorageResult<u64> {
        self.pool
            .with_reader(|conn| artifacts::count_artifacts(conn, tenant, filter))
    }
}

impl IJobRunRepository for RunlinkStorageEngine {
    fn insert_job_run(&self, tenant: &str, run: &JobRun) -> StorageResult<Uuid> {
        self.pool
            .with_writer(|conn| job_runs::insert_job_run(conn, tenant, run))?;
        Ok(run.id)
    }

    fn get_job_run(&self, tenant: &str, id: Uuid) -> StorageResult<Option<JobRun>> {
        self.pool
            .with_reader(|conn| job_runs::get_job_run(conn, tenant, id))
    }

    fn list_job_run_ids(&self, tenant: &str) -> StorageResult<Vec<Uuid>> {
        self.pool
            .with_reader(|conn| job_runs::list_job_run_ids(conn, tenant))
    }
}

impl IMappingStore for RunlinkStorageEngine {
    fn upsert_mapping(&self, tenant: &str, mapping: &IntermediateMapping) -> StorageResult<()> {
        self.pool
            .with_writer(|conn| mappings::upsert_mapping(conn, tenant, mapping))
    }

    fn replace_mapping(&self, tenant: &str, mapping: &IntermediateMapping) -> StorageResult<()> {
        self.pool
            .with_writer(|conn| mappings::replace_mapping(conn, tenant, mapping))
    }

    fn get_mapping(
        &self,
        tenant: &str,
        anchor_run_id: Uuid,
    ) -> StorageResult<Option<IntermediateMapping>> {
        self.pool
            .with_reader(|conn| mappings::get_mapping(conn, tenant, anchor_run_id))
    }

    fn list_mappings(
        &self,
        tenant: &str,
        offset: usize,
        limit: usize,
    ) -> StorageResult<Vec<IntermediateMapping>> {
        self.pool
            .with_reader(|conn| mappings::list_mappings(conn, tenant, offset, limit))
    }

    fn delete_mappings_for_run(&self, tenant: &str, run_id: Uuid) -> StorageResult<usize> {
        self.pool
            .with_writer(|conn| mappings::delete_mappings_for_run(conn, tenant, run_id))
    }

    fn count_mappings(&self, tenant: &str) -> StorageResult<u64> {
        self.pool
            .with_reader(|conn| mappings::count_mappings(conn, tenant))
    }
}
