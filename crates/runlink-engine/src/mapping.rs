//! MappingService: Persists engine output into an `IMappingStore`.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use runlink_core::config::MappingConfig;
use runlink_core::errors::ConfigError;
use runlink_core::traits::IMappingStore;
use runlink_core::types::{IntermediateMapping, JobRun};
use runlink_core::RunlinkErrorCode;

use crate::engine::CorrelationEngine;
use crate::errors::{CorrelationError, CorrelationResult};

/// Outcome of `MappingService::refresh_all`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RefreshReport {
    /// Anchors whose stored mapping was overwritten.
    pub anchors: usize,
    /// Sweep pages processed.
    pub pages: usize,
}

pub struct MappingService {
    engine: CorrelationEngine,
    store: Arc<dyn IMappingStore>,
    sweep_page_size: usize,
}

impl MappingService {
    pub fn new(
        engine: CorrelationEngine,
        store: Arc<dyn IMappingStore>,
        config: &MappingConfig,
    ) -> CorrelationResult<Self> {
        if config.sweep_page_size == 0 {
            return Err(ConfigError::Invalid {
                field: "mapping.sweep_page_size".to_string(),
                reason: "must be at least 1".to_string(),
            }
            .into());
        }
        Ok(Self {
            engine,
            store,
            sweep_page_size: config.sweep_page_size,
        })
    }

    pub fn engine(&self) -> &CorrelationEngine {
        &self.engine
    }

    /// Correlate a run whose artifacts were just stored and union every
    /// emitted mapping into the store. `new_artifact_ids` are the ids of those
    /// artifacts, so the run is not re-matched through them.
    pub fn map_job_run(
        &self,
        tenant: &str,
        job_run: &JobRun,
        new_artifact_ids: &[Uuid],
    ) -> CorrelationResult<Vec<IntermediateMapping>> {
        let mappings = self
            .engine
            .individual_correlations(tenant, job_run, new_artifact_ids)?;
        for mapping in &mappings {
            self.store
                .upsert_mapping(tenant, mapping)
                .map_err(|e| write_failed(tenant, e))?;
        }
        debug!(tenant, run_id = %job_run.id, stored = mappings.len(), "mapped job run");
        Ok(mappings)
    }

    /// Recompute every anchor from one snapshot and overwrite its stored set.
    ///
    /// Anchors that no longer qualify keep whatever was stored before.
    pub fn refresh_all(&self, tenant: &str) -> CorrelationResult<RefreshReport> {
        let snapshot = self.engine.snapshot(tenant)?;
        let mut report = RefreshReport::default();
        let mut offset = 0;
        loop {
            let page = snapshot.page(offset, self.sweep_page_size);
            if page.is_empty() {
                break;
            }
            for mapping in &page {
                self.store
                    .replace_mapping(tenant, mapping)
                    .map_err(|e| write_failed(tenant, e))?;
            }
            report.anchors += page.len();
            report.pages += 1;
            if page.len() < self.sweep_page_size {
                break;
            }
            offset += page.len();
        }
        info!(tenant, anchors = report.anchors, pages = report.pages, "mapping refresh complete");
        Ok(report)
    }
}

fn write_failed(tenant: &str, err: impl Into<CorrelationError>) -> CorrelationError {
    let err = err.into();
    warn!(
        tenant,
        code = err.error_code(),
        action = %err.recovery_action(),
        "mapping store write failed: {err}"
    );
    err
}
