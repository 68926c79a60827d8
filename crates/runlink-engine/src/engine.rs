//! CorrelationEngine answers the bulk sweep and the single-run lookup
//! over the artifact and job-run repositories.
//!
//! Stateless and read-only. Storage errors pass through as
//! `CorrelationError::Storage`; the engine never retries.

use std::sync::Arc;

use rustc_hash::FxHashSet;
use tracing::debug;
use uuid::Uuid;

use runlink_core::traits::{IArtifactRepository, IJobRunRepository};
use runlink_core::types::{
    Artifact, ArtifactFilter, CorrelationSettings, IntermediateMapping, JobRun, MatchStrategy,
};

use crate::errors::CorrelationResult;
use crate::index::KeyIndex;
use crate::strategy::key_of;
use crate::sweep::SweepSnapshot;

/// Artifacts fetched per repository call.
pub const ARTIFACT_FETCH_PAGE: usize = 1000;

/// Own artifacts whose keys go into one candidate query.
const KEY_LOOKUP_CHUNK: usize = 200;

pub struct CorrelationEngine {
    artifacts: Arc<dyn IArtifactRepository>,
    job_runs: Arc<dyn IJobRunRepository>,
    settings: CorrelationSettings,
}

impl CorrelationEngine {
    pub fn new(
        artifacts: Arc<dyn IArtifactRepository>,
        job_runs: Arc<dyn IJobRunRepository>,
        settings: CorrelationSettings,
    ) -> Self {
        Self {
            artifacts,
            job_runs,
            settings,
        }
    }

    fn any_enabled(&self) -> bool {
        self.settings.identity || !self.settings.keyed_strategies().is_empty()
    }

    /// Bulk sweep: each run in `offset..offset + limit` of the ascending
    /// qualifying-run order, with its closed one-hop neighborhood.
    pub fn correlated_runs(
        &self,
        tenant: &str,
        offset: usize,
        limit: usize,
    ) -> CorrelationResult<Vec<IntermediateMapping>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let snapshot = self.snapshot(tenant)?;
        let page = snapshot.page(offset, limit);
        debug!(
            tenant,
            offset,
            limit,
            candidates = snapshot.candidate_count(),
            artifacts = snapshot.artifact_count(),
            anchors = page.len(),
            "bulk sweep"
        );
        Ok(page)
    }

    /// Load everything the sweep needs for `tenant` once. Pages of the
    /// returned snapshot are consistent with each other.
    pub fn snapshot(&self, tenant: &str) -> CorrelationResult<SweepSnapshot> {
        if !self.any_enabled() {
            return Ok(SweepSnapshot::empty());
        }

        let keyed = self.settings.keyed_strategies();
        let artifacts = if keyed.is_empty() {
            Vec::new()
        } else {
            self.fetch_all(tenant, &ArtifactFilter::in_domains(&keyed))?
        };
        let run_ids = if self.settings.identity {
            self.job_runs.list_job_run_ids(tenant)?
        } else {
            Vec::new()
        };
        Ok(SweepSnapshot::new(self.settings, artifacts, run_ids))
    }

    /// Single-run lookup: a flat, symmetric edge list for `job_run`.
    ///
    /// Emits `(R, {R})` when Identity is enabled, then for every enabled keyed
    /// strategy and every match of one of R's artifacts against an artifact
    /// `a'` of another run R', both `(R, {R'})` and `(R', {R})`. Matches whose
    /// `a'` id is in `exclude_artifact_ids` are skipped. Not deduplicated.
    pub fn individual_correlations(
        &self,
        tenant: &str,
        job_run: &JobRun,
        exclude_artifact_ids: &[Uuid],
    ) -> CorrelationResult<Vec<IntermediateMapping>> {
        self.individual_correlations_by_id(tenant, job_run.id, exclude_artifact_ids)
    }

    /// As `individual_correlations`, resolving the run by id. An unknown id
    /// yields an empty list.
    pub fn individual_correlations_by_id(
        &self,
        tenant: &str,
        run_id: Uuid,
        exclude_artifact_ids: &[Uuid],
    ) -> CorrelationResult<Vec<IntermediateMapping>> {
        if !self.any_enabled() {
            return Ok(Vec::new());
        }
        if self.job_runs.get_job_run(tenant, run_id)?.is_none() {
            debug!(tenant, %run_id, "unknown job run");
            return Ok(Vec::new());
        }

        let mut out = Vec::new();
        if self.settings.identity {
            out.push(IntermediateMapping::reflexive(run_id));
        }

        let keyed = self.settings.keyed_strategies();
        if keyed.is_empty() {
            return Ok(out);
        }

        let own = self.fetch_all(
            tenant,
            &ArtifactFilter::for_run(run_id).with_domains(&keyed),
        )?;
        let excluded: FxHashSet<Uuid> = exclude_artifact_ids.iter().copied().collect();

        for strategy in keyed {
            let own_in_domain: Vec<&Artifact> =
                own.iter().filter(|a| strategy.in_domain(a)).collect();
            if own_in_domain.is_empty() {
                continue;
            }
            let candidates = self.fetch_key_candidates(tenant, strategy, &own_in_domain)?;
            let index = KeyIndex::build(strategy, &candidates);

            let before = out.len();
            for artifact in &own_in_domain {
                let Some(key) = key_of(strategy, artifact) else {
                    continue;
                };
                for &pos in index.lookup(&key) {
                    let other = &candidates[pos];
                    if other.id == artifact.id
                        || other.job_run_id == run_id
                        || excluded.contains(&other.id)
                    {
                        continue;
                    }
                    out.push(IntermediateMapping::edge(run_id, other.job_run_id));
                    out.push(IntermediateMapping::edge(other.job_run_id, run_id));
                }
            }
            debug!(
                tenant,
                %run_id,
                strategy = strategy.name(),
                edges = (out.len() - before) / 2,
                "single-run lookup"
            );
        }
        Ok(out)
    }

    /// Every artifact matching `filter`, fetched page by page. Pages are
    /// keyset-chained on `(job_run_id, id)`, so no row is read twice.
    fn fetch_all(&self, tenant: &str, filter: &ArtifactFilter) -> CorrelationResult<Vec<Artifact>> {
        let mut all = Vec::new();
        let mut page_filter = filter.clone();
        loop {
            let page = self
                .artifacts
                .list_artifacts(tenant, &page_filter, 0, ARTIFACT_FETCH_PAGE)?;
            let fetched = page.len();
            if let Some(last) = page.last() {
                page_filter = page_filter.after(last);
            }
            all.extend(page);
            if fetched < ARTIFACT_FETCH_PAGE {
                break;
            }
        }
        Ok(all)
    }

    /// Artifacts that may share a `strategy` key with one of `own`.
    ///
    /// The repository filter is a superset (the name, qualifier and location
    /// lists are independent); exact key equality is checked by the index.
    /// Result is ordered by `(job_run_id, id)` without duplicates.
    fn fetch_key_candidates(
        &self,
        tenant: &str,
        strategy: MatchStrategy,
        own: &[&Artifact],
    ) -> CorrelationResult<Vec<Artifact>> {
        let mut candidates = Vec::new();
        for chunk in own.chunks(KEY_LOOKUP_CHUNK) {
            let filter = key_filter(strategy, chunk);
            candidates.extend(self.fetch_all(tenant, &filter)?);
        }
        candidates.sort_by_key(|a| (a.job_run_id, a.id));
        candidates.dedup_by_key(|a| a.id);
        Ok(candidates)
    }
}

/// Repository filter selecting every artifact whose `strategy` key could
/// equal the key of one of `own`.
fn key_filter(strategy: MatchStrategy, own: &[&Artifact]) -> ArtifactFilter {
    fn distinct(values: impl Iterator<Item = Option<String>>) -> Vec<String> {
        let mut out: Vec<String> = values.flatten().collect();
        out.sort();
        out.dedup();
        out
    }

    let mut filter = ArtifactFilter::in_domains(&[strategy]);
    match strategy {
        MatchStrategy::Identity => {}
        MatchStrategy::Hash => {
            filter.hashes = distinct(own.iter().map(|a| a.hash.clone()));
        }
        MatchStrategy::NameQualifier | MatchStrategy::NameQualifierLocation => {
            filter.names = distinct(own.iter().map(|a| a.name.clone()));
            filter.qualifiers = distinct(own.iter().map(|a| a.qualifier.clone()));
            if strategy == MatchStrategy::NameQualifierLocation {
                filter.locations = distinct(own.iter().map(|a| a.location.clone()));
            }
        }
    }
    filter
}
