//! Bulk sweep: closed one-hop neighborhoods over a snapshot of artifacts.

use std::collections::BTreeSet;

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use tracing::debug;
use uuid::Uuid;

use runlink_core::types::{Artifact, CorrelationSettings, IntermediateMapping};

use crate::index::{Bucket, KeyGroups};

/// Artifacts, candidate anchors and key groups, loaded and indexed once
/// for a tenant.
///
/// Pages computed from the same snapshot are mutually consistent, which
/// is what a full refresh relies on. `page` only looks things up.
pub struct SweepSnapshot {
    /// Every artifact in the domain of at least one enabled keyed strategy.
    artifacts: Vec<Artifact>,
    /// Qualifying runs, ascending.
    candidates: Vec<Uuid>,
    /// One entry per enabled keyed strategy.
    groups: Vec<KeyGroups>,
    /// Positions of each run's artifacts.
    owned: FxHashMap<Uuid, Bucket>,
}

impl SweepSnapshot {
    /// `run_ids` is every run of the tenant when Identity is enabled and
    /// empty otherwise. Owners of `artifacts` always qualify.
    pub(crate) fn new(
        settings: CorrelationSettings,
        artifacts: Vec<Artifact>,
        run_ids: Vec<Uuid>,
    ) -> Self {
        let mut candidates: BTreeSet<Uuid> = run_ids.into_iter().collect();
        candidates.extend(artifacts.iter().map(|a| a.job_run_id));

        let groups: Vec<KeyGroups> = settings
            .keyed_strategies()
            .into_iter()
            .map(|strategy| KeyGroups::build(strategy, &artifacts))
            .collect();

        let mut owned: FxHashMap<Uuid, Bucket> = FxHashMap::default();
        for (pos, artifact) in artifacts.iter().enumerate() {
            owned.entry(artifact.job_run_id).or_default().push(pos);
        }

        debug!(
            candidates = candidates.len(),
            artifacts = artifacts.len(),
            keys = groups.iter().map(KeyGroups::group_count).sum::<usize>(),
            "sweep snapshot indexed"
        );
        Self {
            artifacts,
            candidates: candidates.into_iter().collect(),
            groups,
            owned,
        }
    }

    pub(crate) fn empty() -> Self {
        Self {
            artifacts: Vec::new(),
            candidates: Vec::new(),
            groups: Vec::new(),
            owned: FxHashMap::default(),
        }
    }

    /// Number of qualifying runs; the upper bound for paging.
    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    pub fn artifact_count(&self) -> usize {
        self.artifacts.len()
    }

    /// Neighborhoods of the anchors at `offset..offset + limit` of the
    /// candidate order. Edges are always computed against the whole
    /// snapshot; paging only selects which anchors are reported.
    pub fn page(&self, offset: usize, limit: usize) -> Vec<IntermediateMapping> {
        let anchors: Vec<Uuid> = self
            .candidates
            .iter()
            .skip(offset)
            .take(limit)
            .copied()
            .collect();

        anchors
            .par_iter()
            .map(|anchor| IntermediateMapping::new(*anchor, self.neighbors(*anchor)))
            .collect()
    }

    /// `anchor` plus the owner of every artifact sharing a key with one of
    /// its own artifacts.
    fn neighbors(&self, anchor: Uuid) -> BTreeSet<Uuid> {
        let mut neighbors = BTreeSet::from([anchor]);
        let own = self.owned.get(&anchor).map_or(&[][..], |v| v.as_slice());
        for groups in &self.groups {
            for &pos in own {
                for &other in groups.peers(pos) {
                    // A record never matches itself.
                    if other != pos {
                        neighbors.insert(self.artifacts[other].job_run_id);
                    }
                }
            }
        }
        neighbors
    }
}
