//! IntermediateMapping: one anchor run and the runs correlated with it.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Correlation result reported from `anchor_run_id`.
///
/// Equality is structural: same anchor and same set of runs, regardless of the
/// order in which runs were discovered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IntermediateMapping {
    pub anchor_run_id: Uuid,
    pub correlated_run_ids: BTreeSet<Uuid>,
}

impl IntermediateMapping {
    pub fn new(anchor_run_id: Uuid, correlated_run_ids: impl IntoIterator<Item = Uuid>) -> Self {
        Self {
            anchor_run_id,
            correlated_run_ids: correlated_run_ids.into_iter().collect(),
        }
    }

    /// `(run, {run})`: what the identity strategy emits.
    pub fn reflexive(run_id: Uuid) -> Self {
        Self::new(run_id, [run_id])
    }

    /// `(anchor, {other})`: a single directed edge.
    pub fn edge(anchor_run_id: Uuid, other_run_id: Uuid) -> Self {
        Self::new(anchor_run_id, [other_run_id])
    }

    pub fn contains(&self, run_id: &Uuid) -> bool {
        self.correlated_run_ids.contains(run_id)
    }
}
