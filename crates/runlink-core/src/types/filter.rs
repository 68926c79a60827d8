//! ArtifactFilter: conjunctive filter for artifact repository reads.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::artifact::Artifact;
use super::settings::MatchStrategy;

/// Filter for `IArtifactRepository::list_artifacts`.
///
/// Every non-empty list is an `IN (...)` constraint and all constraints are
/// ANDed. `domains` is the exception: an artifact passes if it lies in the key
/// domain of at least one listed strategy (Identity is ignored). `after` is a
/// keyset cursor over the `(job_run_id, id)` listing order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactFilter {
    pub job_run_ids: Vec<Uuid>,
    pub ids: Vec<Uuid>,
    pub names: Vec<String>,
    pub qualifiers: Vec<String>,
    pub locations: Vec<String>,
    pub hashes: Vec<String>,
    pub types: Vec<String>,
    pub input: Option<bool>,
    pub output: Option<bool>,
    pub domains: Vec<MatchStrategy>,
    /// Only artifacts strictly after this `(job_run_id, id)` pass.
    pub after: Option<(Uuid, Uuid)>,
}

impl ArtifactFilter {
    /// Artifacts owned by one run.
    pub fn for_run(job_run_id: Uuid) -> Self {
        Self {
            job_run_ids: vec![job_run_id],
            ..Default::default()
        }
    }

    /// Artifacts that carry a usable key for any of `strategies`.
    pub fn in_domains(strategies: &[MatchStrategy]) -> Self {
        Self {
            domains: strategies.to_vec(),
            ..Default::default()
        }
    }

    pub fn with_domains(mut self, strategies: &[MatchStrategy]) -> Self {
        self.domains = strategies.to_vec();
        self
    }

    /// Continue a listing after `last`, the final artifact of the previous page.
    pub fn after(mut self, last: &Artifact) -> Self {
        self.after = Some((last.job_run_id, last.id));
        self
    }

    /// In-process evaluation of the filter. SQL backends translate the same
    /// rules into a WHERE clause.
    pub fn matches(&self, artifact: &Artifact) -> bool {
        fn listed<T: PartialEq>(list: &[T], value: &T) -> bool {
            list.is_empty() || list.contains(value)
        }
        fn listed_opt(list: &[String], value: &Option<String>) -> bool {
            list.is_empty() || value.as_ref().is_some_and(|v| list.contains(v))
        }

        let keyed: Vec<MatchStrategy> = self
            .domains
            .iter()
            .copied()
            .filter(|s| *s != MatchStrategy::Identity)
            .collect();

        listed(&self.job_run_ids, &artifact.job_run_id)
            && listed(&self.ids, &artifact.id)
            && listed_opt(&self.names, &artifact.name)
            && listed_opt(&self.qualifiers, &artifact.qualifier)
            && listed_opt(&self.locations, &artifact.location)
            && listed_opt(&self.hashes, &artifact.hash)
            && listed_opt(&self.types, &artifact.artifact_type)
            && self.input.map_or(true, |v| v == artifact.input)
            && self.output.map_or(true, |v| v == artifact.output)
            && (keyed.is_empty() || keyed.iter().any(|s| s.in_domain(artifact)))
            && self
                .after
                .map_or(true, |after| (artifact.job_run_id, artifact.id) > after)
    }
}
