//! Artifact: an input or output object (image, package, binary) attached to a job run.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A build/deployment artifact owned by exactly one job run.
///
/// Only `id`, `job_run_id`, `name`, `qualifier`, `location` and `hash` take part
/// in correlation. The remaining fields are stored and returned unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub id: Uuid,
    /// Owning job run. Never null once read from a repository.
    pub job_run_id: Uuid,
    pub name: Option<String>,
    pub qualifier: Option<String>,
    pub location: Option<String>,
    pub hash: Option<String>,
    /// Free-form kind, e.g. "container" or "package".
    pub artifact_type: Option<String>,
    pub input: bool,
    pub output: bool,
    pub metadata: serde_json::Value,
}

impl Artifact {
    /// Create an artifact with a fresh id and no identifying fields.
    pub fn new(job_run_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            job_run_id,
            name: None,
            qualifier: None,
            location: None,
            hash: None,
            artifact_type: None,
            input: false,
            output: false,
            metadata: serde_json::Value::Object(serde_json::Map::new()),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = Some(qualifier.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }

    pub fn with_type(mut self, artifact_type: impl Into<String>) -> Self {
        self.artifact_type = Some(artifact_type.into());
        self
    }

    /// Mark the artifact as consumed (`input`) and/or produced (`output`) by its run.
    pub fn with_direction(mut self, input: bool, output: bool) -> Self {
        self.input = input;
        self.output = output;
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }
}
