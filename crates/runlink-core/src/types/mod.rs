//! Shared data structures (no correlation logic).

pub mod artifact;
pub mod filter;
pub mod job_run;
pub mod mapping;
pub mod settings;

pub use artifact::Artifact;
pub use filter::ArtifactFilter;
pub use job_run::JobRun;
pub use mapping::IntermediateMapping;
pub use settings::{CorrelationSettings, MatchStrategy};
