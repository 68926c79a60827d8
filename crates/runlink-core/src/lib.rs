//! # runlink-core
//!
//! Foundation crate for the runlink artifact correlation engine.
//! Defines the shared types, storage traits, errors, config, and tracing setup.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod errors;
pub mod tracing;
pub mod traits;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use config::RunlinkConfig;
pub use errors::error_code::RunlinkErrorCode;
pub use errors::{ConfigError, StorageError, StorageResult};
pub use types::{
    Artifact, ArtifactFilter, CorrelationSettings, IntermediateMapping, JobRun, MatchStrategy,
};
