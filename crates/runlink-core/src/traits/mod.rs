//! Storage contracts consumed by the correlation engine.
//!
//! These traits define the contract between correlation logic and the
//! underlying store. The SQLite implementation lives in `runlink-storage`.
//! All traits are object-safe, `Send + Sync`, and have blanket `Arc<T>` impls.

pub mod artifact_repository;
pub mod job_run_repository;
pub mod mapping_store;
pub mod test_helpers;

pub use artifact_repository::IArtifactRepository;
pub use job_run_repository::IJobRunRepository;
pub use mapping_store::IMappingStore;
