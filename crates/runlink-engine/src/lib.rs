//! # runlink-engine
//!
//! Decides which CI/CD job runs are related because they produced or consumed
//! the same artifact. Four independently toggled strategies (identity, hash,
//! name+qualifier, name+qualifier+location) feed two query modes:
//!
//! - `CorrelationEngine::correlated_runs`: a paged bulk sweep returning each
//!   run's closed one-hop neighborhood (never a transitive closure).
//! - `CorrelationEngine::individual_correlations`: a flat, symmetric edge list
//!   for one run.
//!
//! `MappingService` writes results into an `IMappingStore`.

pub mod engine;
pub mod errors;
pub mod index;
pub mod mapping;
pub mod strategy;
pub mod sweep;

pub use engine::CorrelationEngine;
pub use errors::{CorrelationError, CorrelationResult};
pub use mapping::{MappingService, RefreshReport};
pub use sweep::SweepSnapshot;
