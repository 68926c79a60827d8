//! # runlink-storage
//!
//! SQLite persistence for job runs, their artifacts, and stored correlation
//! mappings. `RunlinkStorageEngine` implements every `runlink-core` storage
//! trait over a WAL connection pool (1 writer, N read-only readers).

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod pragmas;
pub mod queries;
pub mod schema;

pub use engine::RunlinkStorageEngine;
pub use migrations::migrate;
pub use pragmas::{configure, ConnectionRole};
pub use schema::RUNLINK_TABLE_NAMES;
