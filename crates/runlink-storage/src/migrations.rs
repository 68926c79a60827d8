//! Schema versioning.
//!
//! - Version lives in a dedicated single-row `runlink_schema_version` table
//! - Each version bump is a const SQL string in schema.rs
//! - `migrate` is idempotent and runs on every engine open

use rusqlite::Connection;
use tracing::info;

use runlink_core::errors::{StorageError, StorageResult};

use super::schema::RUNLINK_TABLES_V1;

/// Current schema version. Bump this when adding new migrations.
pub const CURRENT_VERSION: u32 = 1;

/// Schema version recorded in the database, 0 for a fresh file.
pub fn get_schema_version(conn: &Connection) -> StorageResult<u32> {
    let exists: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='runlink_schema_version'",
        [],
        |row| row.get(0),
    )?;
    if !exists {
        return Ok(0);
    }

    let result = conn.query_row(
        "SELECT version FROM runlink_schema_version LIMIT 1",
        [],
        |row| row.get::<_, u32>(0),
    );
    match result {
        Ok(version) => Ok(version),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(e) => Err(e.into()),
    }
}

fn set_schema_version(conn: &Connection, version: u32) -> StorageResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS runlink_schema_version (
            version INTEGER NOT NULL
        ) STRICT;",
    )?;
    conn.execute("DELETE FROM runlink_schema_version", [])?;
    conn.execute(
        "INSERT INTO runlink_schema_version (version) VALUES (?1)",
        rusqlite::params![version],
    )?;
    Ok(())
}

/// Run all pending migrations. Returns the version the database ends at.
pub fn migrate(conn: &Connection) -> StorageResult<u32> {
    let current = get_schema_version(conn)?;

    if current >= CURRENT_VERSION {
        return Ok(current);
    }

    if current < 1 {
        info!("Migrating runlink schema: 0 → 1 (initial tables)");
        conn.execute_batch(RUNLINK_TABLES_V1)
            .map_err(|e| StorageError::MigrationFailed {
                version: 1,
                message: e.to_string(),
            })?;
        set_schema_version(conn, 1)?;
    }

    let final_version = get_schema_version(conn)?;
    info!(from = current, to = final_version, "runlink schema migration complete");
    Ok(final_version)
}
