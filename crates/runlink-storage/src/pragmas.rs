//! SQLite PRAGMA configuration for runlink connections.
//!
//! The pragma set is derived from `StorageConfig` and the connection's role,
//! then applied as one batch right after the connection opens.

use rusqlite::Connection;

use runlink_core::config::StorageConfig;
use runlink_core::errors::StorageResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionRole {
    /// The single read-write connection. Sets the journal mode for the file.
    Writer,
    /// Pooled read-only connection. Inherits the journal mode.
    Reader,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pragma {
    pub name: &'static str,
    pub value: String,
}

impl Pragma {
    fn new(name: &'static str, value: impl ToString) -> Self {
        Self {
            name,
            value: value.to_string(),
        }
    }
}

/// Pragmas for one connection, in application order.
pub fn pragma_set(config: &StorageConfig, role: ConnectionRole) -> Vec<Pragma> {
    let mut set = Vec::with_capacity(6);
    if role == ConnectionRole::Writer {
        set.push(Pragma::new("journal_mode", "WAL"));
        set.push(Pragma::new("synchronous", "NORMAL"));
    }
    // Artifact owners must exist.
    set.push(Pragma::new("foreign_keys", "ON"));
    set.push(Pragma::new("busy_timeout", config.busy_timeout_ms));
    // Negative cache_size is in KiB rather than pages.
    set.push(Pragma::new("cache_size", -i64::from(config.cache_size_kib)));
    set.push(Pragma::new("temp_store", "MEMORY"));
    if role == ConnectionRole::Reader {
        set.push(Pragma::new("query_only", "ON"));
    }
    set
}

/// Apply the pragma set for `role` to a freshly opened connection.
pub fn configure(conn: &Connection, config: &StorageConfig, role: ConnectionRole) -> StorageResult<()> {
    let batch: String = pragma_set(config, role)
        .iter()
        .map(|p| format!("PRAGMA {} = {};\n", p.name, p.value))
        .collect();
    conn.execute_batch(&batch)?;
    Ok(())
}
