//! ConnectionPool: Writer + read pool with round-robin selection.
//!
//! The only place in the storage crate that holds `Mutex<Connection>`.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use rusqlite::Connection;

use runlink_core::config::StorageConfig;
use runlink_core::errors::{StorageError, StorageResult};

use crate::pragmas::{self, ConnectionRole};

/// Default number of reader connections.
const DEFAULT_READ_POOL_SIZE: usize = 2;

/// Connection pool: 1 writer + N read-only readers.
pub struct ConnectionPool {
    writer: Mutex<Connection>,
    readers: Vec<Mutex<Connection>>,
    read_index: AtomicUsize,
}

impl ConnectionPool {
    /// Open a file-backed pool. `read_pool_size == 0` means the default.
    pub fn open(path: &Path, config: &StorageConfig) -> StorageResult<Self> {
        let pool_size = if config.read_pool_size == 0 {
            DEFAULT_READ_POOL_SIZE
        } else {
            config.read_pool_size
        };

        let writer = Connection::open(path)?;
        pragmas::configure(&writer, config, ConnectionRole::Writer)?;

        let mut readers = Vec::with_capacity(pool_size);
        for _ in 0..pool_size {
            let reader = Connection::open_with_flags(
                path,
                rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY
                    | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?;
            pragmas::configure(&reader, config, ConnectionRole::Reader)?;
            readers.push(Mutex::new(reader));
        }

        Ok(Self {
            writer: Mutex::new(writer),
            readers,
            read_index: AtomicUsize::new(0),
        })
    }

    /// Open an in-memory pool. There are no readers; reads go to the writer
    /// since separate in-memory connections do not share data.
    pub fn open_in_memory(config: &StorageConfig) -> StorageResult<Self> {
        let writer = Connection::open_in_memory()?;
        pragmas::configure(&writer, config, ConnectionRole::Writer)?;

        Ok(Self {
            writer: Mutex::new(writer),
            readers: Vec::new(),
            read_index: AtomicUsize::new(0),
        })
    }

    pub fn with_writer<F, T>(&self, f: F) -> StorageResult<T>
    where
        F: FnOnce(&Connection) -> StorageResult<T>,
    {
        let conn = self.writer.lock().map_err(|e| StorageError::LockPoisoned {
            message: format!("writer: {e}"),
        })?;
        f(&conn)
    }

    /// Execute a closure with a reader connection (round-robin).
    /// Falls back to the writer in in-memory mode.
    pub fn with_reader<F, T>(&self, f: F) -> StorageResult<T>
    where
        F: FnOnce(&Connection) -> StorageResult<T>,
    {
        if self.readers.is_empty() {
            return self.with_writer(f);
        }

        let index = self.read_index.fetch_add(1, Ordering::Relaxed) % self.readers.len();
        let conn = self.readers[index]
            .lock()
            .map_err(|e| StorageError::LockPoisoned {
                message: format!("reader {index}: {e}"),
            })?;
        f(&conn)
    }

    pub fn reader_count(&self) -> usize {
        self.readers.len()
    }

    pub fn is_wal_mode(&self) -> bool {
        self.with_writer(|conn| {
            let mode: String = conn.query_row("PRAGMA journal_mode", [], |row| row.get(0))?;
            Ok(mode.eq_ignore_ascii_case("wal"))
        })
        .unwrap_or(false)
    }
}
