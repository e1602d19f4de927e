//! SQLite database layer

use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;

use crate::cluster::{ClusterTx, NO_NODE};
use crate::config::DatabaseConfig;
use crate::error::{OpsError, Result};
use crate::storage::migrations;

/// Default time a writer waits on a locked database before giving up.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite database holding the cluster tables
pub struct Database {
    conn: Connection,
    schema_version: u32,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("schema_version", &self.schema_version)
            .finish_non_exhaustive()
    }
}

impl Database {
    /// Open database at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_timeout(path, DEFAULT_BUSY_TIMEOUT)
    }

    /// Open the database described by the `[database]` config section
    pub fn open_with_config(config: &DatabaseConfig) -> Result<Self> {
        Self::open_with_timeout(
            &config.path,
            Duration::from_millis(config.busy_timeout_ms),
        )
    }

    fn open_with_timeout(path: impl AsRef<Path>, busy_timeout: Duration) -> Result<Self> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)
            .map_err(|err| OpsError::storage(format!("Open database {}", path.display()), err))?;
        tracing::debug!("Opened database at {:?}", path);
        Self::from_connection(conn, busy_timeout)
    }

    /// Fresh private database, used by tests and benches
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|err| OpsError::storage("Open in-memory database", err))?;
        Self::from_connection(conn, DEFAULT_BUSY_TIMEOUT)
    }

    fn from_connection(conn: Connection, busy_timeout: Duration) -> Result<Self> {
        Self::configure_pragmas(&conn)?;
        conn.busy_timeout(busy_timeout)
            .map_err(|err| OpsError::storage("Set busy timeout", err))?;
        let schema_version = migrations::run_migrations(&conn)?;

        Ok(Self {
            conn,
            schema_version,
        })
    }

    /// Get a reference to the connection
    pub const fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Current schema version after migrations.
    pub const fn schema_version(&self) -> u32 {
        self.schema_version
    }

    /// Run `f` inside a transaction bound to `node_id`.
    ///
    /// Commits when `f` returns `Ok`; any error rolls the whole unit back.
    pub fn transaction<T, F>(&self, node_id: i64, f: F) -> Result<T>
    where
        F: FnOnce(&ClusterTx<'_>) -> Result<T>,
    {
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(|err| OpsError::storage("Begin transaction", err))?;
        let value = f(&ClusterTx::new(&tx, node_id))?;
        tx.commit()
            .map_err(|err| OpsError::storage("Commit transaction", err))?;
        Ok(value)
    }

    /// Resolve the id of the node registered at `address`.
    pub fn node_id_for_address(&self, address: &str) -> Result<i64> {
        ClusterTx::new(&self.conn, NO_NODE).get_node_id_by_address(address)
    }

    fn configure_pragmas(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA temp_store = MEMORY;
             PRAGMA foreign_keys = ON;",
        )
        .map_err(|err| OpsError::storage("Configure pragmas", err))?;
        Ok(())
    }
}
