//! Database migrations

use rusqlite::Connection;

use crate::error::{OpsError, Result};

const MIGRATIONS: [&str; 2] = [
    include_str!("../../migrations/001_nodes_projects.sql"),
    include_str!("../../migrations/002_operations.sql"),
];

pub const SCHEMA_VERSION: u32 = MIGRATIONS.len() as u32;

/// Run all pending migrations on the database
pub fn run_migrations(conn: &Connection) -> Result<u32> {
    let current_version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .map_err(|err| OpsError::storage("Failed to read schema version", err))?;

    for (idx, sql) in MIGRATIONS.iter().enumerate() {
        let target_version = (idx + 1) as u32;
        if current_version >= target_version {
            continue;
        }

        conn.execute_batch(sql)
            .map_err(|err| OpsError::storage(format!("Migration {target_version} failed"), err))?;
        conn.pragma_update(None, "user_version", target_version)
            .map_err(|err| {
                OpsError::storage(format!("Failed to set user_version {target_version}"), err)
            })?;
        tracing::debug!("Applied migration {}", target_version);
    }

    Ok(SCHEMA_VERSION)
}
