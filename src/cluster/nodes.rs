//! Cluster members.
//!
//! The directory only needs `id -> address` resolution from this table, plus
//! enough bookkeeping to register members and retire them.

use rusqlite::params;
use serde::Serialize;
use tracing::info;

use crate::cluster::ClusterTx;
use crate::error::{OpsError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub id: i64,
    pub name: String,
    pub address: String,
}

impl ClusterTx<'_> {
    /// Register a new cluster member and return its id.
    pub fn create_node(&self, name: &str, address: &str) -> Result<i64> {
        self.conn()
            .execute(
                "INSERT INTO nodes (name, address) VALUES (?1, ?2)",
                params![name, address],
            )
            .map_err(|err| OpsError::storage("Failed to create node", err))?;
        Ok(self.conn().last_insert_rowid())
    }

    /// All cluster members, ordered by id.
    pub fn get_nodes(&self) -> Result<Vec<Node>> {
        let mut stmt = self
            .conn()
            .prepare("SELECT id, name, address FROM nodes ORDER BY id")
            .map_err(|err| OpsError::storage("Failed to fetch nodes", err))?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Node {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    address: row.get(2)?,
                })
            })
            .map_err(|err| OpsError::storage("Failed to fetch nodes", err))?;

        let mut nodes = Vec::new();
        for row in rows {
            nodes.push(row.map_err(|err| OpsError::storage("Failed to fetch nodes", err))?);
        }
        Ok(nodes)
    }

    pub fn get_node_id_by_address(&self, address: &str) -> Result<i64> {
        self.conn()
            .query_row("SELECT id FROM nodes WHERE address = ?1", [address], |row| {
                row.get(0)
            })
            .map_err(|err| match err {
                rusqlite::Error::QueryReturnedNoRows => {
                    OpsError::NotFound(format!("node at address '{address}'"))
                }
                err => OpsError::storage("Failed to fetch node ID", err),
            })
    }

    /// Retire a cluster member along with all of its operations.
    pub fn remove_node(&self, id: i64) -> Result<()> {
        let purged = self.remove_node_operations(id)?;
        let deleted = self
            .conn()
            .execute("DELETE FROM nodes WHERE id = ?1", [id])
            .map_err(|err| OpsError::storage("Failed to remove node", err))?;
        if deleted == 0 {
            return Err(OpsError::NotFound(format!("node with ID {id}")));
        }
        info!("Removed node {} and {} of its operations", id, purged);
        Ok(())
    }
}
