//! Directory of long-running operations and the node running each one.
//!
//! Each node that starts a long-running task registers an operation row so
//! any other node can find out where it runs. Rows are keyed by a surrogate
//! id and a caller-assigned UUID; the executing node is stored as `node_id`
//! and resolved to its address through a join on `nodes`. A NULL
//! `project_id` marks a global operation, visible from every project.

use rusqlite::{params, Row, ToSql};
use serde::Serialize;
use tracing::{debug, warn};

use crate::cluster::{ClusterTx, OperationType};
use crate::error::{OpsError, Result};

/// A single operation running on a node of the cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Operation {
    /// Stable database identifier
    pub id: i64,
    /// User-visible identifier
    pub uuid: String,
    /// Address of the node the operation is running on
    pub node_address: String,
    #[serde(rename = "type")]
    pub op_type: OperationType,
}

const SELECT_OPERATIONS: &str = "\
SELECT operations.id, operations.uuid, nodes.address, operations.type
  FROM operations
  JOIN nodes ON nodes.id = operations.node_id
  LEFT JOIN projects ON projects.id = operations.project_id";

/// Matches rows scoped to the project bound at `?1`, plus global rows.
const PROJECT_OR_GLOBAL: &str = "(projects.name = ?1 OR operations.project_id IS NULL)";

impl ClusterTx<'_> {
    /// All operations owned by the local node.
    pub fn local_operations(&self) -> Result<Vec<Operation>> {
        self.operations("operations.node_id = ?1", params![self.node_id()])
    }

    /// UUIDs of all operations owned by the local node.
    pub fn local_operation_uuids(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn()
            .prepare("SELECT uuid FROM operations WHERE node_id = ?1 ORDER BY id")
            .map_err(|err| OpsError::storage("Failed to fetch local operation UUIDs", err))?;
        let rows = stmt
            .query_map([self.node_id()], |row| row.get(0))
            .map_err(|err| OpsError::storage("Failed to fetch local operation UUIDs", err))?;

        let mut uuids = Vec::new();
        for row in rows {
            uuids.push(
                row.map_err(|err| OpsError::storage("Failed to fetch local operation UUIDs", err))?,
            );
        }
        Ok(uuids)
    }

    /// Distinct addresses of nodes running an operation of `project`, or a
    /// global one.
    pub fn nodes_with_operations(&self, project: &str) -> Result<Vec<String>> {
        let sql = format!(
            "SELECT DISTINCT nodes.address
               FROM operations
               LEFT JOIN projects ON projects.id = operations.project_id
               JOIN nodes ON nodes.id = operations.node_id
              WHERE {PROJECT_OR_GLOBAL}
              ORDER BY nodes.address"
        );
        let mut stmt = self
            .conn()
            .prepare(&sql)
            .map_err(|err| OpsError::storage("Failed to fetch nodes with operations", err))?;
        let rows = stmt
            .query_map([project], |row| row.get(0))
            .map_err(|err| OpsError::storage("Failed to fetch nodes with operations", err))?;

        let mut addresses = Vec::new();
        for row in rows {
            addresses.push(
                row.map_err(|err| OpsError::storage("Failed to fetch nodes with operations", err))?,
            );
        }
        Ok(addresses)
    }

    /// Operations of the given type in `project`, global ones included.
    pub fn operations_of_type(
        &self,
        project: &str,
        op_type: OperationType,
    ) -> Result<Vec<Operation>> {
        let filter = format!("{PROJECT_OR_GLOBAL} AND operations.type = ?2");
        self.operations(&filter, params![project, op_type])
    }

    pub fn get_operation_by_id(&self, id: i64) -> Result<Operation> {
        let operations = self.operations("operations.id = ?1", params![id])?;
        exactly_one(operations, &format!("operation with ID {id}"))
    }

    pub fn get_operation_by_uuid(&self, uuid: &str) -> Result<Operation> {
        let operations = self.operations("operations.uuid = ?1", params![uuid])?;
        exactly_one(operations, &format!("operation '{uuid}'"))
    }

    /// Register an operation run by the local node and return its id.
    ///
    /// An empty `project` makes the operation global. Re-creating an existing
    /// UUID replaces its node, type and project while keeping its id.
    pub fn create_operation(
        &self,
        project: &str,
        uuid: &str,
        op_type: OperationType,
    ) -> Result<i64> {
        let project_id = if project.is_empty() {
            None
        } else {
            Some(self.get_project_id(project)?)
        };

        let id = self
            .conn()
            .query_row(
                "INSERT INTO operations (uuid, node_id, type, project_id)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (uuid) DO UPDATE SET
                    node_id = excluded.node_id,
                    type = excluded.type,
                    project_id = excluded.project_id
                 RETURNING id",
                params![uuid, self.node_id(), op_type, project_id],
                |row| row.get(0),
            )
            .map_err(|err| OpsError::storage("Failed to create operation", err))?;

        debug!(
            "Registered operation {} ({}) on node {} as row {}",
            uuid,
            op_type,
            self.node_id(),
            id
        );
        Ok(id)
    }

    /// Remove the operation with the given UUID.
    ///
    /// Removing an unknown UUID is an error, not a no-op.
    pub fn remove_operation(&self, uuid: &str) -> Result<()> {
        let deleted = self
            .conn()
            .execute("DELETE FROM operations WHERE uuid = ?1", [uuid])
            .map_err(|err| OpsError::storage("Failed to remove operation", err))?;

        match deleted {
            0 => Err(OpsError::NotFound(format!("operation '{uuid}'"))),
            1 => {
                debug!("Removed operation {}", uuid);
                Ok(())
            }
            n => {
                warn!("Removing operation {} deleted {} rows", uuid, n);
                Err(OpsError::InvariantViolation(format!(
                    "query deleted {n} rows instead of 1"
                )))
            }
        }
    }

    /// Remove every operation owned by `node_id`, returning how many went.
    ///
    /// A node without operations is not an error.
    pub fn remove_node_operations(&self, node_id: i64) -> Result<usize> {
        let deleted = self
            .conn()
            .execute("DELETE FROM operations WHERE node_id = ?1", [node_id])
            .map_err(|err| OpsError::storage("Failed to remove node operations", err))?;
        debug!("Removed {} operations of node {}", deleted, node_id);
        Ok(deleted)
    }

    /// Operations matching `filter`, ordered by id.
    ///
    /// `filter` is a SQL predicate over the `operations`, `nodes` and
    /// `projects` tables; its placeholders are bound from `args`.
    fn operations(&self, filter: &str, args: &[&dyn ToSql]) -> Result<Vec<Operation>> {
        let mut sql = String::from(SELECT_OPERATIONS);
        if !filter.is_empty() {
            sql.push_str("\n WHERE ");
            sql.push_str(filter);
        }
        sql.push_str("\n ORDER BY operations.id");

        let mut stmt = self
            .conn()
            .prepare(&sql)
            .map_err(|err| OpsError::storage("Failed to fetch operations", err))?;
        let rows = stmt
            .query_map(args, operation_from_row)
            .map_err(|err| OpsError::storage("Failed to fetch operations", err))?;

        let mut operations = Vec::new();
        for row in rows {
            operations.push(row.map_err(|err| OpsError::storage("Failed to fetch operations", err))?);
        }
        Ok(operations)
    }
}

fn operation_from_row(row: &Row<'_>) -> rusqlite::Result<Operation> {
    Ok(Operation {
        id: row.get(0)?,
        uuid: row.get(1)?,
        node_address: row.get(2)?,
        op_type: row.get(3)?,
    })
}

/// The single row of a lookup on a unique key.
fn exactly_one(mut operations: Vec<Operation>, what: &str) -> Result<Operation> {
    match operations.len() {
        0 => Err(OpsError::NotFound(what.to_string())),
        1 => Ok(operations.remove(0)),
        n => {
            warn!("{} rows match {}", n, what);
            Err(OpsError::InvariantViolation(format!(
                "more than one operation matches {what}"
            )))
        }
    }
}
