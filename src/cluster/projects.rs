//! Projects that operations can be scoped to.

use rusqlite::params;
use serde::Serialize;

use crate::cluster::ClusterTx;
use crate::error::{OpsError, Result};

/// Name of the project seeded by the schema.
pub const DEFAULT_PROJECT: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub description: String,
}

impl ClusterTx<'_> {
    pub fn create_project(&self, name: &str, description: &str) -> Result<i64> {
        self.conn()
            .execute(
                "INSERT INTO projects (name, description) VALUES (?1, ?2)",
                params![name, description],
            )
            .map_err(|err| OpsError::storage("Failed to create project", err))?;
        Ok(self.conn().last_insert_rowid())
    }

    /// All projects, ordered by name.
    pub fn get_projects(&self) -> Result<Vec<Project>> {
        let mut stmt = self
            .conn()
            .prepare("SELECT id, name, description FROM projects ORDER BY name")
            .map_err(|err| OpsError::storage("Failed to fetch projects", err))?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Project {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    description: row.get(2)?,
                })
            })
            .map_err(|err| OpsError::storage("Failed to fetch projects", err))?;

        let mut projects = Vec::new();
        for row in rows {
            projects.push(row.map_err(|err| OpsError::storage("Failed to fetch projects", err))?);
        }
        Ok(projects)
    }

    /// Resolve a project name to its id; unknown names are `NotFound`.
    pub fn get_project_id(&self, name: &str) -> Result<i64> {
        self.conn()
            .query_row("SELECT id FROM projects WHERE name = ?1", [name], |row| {
                row.get(0)
            })
            .map_err(|err| match err {
                rusqlite::Error::QueryReturnedNoRows => {
                    OpsError::NotFound(format!("project '{name}'"))
                }
                err => OpsError::storage("Failed to fetch project ID", err),
            })
    }
}
