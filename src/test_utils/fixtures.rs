use crate::cluster::{ClusterTx, NO_NODE};
use crate::error::Result;
use crate::storage::Database;

/// In-memory cluster with three registered nodes and one extra project.
pub struct ClusterFixture {
    pub db: Database,
    pub node_a: i64,
    pub node_b: i64,
    pub node_c: i64,
}

impl ClusterFixture {
    pub const NODE_A_ADDRESS: &'static str = "10.0.0.1";
    pub const NODE_B_ADDRESS: &'static str = "10.0.0.2";
    pub const NODE_C_ADDRESS: &'static str = "10.0.0.3";
    /// Project created alongside the seeded `default` one.
    pub const PROJECT: &'static str = "web";

    pub fn new() -> Self {
        let db = Database::open_in_memory().expect("Failed to open in-memory database");
        let (node_a, node_b, node_c) = db
            .transaction(NO_NODE, |tx| {
                tx.create_project(Self::PROJECT, "Fixture project")?;
                Ok((
                    tx.create_node("node-a", Self::NODE_A_ADDRESS)?,
                    tx.create_node("node-b", Self::NODE_B_ADDRESS)?,
                    tx.create_node("node-c", Self::NODE_C_ADDRESS)?,
                ))
            })
            .expect("Failed to seed cluster fixture");

        println!("[FIXTURE] Nodes a={node_a} b={node_b} c={node_c}");

        Self {
            db,
            node_a,
            node_b,
            node_c,
        }
    }

    pub fn on_node_a<T>(&self, f: impl FnOnce(&ClusterTx<'_>) -> Result<T>) -> Result<T> {
        self.db.transaction(self.node_a, f)
    }

    pub fn on_node_b<T>(&self, f: impl FnOnce(&ClusterTx<'_>) -> Result<T>) -> Result<T> {
        self.db.transaction(self.node_b, f)
    }

    pub fn on_node_c<T>(&self, f: impl FnOnce(&ClusterTx<'_>) -> Result<T>) -> Result<T> {
        self.db.transaction(self.node_c, f)
    }

    /// Raw row count of the operations table.
    pub fn operation_count(&self) -> i64 {
        self.db
            .conn()
            .query_row("SELECT COUNT(*) FROM operations", [], |row| row.get(0))
            .expect("Failed to count operations")
    }
}

impl Default for ClusterFixture {
    fn default() -> Self {
        Self::new()
    }
}
