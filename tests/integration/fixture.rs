use std::path::PathBuf;

use opdir::cluster::{ClusterTx, NO_NODE};
use opdir::storage::Database;
use opdir::Result;
use tempfile::TempDir;

/// File-backed cluster database with registered nodes.
pub struct DiskFixture {
    _dir: TempDir,
    pub db_path: PathBuf,
    pub db: Database,
    pub nodes: Vec<(i64, String)>,
}

impl DiskFixture {
    /// Open a fresh database and register one node per address.
    pub fn with_nodes(addresses: &[&str]) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = dir.path().join("cluster.db");
        let db = Database::open(&db_path).expect("Failed to open database");

        let nodes = db
            .transaction(NO_NODE, |tx| {
                addresses
                    .iter()
                    .enumerate()
                    .map(|(idx, address)| {
                        let id = tx.create_node(&format!("node-{idx}"), address)?;
                        Ok((id, (*address).to_string()))
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .expect("Failed to register nodes");

        println!("[FIXTURE] {} at {:?}", nodes.len(), db_path);

        Self {
            _dir: dir,
            db_path,
            db,
            nodes,
        }
    }

    pub fn node_id(&self, address: &str) -> i64 {
        self.nodes
            .iter()
            .find(|(_, candidate)| candidate == address)
            .map(|(id, _)| *id)
            .unwrap_or_else(|| panic!("no fixture node at {address}"))
    }

    /// Run `f` as the node registered at `address`.
    pub fn on<T>(&self, address: &str, f: impl FnOnce(&ClusterTx<'_>) -> Result<T>) -> Result<T> {
        self.db.transaction(self.node_id(address), f)
    }

    /// Second handle onto the same file, as another process would see it.
    pub fn reopen(&self) -> Database {
        Database::open(&self.db_path).expect("Failed to reopen database")
    }
}
