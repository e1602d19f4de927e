//! Cluster-wide tables accessed inside a caller-supplied transaction.
//!
//! Every accessor lives on [`ClusterTx`], which pairs the open connection
//! with the identity of the local node. "Local" queries are scoped to that
//! node id, which stays fixed for the lifetime of the value.

pub mod nodes;
pub mod operation_type;
pub mod operations;
pub mod projects;

use rusqlite::Connection;

pub use nodes::Node;
pub use operation_type::OperationType;
pub use operations::Operation;
pub use projects::Project;

/// Node id for transactions that act before any local node is registered.
/// Row ids start at 1, so it never matches a node.
pub const NO_NODE: i64 = 0;

/// Handle on an open transaction bound to the local node.
///
/// The transaction itself is owned by the caller; pass a
/// `rusqlite::Transaction` (it derefs to [`Connection`]) or use
/// [`crate::storage::Database::transaction`] to have it committed for you.
pub struct ClusterTx<'a> {
    conn: &'a Connection,
    node_id: i64,
}

impl std::fmt::Debug for ClusterTx<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterTx")
            .field("node_id", &self.node_id)
            .finish_non_exhaustive()
    }
}

impl<'a> ClusterTx<'a> {
    pub const fn new(conn: &'a Connection, node_id: i64) -> Self {
        Self { conn, node_id }
    }

    /// Identity of the local node.
    #[must_use]
    pub const fn node_id(&self) -> i64 {
        self.node_id
    }

    pub(crate) const fn conn(&self) -> &'a Connection {
        self.conn
    }
}
