pub mod app;
pub mod cli;
pub mod cluster;
pub mod config;
pub mod error;
pub mod storage;
pub mod test_utils;

pub use cluster::{ClusterTx, Operation, OperationType};
pub use error::{OpsError, Result};

/// Package version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
