//! Per-invocation state shared by CLI commands.

use crate::cli::Cli;
use crate::config::Config;
use crate::error::Result;
use crate::storage::Database;

pub struct AppContext {
    pub config: Config,
    pub db: Database,
    pub robot_mode: bool,
}

impl AppContext {
    /// Load config and apply CLI overrides on top of it.
    pub fn load_config(cli: &Cli) -> Result<Config> {
        let mut config = Config::load(cli.config.as_deref())?;
        if let Some(path) = &cli.db {
            config.database.path.clone_from(path);
        }
        if let Some(address) = &cli.node {
            config.node.address = Some(address.clone());
        }
        if cli.robot {
            config.output.robot = true;
        }
        Ok(config)
    }

    /// Open the database `config` points at.
    pub fn open(config: Config) -> Result<Self> {
        let db = Database::open_with_config(&config.database)?;
        tracing::debug!(
            "Using database {:?} (schema v{})",
            config.database.path,
            db.schema_version()
        );

        Ok(Self {
            robot_mode: config.output.robot,
            config,
            db,
        })
    }

    /// Id of the node this invocation acts as.
    pub fn local_node_id(&self) -> Result<i64> {
        let address = self.config.node_address()?;
        self.db.node_id_for_address(address)
    }
}
