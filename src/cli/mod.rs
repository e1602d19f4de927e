//! CLI module - Command-line interface definitions and handlers
//!
//! Uses clap v4 with derive macros for argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod commands;
pub mod output;

/// Operation directory for a clustered daemon's shared database
#[derive(Parser, Debug)]
#[command(name = "opdir")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable JSON output for machine consumption
    #[arg(long, global = true)]
    pub robot: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file path (default: ~/.config/opdir/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Database path, overriding the configured one
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Address of the node this invocation acts as
    #[arg(long, global = true, value_name = "ADDRESS")]
    pub node: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Register, list and retire cluster members
    Node(commands::node::NodeArgs),

    /// Manage projects that operations are scoped to
    Project(commands::project::ProjectArgs),

    /// Query and mutate the operation directory
    Op(commands::op::OpArgs),
}
