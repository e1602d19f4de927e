//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - `run()` function to execute the command

use crate::app::AppContext;
use crate::cli::Commands;
use crate::error::Result;

pub mod node;
pub mod op;
pub mod project;

/// Dispatch a command to its handler
pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Node(args) => node::run(ctx, args),
        Commands::Project(args) => project::run(ctx, args),
        Commands::Op(args) => op::run(ctx, args),
    }
}
