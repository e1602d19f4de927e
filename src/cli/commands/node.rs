//! opdir node - Register, list and retire cluster members

use clap::{Args, Subcommand};
use colored::Colorize;
use serde_json::json;

use crate::app::AppContext;
use crate::cli::output::{emit_robot, robot_ok};
use crate::cluster::NO_NODE;
use crate::error::Result;

#[derive(Args, Debug)]
pub struct NodeArgs {
    #[command(subcommand)]
    pub command: NodeCommand,
}

#[derive(Subcommand, Debug)]
pub enum NodeCommand {
    /// Register a cluster member
    Add {
        /// Unique member name
        name: String,
        /// Unique member address
        address: String,
    },
    /// List cluster members
    List,
    /// Retire a member together with all of its operations
    Remove {
        /// Address of the member to retire
        address: String,
    },
}

pub fn run(ctx: &AppContext, args: &NodeArgs) -> Result<()> {
    match &args.command {
        NodeCommand::Add { name, address } => add(ctx, name, address),
        NodeCommand::List => list(ctx),
        NodeCommand::Remove { address } => remove(ctx, address),
    }
}

fn add(ctx: &AppContext, name: &str, address: &str) -> Result<()> {
    let id = ctx
        .db
        .transaction(NO_NODE, |tx| tx.create_node(name, address))?;

    if ctx.robot_mode {
        emit_robot(&robot_ok(json!({
            "id": id,
            "name": name,
            "address": address,
        })))
    } else {
        println!("{} node {} ({}) as #{}", "Added".green(), name.bold(), address, id);
        Ok(())
    }
}

fn list(ctx: &AppContext) -> Result<()> {
    let nodes = ctx.db.transaction(NO_NODE, |tx| tx.get_nodes())?;

    if ctx.robot_mode {
        return emit_robot(&robot_ok(nodes));
    }

    if nodes.is_empty() {
        println!("{}", "No nodes registered".dimmed());
        println!();
        println!("Register one with: opdir node add <name> <address>");
        return Ok(());
    }

    println!("{:>6}  {:24} {}", "ID".bold(), "NAME".bold(), "ADDRESS".bold());
    println!("{}", "─".repeat(56).dimmed());
    for node in &nodes {
        println!("{:>6}  {:24} {}", node.id, node.name.cyan(), node.address);
    }
    Ok(())
}

fn remove(ctx: &AppContext, address: &str) -> Result<()> {
    let id = ctx.db.node_id_for_address(address)?;
    ctx.db.transaction(id, |tx| tx.remove_node(tx.node_id()))?;

    if ctx.robot_mode {
        emit_robot(&robot_ok(json!({ "removed": address, "id": id })))
    } else {
        println!("{} node {}", "Removed".yellow(), address.bold());
        Ok(())
    }
}
