//! opdir op - Query and mutate the operation directory
//!
//! Commands that act "locally" run as the node configured through
//! `node.address`, `OPDIR_NODE_ADDRESS` or `--node`.

use clap::{Args, Subcommand};
use colored::Colorize;
use serde_json::json;
use uuid::Uuid;

use crate::app::AppContext;
use crate::cli::output::{emit_robot, robot_ok};
use crate::cluster::projects::DEFAULT_PROJECT;
use crate::cluster::{NO_NODE, Operation, OperationType};
use crate::error::{OpsError, Result};

#[derive(Args, Debug)]
pub struct OpArgs {
    #[command(subcommand)]
    pub command: OpCommand,
}

#[derive(Subcommand, Debug)]
pub enum OpCommand {
    /// List operations owned by the local node
    List,
    /// List UUIDs of operations owned by the local node
    Uuids,
    /// List addresses of nodes running operations of a project
    Nodes {
        #[arg(long, short, default_value = DEFAULT_PROJECT)]
        project: String,
    },
    /// List operations of one type in a project, global ones included
    ByType {
        /// Operation type, by name or numeric code
        op_type: OperationType,
        #[arg(long, short, default_value = DEFAULT_PROJECT)]
        project: String,
    },
    /// Show a single operation
    Show {
        /// Operation UUID
        #[arg(required_unless_present = "id", conflicts_with = "id")]
        uuid: Option<String>,
        /// Look up by database id instead of UUID
        #[arg(long)]
        id: Option<i64>,
    },
    /// Register an operation as running on the local node
    Create {
        /// Operation type, by name or numeric code
        op_type: OperationType,
        /// UUID to register (generated when omitted)
        #[arg(long)]
        uuid: Option<String>,
        #[arg(long, short, default_value = DEFAULT_PROJECT, conflicts_with = "global")]
        project: String,
        /// Register a global operation, visible from every project
        #[arg(long)]
        global: bool,
    },
    /// Remove an operation by UUID
    Remove { uuid: String },
    /// Remove every operation of the node at an address
    Purge { address: String },
    /// List the known operation types
    Types,
}

pub fn run(ctx: &AppContext, args: &OpArgs) -> Result<()> {
    match &args.command {
        OpCommand::List => {
            let node_id = ctx.local_node_id()?;
            let ops = ctx.db.transaction(node_id, |tx| tx.local_operations())?;
            emit_operations(ctx, &ops)
        }
        OpCommand::Uuids => {
            let node_id = ctx.local_node_id()?;
            let uuids = ctx.db.transaction(node_id, |tx| tx.local_operation_uuids())?;
            emit_lines(ctx, &uuids, "No local operations")
        }
        OpCommand::Nodes { project } => {
            let addresses = ctx
                .db
                .transaction(NO_NODE, |tx| tx.nodes_with_operations(project))?;
            emit_lines(ctx, &addresses, "No node is running operations")
        }
        OpCommand::ByType { op_type, project } => {
            let ops = ctx
                .db
                .transaction(NO_NODE, |tx| tx.operations_of_type(project, *op_type))?;
            emit_operations(ctx, &ops)
        }
        OpCommand::Show { uuid, id } => show(ctx, uuid.as_deref(), *id),
        OpCommand::Create {
            op_type,
            uuid,
            project,
            global,
        } => create(ctx, *op_type, uuid.as_deref(), project, *global),
        OpCommand::Remove { uuid } => {
            ctx.db
                .transaction(NO_NODE, |tx| tx.remove_operation(uuid))?;
            if ctx.robot_mode {
                emit_robot(&robot_ok(json!({ "removed": uuid })))
            } else {
                println!("{} operation {}", "Removed".yellow(), uuid.bold());
                Ok(())
            }
        }
        OpCommand::Purge { address } => purge(ctx, address),
        OpCommand::Types => types(ctx),
    }
}

fn show(ctx: &AppContext, uuid: Option<&str>, id: Option<i64>) -> Result<()> {
    let op = ctx.db.transaction(NO_NODE, |tx| match (uuid, id) {
        (_, Some(id)) => tx.get_operation_by_id(id),
        (Some(uuid), None) => tx.get_operation_by_uuid(uuid),
        (None, None) => Err(OpsError::InvalidArgument(
            "either a UUID or --id is required".to_string(),
        )),
    })?;

    if ctx.robot_mode {
        return emit_robot(&robot_ok(op));
    }

    println!("{}", op.uuid.bold());
    println!("{}", "─".repeat(op.uuid.len().max(36)).dimmed());
    println!("ID:      {}", op.id);
    println!("Type:    {} ({})", op.op_type.name().cyan(), op.op_type.description());
    println!("Node:    {}", op.node_address);
    Ok(())
}

fn create(
    ctx: &AppContext,
    op_type: OperationType,
    uuid: Option<&str>,
    project: &str,
    global: bool,
) -> Result<()> {
    let node_id = ctx.local_node_id()?;
    let uuid = uuid.map_or_else(|| Uuid::new_v4().to_string(), str::to_string);
    let project = if global { "" } else { project };
    let scope = (!global).then_some(project);

    let id = ctx
        .db
        .transaction(node_id, |tx| tx.create_operation(project, &uuid, op_type))?;

    if ctx.robot_mode {
        emit_robot(&robot_ok(json!({
            "id": id,
            "uuid": uuid,
            "type": op_type,
            "project": scope,
        })))
    } else {
        println!(
            "{} {} operation {} as #{}",
            "Registered".green(),
            op_type.name().cyan(),
            uuid.bold(),
            id
        );
        Ok(())
    }
}

fn purge(ctx: &AppContext, address: &str) -> Result<()> {
    let node_id = ctx.db.node_id_for_address(address)?;
    let removed = ctx
        .db
        .transaction(node_id, |tx| tx.remove_node_operations(tx.node_id()))?;

    if ctx.robot_mode {
        emit_robot(&robot_ok(json!({ "address": address, "removed": removed })))
    } else {
        println!(
            "{} {} operations of {}",
            "Removed".yellow(),
            removed,
            address.bold()
        );
        Ok(())
    }
}

fn types(ctx: &AppContext) -> Result<()> {
    if ctx.robot_mode {
        let types: Vec<_> = OperationType::ALL
            .iter()
            .map(|op_type| {
                json!({
                    "code": op_type.code(),
                    "name": op_type.name(),
                    "description": op_type.description(),
                })
            })
            .collect();
        return emit_robot(&robot_ok(types));
    }

    for op_type in OperationType::ALL {
        println!(
            "{:>4}  {:32} {}",
            op_type.code(),
            op_type.name().cyan(),
            op_type.description().dimmed()
        );
    }
    Ok(())
}

fn emit_operations(ctx: &AppContext, ops: &[Operation]) -> Result<()> {
    if ctx.robot_mode {
        return emit_robot(&robot_ok(ops));
    }

    if ops.is_empty() {
        println!("{}", "No operations found".dimmed());
        return Ok(());
    }

    println!(
        "{:>6}  {:36}  {:28} {}",
        "ID".bold(),
        "UUID".bold(),
        "TYPE".bold(),
        "NODE".bold()
    );
    println!("{}", "─".repeat(90).dimmed());
    for op in ops {
        println!(
            "{:>6}  {:36}  {:28} {}",
            op.id,
            op.uuid,
            op.op_type.name().cyan(),
            op.node_address
        );
    }
    Ok(())
}

fn emit_lines(ctx: &AppContext, lines: &[String], empty: &str) -> Result<()> {
    if ctx.robot_mode {
        return emit_robot(&robot_ok(lines));
    }

    if lines.is_empty() {
        println!("{}", empty.dimmed());
    }
    for line in lines {
        println!("{line}");
    }
    Ok(())
}
