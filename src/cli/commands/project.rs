//! opdir project - Manage operation scopes

use clap::{Args, Subcommand};
use colored::Colorize;
use serde_json::json;

use crate::app::AppContext;
use crate::cli::output::{emit_robot, robot_ok};
use crate::cluster::NO_NODE;
use crate::error::Result;

#[derive(Args, Debug)]
pub struct ProjectArgs {
    #[command(subcommand)]
    pub command: ProjectCommand,
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    /// Create a project
    Add {
        name: String,
        #[arg(long, short, default_value = "")]
        description: String,
    },
    /// List projects
    List,
}

pub fn run(ctx: &AppContext, args: &ProjectArgs) -> Result<()> {
    match &args.command {
        ProjectCommand::Add { name, description } => add(ctx, name, description),
        ProjectCommand::List => list(ctx),
    }
}

fn add(ctx: &AppContext, name: &str, description: &str) -> Result<()> {
    let id = ctx
        .db
        .transaction(NO_NODE, |tx| tx.create_project(name, description))?;

    if ctx.robot_mode {
        emit_robot(&robot_ok(json!({ "id": id, "name": name })))
    } else {
        println!("{} project {} as #{}", "Created".green(), name.bold(), id);
        Ok(())
    }
}

fn list(ctx: &AppContext) -> Result<()> {
    let projects = ctx.db.transaction(NO_NODE, |tx| tx.get_projects())?;

    if ctx.robot_mode {
        return emit_robot(&robot_ok(projects));
    }

    println!("{:>6}  {:24} {}", "ID".bold(), "NAME".bold(), "DESCRIPTION".bold());
    println!("{}", "─".repeat(56).dimmed());
    for project in &projects {
        println!(
            "{:>6}  {:24} {}",
            project.id,
            project.name.cyan(),
            project.description.dimmed()
        );
    }
    Ok(())
}
