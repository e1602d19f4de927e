//! opdir - operation directory CLI
//!
//! Inspect and edit which cluster member runs each long-running operation.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use opdir::app::AppContext;
use opdir::cli::output::{emit_robot, robot_error};
use opdir::cli::Cli;
use opdir::config::Config;
use opdir::Result;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = AppContext::load_config(&cli);
    let robot = match &config {
        Ok(config) => config.output.robot,
        Err(_) => cli.robot || Config::robot_from_env(),
    };
    init_tracing(&cli, robot);

    match config.and_then(|config| run(&cli, config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("Command failed: {e:?}");
            if robot {
                // Robot mode: JSON error output to stdout
                if emit_robot(&robot_error(&e)).is_err() {
                    eprintln!("Error: {e}");
                }
            } else {
                eprintln!("Error: {e}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, config: Config) -> Result<()> {
    let ctx = AppContext::open(config)?;
    opdir::cli::commands::run(&ctx, &cli.command)
}

fn init_tracing(cli: &Cli, robot: bool) {
    if cli.quiet {
        return;
    }

    let filter = match cli.verbose {
        0 => "warn,opdir=info",
        1 => "info,opdir=debug",
        2 => "debug,opdir=trace",
        _ => "trace",
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if robot {
        // JSON logging for robot mode
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
