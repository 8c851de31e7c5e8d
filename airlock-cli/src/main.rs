//! Airlock CLI entry point.
//!
//! Parses arguments, initialises logging, then dispatches to the
//! per-subcommand handlers in [`commands`]. Errors are rendered to
//! stderr and mapped to process exit codes via [`error::CliError`].

mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::output::OutputWriter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = cli.log_level.clone().unwrap_or_else(|| "info".to_owned());
    tracing_subscriber::fmt().with_env_filter(log_level).init();
    airlock_core::metrics::describe_metrics();

    tracing::info!(config = %cli.config.display(), "airlock-cli starting");

    if let Err(err) = run(cli).await {
        eprintln!("error: {err}");
        std::process::exit(err.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let writer = OutputWriter::new(cli.output);

    match cli.command {
        Commands::Fetch(args) => commands::fetch::execute(args, &cli.config, &writer).await,
        Commands::Config(args) => commands::config::execute(args, &cli.config, &writer).await,
    }
}
