//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Airlock -- dependency prefetch for hermetic builds.
///
/// Use `airlock <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "airlock", version, about, long_about = None)]
pub struct Cli {
    /// Path to the airlock.toml configuration file.
    #[arg(short, long, default_value = "airlock.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table / text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve locked dependencies and populate the offline mirror.
    Fetch(FetchArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- fetch ----

/// Prefetch dependencies for a project into the offline mirror.
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Project root directory (default: current directory).
    #[arg(default_value = ".")]
    pub project_root: PathBuf,

    /// Package directory relative to the project root (repeatable).
    /// Defaults to the configured package directories.
    #[arg(long = "package-dir")]
    pub package_dirs: Vec<String>,

    /// Output root; the offline mirror is created below it.
    /// Defaults to the configured output directory.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Override the package manager executable.
    #[arg(long)]
    pub yarn_command: Option<String>,
}

// ---- config ----

/// Manage airlock configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, yarn).
        #[arg(long)]
        section: Option<String>,
    },
}
