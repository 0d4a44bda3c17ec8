//! Quarry CLI library
//!
//! This library contains all the CLI logic for quarry, making it reusable
//! for testing and integration with other tools.

pub mod cmd;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use quarry_config::Config;
use std::path::PathBuf;

/// Quarry - a snapshot-based version-control tool
#[derive(Parser)]
#[command(name = "quarry")]
#[command(about = "Track and snapshot your work with quarry")]
#[command(version)]
pub struct Cli {
    /// Path to the repository root (defaults to the current directory)
    #[arg(long, env = "QUARRY_REPO_DIR", value_name = "DIR")]
    pub repo: Option<PathBuf>,

    /// Path to the config file (defaults to <repo>/.quarry/config.toml)
    #[arg(long, env = "QUARRY_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose output (shows DEBUG level logs)
    #[arg(short, long)]
    pub verbose: bool,

    /// Write logs to a file (useful for debugging)
    #[arg(long, env = "QUARRY_LOG_FILE", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for the quarry CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Manage and run lifecycle hooks
    #[command(subcommand)]
    Hook(HookCommands),
}

/// Hook management commands
#[derive(Subcommand)]
pub enum HookCommands {
    /// Run a hook by name
    ///
    /// Extra arguments for the hook go after a mandatory `--` separator:
    /// `quarry hook run pre-commit -- --verbose`
    Run {
        /// Exit quietly with a zero exit code if the requested hook cannot be found
        #[arg(long)]
        ignore_missing: bool,

        /// File to read into the hook's stdin
        #[arg(long, value_name = "PATH")]
        to_stdin: Option<PathBuf>,

        /// Name of the hook to run
        hook_name: String,

        /// Arguments passed verbatim to the hook (after `--`)
        #[arg(last = true)]
        args: Vec<String>,
    },

    /// List hooks present in the hooks directory
    List {
        /// Output format: simple or json
        #[arg(long, default_value = "simple")]
        format: String,
    },
}

/// Run the CLI and return the process exit code
pub fn run(cli: Cli) -> Result<i32> {
    quarry_config::logging::init(cli.verbose, cli.log_file.as_deref())?;

    let repo_root = match cli.repo {
        Some(path) => path,
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };
    tracing::debug!(repo = %repo_root.display(), "Using repository root");

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(&repo_root)?,
    };

    match cli.command {
        Commands::Hook(command) => match command {
            HookCommands::Run {
                ignore_missing,
                to_stdin,
                hook_name,
                args,
            } => cmd::hook::run_hook(
                &repo_root,
                &config,
                &hook_name,
                args,
                ignore_missing,
                to_stdin.as_deref(),
            ),
            HookCommands::List { format } => {
                cmd::hook::run_list(&repo_root, &config, &format)?;
                Ok(0)
            }
        },
    }
}
