//! # dpanel CLI entry point
//!
//! Parses command-line arguments, resolves the configuration and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dpanel_cli::check::{run_check, CheckArgs};
use dpanel_cli::config::CliConfig;
use dpanel_cli::export::{run_export, ExportArgs};
use dpanel_cli::import::{run_import, ImportArgs};
use dpanel_cli::new::{run_new, NewArgs};
use dpanel_cli::state::{run_state, StateArgs};

/// Panel configuration compiler.
///
/// Converts between the menu editor's state and the plugin's YAML
/// configuration, and checks that configurations survive the trip.
#[derive(Parser, Debug)]
#[command(name = "dpanel", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory of the editor state store (overrides `state_dir`).
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,

    /// Editor state key (overrides `state_key`).
    #[arg(long, global = true)]
    state_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile editor state into plugin YAML.
    Export(ExportArgs),

    /// Load plugin YAML into editor state.
    Import(ImportArgs),

    /// Verify a YAML file is stable under import and re-export.
    Check(CheckArgs),

    /// Write a fresh editor state.
    New(NewArgs),

    /// Inspect or clear the persisted editor state.
    State(StateArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    tracing::debug!("dpanel CLI v{} starting", env!("CARGO_PKG_VERSION"));

    let config = match CliConfig::load(cli.config.as_deref())
        .and_then(|c| c.with_overrides(cli.state_dir.clone(), cli.state_key.clone()))
    {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(1);
        }
    };

    let result = match &cli.command {
        Commands::Export(args) => run_export(args, &config),
        Commands::Import(args) => run_import(args, &config),
        Commands::Check(args) => run_check(args, &config),
        Commands::New(args) => run_new(args, &config),
        Commands::State(args) => run_state(args, &config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
