//! # State Subcommand
//!
//! Inspects or clears the persisted editor state in the file store
//! (`state_dir` / `state_key` from the configuration).

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use dpanel_store::{EditorState, KeyValueStore};

use crate::config::CliConfig;
use crate::file_store;

/// Arguments for `dpanel state`.
#[derive(Args, Debug)]
pub struct StateArgs {
    #[command(subcommand)]
    pub command: StateCommand,
}

/// State subcommands.
#[derive(Subcommand, Debug)]
pub enum StateCommand {
    /// Print the persisted editor state JSON.
    Show,
    /// Delete the persisted editor state.
    Clear,
}

/// Execute the state subcommand.
pub fn run_state(args: &StateArgs, config: &CliConfig) -> Result<u8> {
    match args.command {
        StateCommand::Show => run_show(config),
        StateCommand::Clear => run_clear(config),
    }
}

fn run_show(config: &CliConfig) -> Result<u8> {
    let store = file_store(config);
    match store.get(&config.state_key)? {
        Some(bytes) => {
            let state = EditorState::new(&store, config.state_key.as_str())?;
            let panel = state.restore()?;
            let json = serde_json::to_string_pretty(&panel)
                .context("failed to serialize editor state")?;
            println!("{json}");
            tracing::debug!(bytes = bytes.len(), items = panel.items.len(), "shown editor state");
        }
        None => {
            println!(
                "  no editor state stored under {} in {}",
                config.state_key,
                store.dir().display()
            );
        }
    }
    Ok(0)
}

fn run_clear(config: &CliConfig) -> Result<u8> {
    let store = file_store(config);
    let state = EditorState::new(&store, config.state_key.as_str())?;
    if state.clear()? {
        println!("  cleared:     {} ({})", store.dir().display(), config.state_key);
    } else {
        println!("  nothing to clear");
    }
    Ok(0)
}
