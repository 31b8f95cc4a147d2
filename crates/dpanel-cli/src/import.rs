//! # Import Subcommand
//!
//! Loads a plugin YAML file into an editor state snapshot. Warnings
//! (skipped actions, ignored keys, lossy shapes) are printed; any schema
//! or grammar error fails the command with the offending field path.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use dpanel_config::{import_yaml, ActionPolicy, LoadOptions};

use crate::config::CliConfig;
use crate::{save_state, write_panel_json};

/// Arguments for `dpanel import`.
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Plugin menu YAML file.
    pub menu: PathBuf,

    /// Output editor state JSON. Defaults to the persisted editor state.
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Drop malformed action strings instead of rejecting the file.
    #[arg(long)]
    pub skip_malformed_actions: bool,
}

impl ImportArgs {
    /// Effective load options: the flag overrides the configuration.
    pub fn load_options(&self, config: &CliConfig) -> LoadOptions {
        let policy = if self.skip_malformed_actions {
            ActionPolicy::Skip
        } else {
            config.action_policy
        };
        LoadOptions::with_action_policy(policy)
    }
}

/// Execute the import subcommand.
pub fn run_import(args: &ImportArgs, config: &CliConfig) -> Result<u8> {
    let text = std::fs::read_to_string(&args.menu)
        .with_context(|| format!("failed to read {}", args.menu.display()))?;
    let outcome = import_yaml(&text, &args.load_options(config))
        .with_context(|| format!("failed to import {}", args.menu.display()))?;

    for warning in &outcome.warnings {
        println!("  warning: {warning}");
    }

    let target = match &args.output {
        Some(path) => {
            write_panel_json(path, &outcome.panel)?;
            path.display().to_string()
        }
        None => {
            save_state(config, &outcome.panel)?;
            format!("{} ({})", config.state_dir.display(), config.state_key)
        }
    };

    println!("  imported:    {}", args.menu.display());
    println!("  items:       {}", outcome.panel.items.len());
    println!("  warnings:    {}", outcome.warnings.len());
    println!("  state:       {target}");
    Ok(0)
}
