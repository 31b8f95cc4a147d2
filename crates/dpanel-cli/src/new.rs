//! # New Subcommand
//!
//! Writes the editor's starting panel: title `&8Rank Store!`, open command
//! `ranks`, a registered command, and an empty grid of the requested size.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Args;

use dpanel_config::panel::check_size;
use dpanel_config::Panel;

use crate::config::CliConfig;
use crate::{save_state, write_panel_json};

/// Arguments for `dpanel new`.
#[derive(Args, Debug)]
pub struct NewArgs {
    /// Grid size: a multiple of 9 between 9 and 54.
    #[arg(long, default_value_t = 27)]
    pub size: i64,

    /// Menu title.
    #[arg(long)]
    pub title: Option<String>,

    /// Open command.
    #[arg(long)]
    pub command: Option<String>,

    /// Output editor state JSON. Defaults to the persisted editor state.
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

/// Build the panel described by `args`.
pub fn new_panel(args: &NewArgs) -> Result<Panel> {
    let size = check_size(args.size).map_err(|reason| anyhow!("invalid --size {}: {reason}", args.size))?;
    let mut panel = Panel {
        size,
        ..Panel::default()
    };
    if let Some(title) = &args.title {
        panel.menu_title = title.clone();
    }
    if let Some(command) = &args.command {
        panel.open_command = command.clone();
    }
    Ok(panel)
}

/// Execute the new subcommand.
pub fn run_new(args: &NewArgs, config: &CliConfig) -> Result<u8> {
    let panel = new_panel(args)?;
    match &args.output {
        Some(path) => {
            write_panel_json(path, &panel)?;
            println!("  created:     {}", path.display());
        }
        None => {
            save_state(config, &panel)?;
            println!("  created:     {} ({})", config.state_dir.display(), config.state_key);
        }
    }
    println!("  size:        {} ({} rows)", panel.size, panel.rows());
    Ok(0)
}
