//! # Export Subcommand
//!
//! Compiles an editor state snapshot into the plugin's YAML file and
//! prints the document fingerprint.
//!
//! ```bash
//! dpanel export shop.json -o shop.yml
//! dpanel export            # uses the persisted editor state
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use dpanel_config::{compile, fingerprint, render_yaml};

use crate::config::CliConfig;
use crate::{read_panel_json, restore_state, write_text};

/// Arguments for `dpanel export`.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Editor state JSON to export. Defaults to the persisted editor state.
    pub state: Option<PathBuf>,

    /// Output YAML file. Defaults to `export_file` from the configuration.
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Print the YAML to stdout instead of writing a file.
    #[arg(long, conflicts_with = "output")]
    pub stdout: bool,
}

/// Execute the export subcommand.
pub fn run_export(args: &ExportArgs, config: &CliConfig) -> Result<u8> {
    let panel = match &args.state {
        Some(path) => read_panel_json(path)?,
        None => restore_state(config)?,
    };

    for problem in panel.validate() {
        tracing::warn!("{problem}");
    }

    let doc = compile(&panel);
    let yaml = render_yaml(&doc).context("failed to render YAML")?;
    let digest = fingerprint(&doc).context("failed to fingerprint document")?;

    if args.stdout {
        print!("{yaml}");
        return Ok(0);
    }

    let output = args.output.clone().unwrap_or_else(|| config.export_file.clone());
    write_text(&output, &yaml)?;
    tracing::info!(output = %output.display(), items = panel.items.len(), "exported panel");

    println!("  output:      {}", output.display());
    println!("  items:       {}", panel.items.len());
    println!("  fingerprint: {digest}");
    Ok(0)
}
