//! # Check Subcommand
//!
//! Verifies that a plugin YAML file survives import and re-export: the
//! file is loaded and compiled, the result is loaded and compiled again,
//! and the two rendered documents must match byte for byte.
//!
//! Exit code 0 when stable, 1 otherwise. A file that normalizes on the
//! first pass (aliases, dropped keys) is still stable; the fingerprints of
//! the source and the export are both reported so the change is visible.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use dpanel_config::{compile, fingerprint, load_with, parse_yaml, render_yaml, LoadOptions, LoadWarning};
use dpanel_core::ContentDigest;

use crate::config::CliConfig;

/// Arguments for `dpanel check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Plugin menu YAML file.
    pub menu: PathBuf,

    /// Drop malformed action strings instead of failing.
    #[arg(long)]
    pub skip_malformed_actions: bool,
}

/// Result of checking one document.
#[derive(Debug)]
pub struct CheckReport {
    /// Warnings from the first load.
    pub warnings: Vec<LoadWarning>,
    /// Fingerprint of the document as read.
    pub source: ContentDigest,
    /// Fingerprint of the first export.
    pub exported: ContentDigest,
    /// Whether the second export rendered identically to the first.
    pub stable: bool,
}

impl CheckReport {
    /// Whether the export differs from the source document.
    pub fn normalized(&self) -> bool {
        self.source != self.exported
    }
}

/// Check YAML text.
pub fn check_text(text: &str, options: &LoadOptions) -> Result<CheckReport> {
    let doc = parse_yaml(text)?;
    let first = load_with(&doc, options)?;
    let exported = compile(&first.panel);
    let first_yaml = render_yaml(&exported)?;

    let reparsed = parse_yaml(&first_yaml).context("re-exported YAML does not parse")?;
    let second = load_with(&reparsed, options).context("re-exported YAML does not load")?;
    let second_yaml = render_yaml(&compile(&second.panel))?;

    Ok(CheckReport {
        warnings: first.warnings,
        source: fingerprint(&doc)?,
        exported: fingerprint(&exported)?,
        stable: first_yaml == second_yaml,
    })
}

/// Execute the check subcommand.
pub fn run_check(args: &CheckArgs, config: &CliConfig) -> Result<u8> {
    let text = std::fs::read_to_string(&args.menu)
        .with_context(|| format!("failed to read {}", args.menu.display()))?;
    let policy = if args.skip_malformed_actions {
        dpanel_config::ActionPolicy::Skip
    } else {
        config.action_policy
    };
    let report = check_text(&text, &LoadOptions::with_action_policy(policy))
        .with_context(|| format!("failed to check {}", args.menu.display()))?;

    for warning in &report.warnings {
        println!("  warning: {warning}");
    }
    println!("  source:      {}", report.source);
    println!("  exported:    {}", report.exported);
    if report.normalized() {
        println!("  note:        export differs from the source document");
    }

    if report.stable {
        println!("  OK: {} is stable under import and export", args.menu.display());
        Ok(0)
    } else {
        println!("  FAIL: {} changes on a second round trip", args.menu.display());
        Ok(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORTED: &str = "menu_title: x\nopen_command: x\nregister_command: false\nsize: 9\nitems:\n  slot_0:\n    slot: 0\n    material: STONE\n";

    #[test]
    fn compiled_document_is_stable_and_unchanged() {
        let report = check_text(EXPORTED, &LoadOptions::default()).unwrap();
        assert!(report.stable);
        assert!(!report.normalized());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn aliases_normalize_but_stay_stable() {
        let text = "size: 9\nitems:\n  slot_0:\n    slot: 0\n    view_requirement:\n      requirements:\n        lvl:\n          type: gte\n          input: '%player_level%'\n          output: 5\n";
        let report = check_text(text, &LoadOptions::default()).unwrap();
        assert!(report.stable);
        assert!(report.normalized());
    }

    #[test]
    fn invalid_document_is_an_error() {
        assert!(check_text("size: 10\n", &LoadOptions::default()).is_err());
    }

    #[test]
    fn run_check_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("menu.yml");
        std::fs::write(&path, EXPORTED).unwrap();
        let args = CheckArgs {
            menu: path,
            skip_malformed_actions: false,
        };
        assert_eq!(run_check(&args, &CliConfig::default()).unwrap(), 0);
    }
}
