//! # dpanel-cli: Panel Configuration CLI
//!
//! Provides the `dpanel` command-line interface over the compiler, the
//! loader and the editor state store.
//!
//! ## Subcommands
//!
//! - `dpanel export`: editor state JSON to plugin YAML.
//! - `dpanel import`: plugin YAML to editor state JSON.
//! - `dpanel check`: verify a YAML file survives import and re-export.
//! - `dpanel new`: write a fresh editor state.
//! - `dpanel state`: inspect or clear the persisted editor state.
//!
//! ```bash
//! dpanel import shop.yml -o shop.json --skip-malformed-actions
//! dpanel export shop.json -o shop.yml
//! dpanel check shop.yml
//! ```

pub mod check;
pub mod config;
pub mod export;
pub mod import;
pub mod new;
pub mod state;

use std::path::Path;

use anyhow::{Context, Result};

use dpanel_config::Panel;
use dpanel_store::{EditorState, FileStore};

use crate::config::CliConfig;

/// Read an editor state snapshot (camelCase panel JSON) from a file.
pub fn read_panel_json(path: &Path) -> Result<Panel> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read editor state: {}", path.display()))?;
    serde_json::from_slice(&bytes)
        .with_context(|| format!("invalid editor state in {}", path.display()))
}

/// Write an editor state snapshot to a file.
pub fn write_panel_json(path: &Path, panel: &Panel) -> Result<()> {
    let json = serde_json::to_string_pretty(panel).context("failed to serialize editor state")?;
    write_text(path, &json)
}

/// Write `text` to `path`, creating parent directories.
pub fn write_text(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
}

/// The file-backed store named by the configuration.
pub fn file_store(config: &CliConfig) -> FileStore {
    FileStore::new(&config.state_dir)
}

/// Restore the persisted panel, or the default when nothing is stored.
pub fn restore_state(config: &CliConfig) -> Result<Panel> {
    let store = file_store(config);
    let state = EditorState::new(&store, config.state_key.as_str())?;
    state
        .restore()
        .with_context(|| format!("failed to restore editor state from {}", store.dir().display()))
}

/// Persist `panel` as the editor state.
pub fn save_state(config: &CliConfig, panel: &Panel) -> Result<()> {
    let store = file_store(config);
    let state = EditorState::new(&store, config.state_key.as_str())?;
    state
        .save(panel)
        .with_context(|| format!("failed to save editor state to {}", store.dir().display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_in(dir: &Path) -> CliConfig {
        CliConfig {
            state_dir: dir.join("state"),
            ..CliConfig::default()
        }
    }

    #[test]
    fn panel_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");
        let mut panel = Panel::default();
        panel.ensure_slot(4);
        write_panel_json(&path, &panel).unwrap();
        assert_eq!(read_panel_json(&path).unwrap(), panel);
    }

    #[test]
    fn read_panel_json_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "not json").unwrap();
        let err = read_panel_json(&path).unwrap_err();
        assert!(format!("{err:#}").contains("broken.json"));
    }

    #[test]
    fn state_defaults_then_persists() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        assert_eq!(restore_state(&config).unwrap(), Panel::default());
        let panel = Panel {
            size: 54,
            ..Panel::default()
        };
        save_state(&config, &panel).unwrap();
        assert_eq!(restore_state(&config).unwrap().size, 54);
        assert!(dir
            .path()
            .join("state")
            .join("deluxepanels_editor_state.json")
            .exists());
    }

    #[test]
    fn public_modules_are_accessible() {
        let _ = std::any::type_name::<check::CheckArgs>();
        let _ = std::any::type_name::<export::ExportArgs>();
        let _ = std::any::type_name::<import::ImportArgs>();
        let _ = std::any::type_name::<new::NewArgs>();
        let _ = std::any::type_name::<state::StateArgs>();
    }
}
