//! # CLI Configuration
//!
//! Optional YAML file passed with `--config`. Every field has a default,
//! so an empty file (or no file) is valid. Unknown keys are rejected to
//! catch typos. Command-line flags override file values.
//!
//! ```yaml
//! action_policy: skip
//! state_dir: .dpanel
//! export_file: deluxemenus_config.yml
//! state_key: deluxepanels_editor_state
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use dpanel_config::ActionPolicy;
use dpanel_store::{validate_key, DEFAULT_STATE_KEY};

/// Default directory of the file-backed editor state store.
pub const DEFAULT_STATE_DIR: &str = ".dpanel";

/// Default output file of `dpanel export`.
pub const DEFAULT_EXPORT_FILE: &str = "deluxemenus_config.yml";

/// Resolved CLI settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// What `import` and `check` do with malformed action strings.
    pub action_policy: ActionPolicy,
    /// Directory of the file-backed editor state store.
    pub state_dir: PathBuf,
    /// Output file of `export` when `-o` is not given.
    pub export_file: PathBuf,
    /// Key of the editor state snapshot.
    pub state_key: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            action_policy: ActionPolicy::Reject,
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
            export_file: PathBuf::from(DEFAULT_EXPORT_FILE),
            state_key: DEFAULT_STATE_KEY.to_string(),
        }
    }
}

impl CliConfig {
    /// Parse a YAML configuration document.
    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(text).context("invalid CLI configuration")?;
        validate_key(&config.state_key).context("invalid state_key")?;
        Ok(config)
    }

    /// Read the configuration file at `path`, or the defaults when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config = Self::from_yaml(&text)
            .with_context(|| format!("in config file {}", path.display()))?;
        tracing::debug!(path = %path.display(), ?config, "loaded CLI configuration");
        Ok(config)
    }

    /// Apply global command-line overrides.
    pub fn with_overrides(mut self, state_dir: Option<PathBuf>, state_key: Option<String>) -> Result<Self> {
        if let Some(dir) = state_dir {
            self.state_dir = dir;
        }
        if let Some(key) = state_key {
            validate_key(&key).context("invalid --state-key")?;
            self.state_key = key;
        }
        Ok(self)
    }
}
