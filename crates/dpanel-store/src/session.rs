//! # Editor Session State
//!
//! The editor persists the whole [`Panel`] as one JSON snapshot under a
//! fixed key, using the model's own camelCase field names. A fresh session
//! with nothing stored starts from [`Panel::default`].

use dpanel_config::Panel;

use crate::error::StoreError;
use crate::store::{validate_key, KeyValueStore};

/// Key the editor stores its snapshot under.
pub const DEFAULT_STATE_KEY: &str = "deluxepanels_editor_state";

/// Load the panel stored under `key`, or the default panel if none is.
///
/// # Errors
///
/// `StoreError::CorruptState` if a snapshot exists but does not decode.
pub fn restore(store: &dyn KeyValueStore, key: &str) -> Result<Panel, StoreError> {
    match store.get(key)? {
        Some(bytes) => {
            let panel: Panel = serde_json::from_slice(&bytes).map_err(|source| {
                StoreError::CorruptState {
                    key: key.to_string(),
                    source,
                }
            })?;
            tracing::debug!(key, items = panel.items.len(), "restored editor state");
            Ok(panel)
        }
        None => {
            tracing::debug!(key, "no editor state stored; starting from default panel");
            Ok(Panel::default())
        }
    }
}

/// Store `panel` as the snapshot under `key`.
pub fn save(store: &dyn KeyValueStore, key: &str, panel: &Panel) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec_pretty(panel).map_err(StoreError::Serialize)?;
    store.set(key, &bytes)
}

/// A store bound to one snapshot key.
pub struct EditorState<'s> {
    store: &'s dyn KeyValueStore,
    key: String,
}

impl<'s> EditorState<'s> {
    /// Bind `store` to `key`.
    pub fn new(store: &'s dyn KeyValueStore, key: impl Into<String>) -> Result<Self, StoreError> {
        let key = key.into();
        validate_key(&key)?;
        Ok(Self { store, key })
    }

    /// Bind `store` to [`DEFAULT_STATE_KEY`].
    pub fn with_default_key(store: &'s dyn KeyValueStore) -> Self {
        Self {
            store,
            key: DEFAULT_STATE_KEY.to_string(),
        }
    }

    /// The snapshot key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// See [`restore`].
    pub fn restore(&self) -> Result<Panel, StoreError> {
        restore(self.store, &self.key)
    }

    /// See [`save`].
    pub fn save(&self, panel: &Panel) -> Result<(), StoreError> {
        save(self.store, &self.key, panel)
    }

    /// Drop the snapshot. Returns true if one existed.
    pub fn clear(&self) -> Result<bool, StoreError> {
        self.store.remove(&self.key)
    }
}
