//! # Store Error Types

use thiserror::Error;

/// Errors from editor state persistence.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Key contains characters outside `[A-Za-z0-9_-]`, or is empty.
    #[error("invalid store key {0:?}: keys must be non-empty and match [A-Za-z0-9_-]")]
    InvalidKey(String),

    /// The persisted snapshot is not a valid panel.
    #[error("corrupt editor state under {key:?}: {source}")]
    CorruptState {
        /// Key the snapshot was read from.
        key: String,
        /// Why it could not be decoded.
        #[source]
        source: serde_json::Error,
    },

    /// The panel could not be serialized.
    #[error("failed to serialize editor state: {0}")]
    Serialize(#[source] serde_json::Error),

    /// I/O error (file-backed store).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
