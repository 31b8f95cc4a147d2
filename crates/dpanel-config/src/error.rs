//! Errors raised around the document text format.
//!
//! Compiling never fails and loading has its own `LoadError`; these cover
//! turning documents into YAML text and back, and the combined import path.

use dpanel_core::{CanonicalizationError, LoadError};
use thiserror::Error;

/// Failure converting between a document and its YAML text.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The YAML text could not be parsed or rendered.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML constructs with no document equivalent (complex keys, NaN).
    #[error("unsupported YAML: {0}")]
    Unsupported(String),

    /// The top level of the file is not a mapping.
    #[error("top level of the document must be a mapping, found {found}")]
    NotAMapping {
        /// Shape of the top-level value.
        found: &'static str,
    },

    /// Canonical serialization for fingerprinting failed.
    #[error(transparent)]
    Canonicalization(#[from] CanonicalizationError),
}

/// Failure importing YAML text as a panel.
#[derive(Error, Debug)]
pub enum ImportError {
    /// The text is not a usable document.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// The document does not describe a valid panel.
    #[error(transparent)]
    Load(#[from] LoadError),
}
