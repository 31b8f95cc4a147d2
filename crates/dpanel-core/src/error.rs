//! # Error Types: Import Error Taxonomy
//!
//! Export is total, so every error here originates from import or from
//! canonicalization.
//!
//! ## Design
//!
//! - Schema errors name the offending field path and, where relevant,
//!   the expected vs actual shape.
//! - Action grammar errors carry the raw action string and the specific
//!   grammar rule it violated.
//! - `LoadError` is the single error type returned by the loader.

use std::fmt;

use serde_json::Number;
use thiserror::Error;

use crate::path::FieldPath;

/// A structurally invalid document.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// A required field is absent (or null).
    #[error("{path}: missing required field")]
    MissingField {
        /// Path of the missing field.
        path: FieldPath,
    },

    /// A field holds a value of the wrong shape.
    #[error("{path}: expected {expected}, found {found}")]
    InvalidType {
        /// Path of the offending value.
        path: FieldPath,
        /// Shape that was expected (e.g. `integer`, `mapping`).
        expected: &'static str,
        /// Shape that was found.
        found: &'static str,
    },

    /// The grid size is not a multiple of 9 in `[9, 54]`.
    #[error("{path}: invalid menu size {size}: {reason}")]
    InvalidSize {
        /// Path of the size field.
        path: FieldPath,
        /// The rejected value.
        size: Number,
        /// Which bound was violated.
        reason: &'static str,
    },

    /// A requirement `type` outside the closed set.
    #[error("{path}: unknown requirement type {found:?}")]
    UnknownRequirementType {
        /// Path of the `type` field.
        path: FieldPath,
        /// The rejected type string.
        found: String,
    },

    /// Two fields that must not appear together.
    #[error("{path}: `{first}` and `{second}` are mutually exclusive")]
    ConflictingFields {
        /// Path of the record holding both fields.
        path: FieldPath,
        /// First field name.
        first: &'static str,
        /// Second field name.
        second: &'static str,
    },

    /// A value of the right shape but outside its allowed domain.
    #[error("{path}: {message}")]
    InvalidValue {
        /// Path of the offending value.
        path: FieldPath,
        /// What was wrong with it.
        message: String,
    },
}

impl SchemaError {
    /// The path of the offending field.
    pub fn path(&self) -> &FieldPath {
        match self {
            Self::MissingField { path }
            | Self::InvalidType { path, .. }
            | Self::InvalidSize { path, .. }
            | Self::UnknownRequirementType { path, .. }
            | Self::ConflictingFields { path, .. }
            | Self::InvalidValue { path, .. } => path,
        }
    }
}

/// The grammar rule a malformed action string violated.
///
/// The grammar is `[<type>] <value>`: an opening bracket, a non-empty type
/// free of brackets, a closing bracket, exactly one space, then the value
/// (which may be empty and may contain anything).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionGrammarViolation {
    /// The string does not start with `[`.
    MissingOpenBracket,
    /// No `]` closes the type.
    MissingCloseBracket,
    /// `[]` with nothing between the brackets.
    EmptyType,
    /// The type itself contains a bracket, e.g. `[[message]] hi`.
    NestedBrackets,
    /// The closing bracket is not followed by a space.
    MissingSeparator,
}

impl fmt::Display for ActionGrammarViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::MissingOpenBracket => "action must start with `[`",
            Self::MissingCloseBracket => "action type is not closed with `]`",
            Self::EmptyType => "action type is empty",
            Self::NestedBrackets => "action type contains more than one bracket pair",
            Self::MissingSeparator => "action type must be followed by a single space",
        };
        f.write_str(msg)
    }
}

/// A bracketed action string that does not follow `[<type>] <value>`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{path}: malformed action {raw:?}: {violation}")]
pub struct ActionGrammarError {
    /// Path of the action string within its sequence.
    pub path: FieldPath,
    /// The rejected string, verbatim.
    pub raw: String,
    /// Which grammar rule was broken.
    pub violation: ActionGrammarViolation,
}

/// Failure to turn a document into a panel.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    /// The document structure is invalid.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// An action string is malformed and the reject policy is in effect.
    #[error("action grammar error: {0}")]
    ActionGrammar(#[from] ActionGrammarError),
}

impl LoadError {
    /// The path of the offending field.
    pub fn path(&self) -> &FieldPath {
        match self {
            Self::Schema(e) => e.path(),
            Self::ActionGrammar(e) => &e.path,
        }
    }
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_error_display_leads_with_path() {
        let err = SchemaError::InvalidSize {
            path: FieldPath::root().key("size"),
            size: Number::from(10),
            reason: "must be a multiple of 9",
        };
        assert_eq!(
            err.to_string(),
            "size: invalid menu size 10: must be a multiple of 9"
        );
    }

    #[test]
    fn load_error_exposes_inner_path() {
        let path = FieldPath::root()
            .key("items")
            .key("slot_1")
            .key("click_commands")
            .index(0);
        let err: LoadError = ActionGrammarError {
            path: path.clone(),
            raw: "message Hello".to_string(),
            violation: ActionGrammarViolation::MissingOpenBracket,
        }
        .into();
        assert_eq!(err.path(), &path);
        assert!(err.to_string().contains("must start with `[`"));
    }

    #[test]
    fn unknown_type_mentions_found_value() {
        let err = SchemaError::UnknownRequirementType {
            path: FieldPath::root().key("type"),
            found: "has_diamond".to_string(),
        };
        assert!(err.to_string().contains("\"has_diamond\""));
    }
}
