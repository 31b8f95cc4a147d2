//! # Actions
//!
//! An action is a bracketed command run when the menu opens or a slot is
//! clicked. In the document every action is a single string:
//!
//! ```text
//! [message] Hello
//! [console] give %player_name% diamond 1
//! [close]                      <- note the trailing space: value is empty
//! ```
//!
//! The type vocabulary is open-ended; the editor offers a handful of
//! common ones (see [`COMMON_ACTION_TYPES`]) but any custom type is kept.

use dpanel_core::ActionGrammarViolation;
use serde::{Deserialize, Serialize};

/// Action types the editor offers out of the box.
pub const COMMON_ACTION_TYPES: &[&str] = &["close", "sound", "message", "takemoney", "console"];

/// Default value for a freshly added `sound` action.
pub const DEFAULT_SOUND: &str = "ENTITY_PLAYER_LEVELUP";

/// One bracketed command.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Action {
    /// Action type, e.g. `message`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Argument passed to the action; may be empty.
    pub value: String,
}

impl Action {
    /// Build an action from its type and value.
    pub fn new(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
        }
    }

    /// The editor's starting point for a new action of `kind`.
    pub fn template(kind: &str) -> Self {
        let value = if kind == "sound" { DEFAULT_SOUND } else { "" };
        Self::new(kind, value)
    }

    /// Encode as `[<type>] <value>`.
    pub fn encode(&self) -> String {
        format!("[{}] {}", self.kind, self.value)
    }

    /// Parse a `[<type>] <value>` string.
    ///
    /// The value is everything after the single separating space, kept
    /// verbatim, so `parse(a.encode()) == a` for any action whose type is
    /// non-empty and bracket-free.
    pub fn parse(raw: &str) -> Result<Self, ActionGrammarViolation> {
        let rest = raw
            .strip_prefix('[')
            .ok_or(ActionGrammarViolation::MissingOpenBracket)?;
        let close = rest
            .find(']')
            .ok_or(ActionGrammarViolation::MissingCloseBracket)?;
        let kind = &rest[..close];
        if kind.is_empty() {
            return Err(ActionGrammarViolation::EmptyType);
        }
        if kind.contains('[') {
            return Err(ActionGrammarViolation::NestedBrackets);
        }
        let value = rest[close + 1..]
            .strip_prefix(' ')
            .ok_or(ActionGrammarViolation::MissingSeparator)?;
        Ok(Self::new(kind, value))
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind, self.value)
    }
}

/// Encode a sequence of actions, preserving order.
pub fn encode_actions(actions: &[Action]) -> Vec<String> {
    actions.iter().map(Action::encode).collect()
}
