//! # Requirement Model
//!
//! Requirements are conditional gates attached to a slot: they decide
//! whether the slot is shown (`view_requirement`) or whether a left/right
//! click runs its commands. Each requirement is one of six variants:
//!
//! | Variant              | Types                                                    | Required fields        |
//! |----------------------|----------------------------------------------------------|------------------------|
//! | `HasPermission`      | `has permission`                                         | `permission`           |
//! | `HasMoney`           | `has money`                                              | `amount`               |
//! | `HasItem`            | `has item`                                               | `material`             |
//! | `ScriptExpression`   | `javascript`                                             | `expression`           |
//! | `StringComparison`   | `string equals`, `string equals ignorecase`, `string contains`, `regex matches` | `input`, `output` |
//! | `NumericComparison`  | `==`, `>=`, `<=`, `!=`, `>`, `<`                         | `input`, `output`      |
//!
//! A variant carries only its own fields, so a money check can never hold
//! a stray `permission`. The model validates nothing on construction; the
//! loader enforces field obligations when reading a document.

use std::collections::BTreeMap;
use std::str::FromStr;

use dpanel_core::FieldPath;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};
use thiserror::Error;

// ---------------------------------------------------------------------------
// RequirementType
// ---------------------------------------------------------------------------

/// The closed set of requirement types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RequirementType {
    /// Player holds a permission node.
    HasPermission,
    /// Player balance is at least an amount.
    HasMoney,
    /// Player inventory contains a matching item.
    HasItem,
    /// A script expression evaluates to true.
    ScriptExpression,
    /// `input` equals `output`.
    StringEquals,
    /// `input` equals `output`, ignoring case.
    StringEqualsIgnoreCase,
    /// `input` contains `output`.
    StringContains,
    /// `input` matches the regex in `output`.
    RegexMatches,
    /// Numeric `==`.
    Eq,
    /// Numeric `>=`.
    Gte,
    /// Numeric `<=`.
    Lte,
    /// Numeric `!=`.
    Neq,
    /// Numeric `>`.
    Gt,
    /// Numeric `<`.
    Lt,
}

/// Error returned when parsing a type string outside the closed set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown requirement type {0:?}")]
pub struct UnknownRequirementType(pub String);

impl RequirementType {
    /// All fourteen types in declaration order.
    pub fn all() -> &'static [RequirementType] {
        &[
            Self::HasPermission,
            Self::HasMoney,
            Self::HasItem,
            Self::ScriptExpression,
            Self::StringEquals,
            Self::StringEqualsIgnoreCase,
            Self::StringContains,
            Self::RegexMatches,
            Self::Eq,
            Self::Gte,
            Self::Lte,
            Self::Neq,
            Self::Gt,
            Self::Lt,
        ]
    }

    /// The spelling the plugin reads, emitted by the compiler.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::HasPermission => "has permission",
            Self::HasMoney => "has money",
            Self::HasItem => "has item",
            Self::ScriptExpression => "javascript",
            Self::StringEquals => "string equals",
            Self::StringEqualsIgnoreCase => "string equals ignorecase",
            Self::StringContains => "string contains",
            Self::RegexMatches => "regex matches",
            Self::Eq => "==",
            Self::Gte => ">=",
            Self::Lte => "<=",
            Self::Neq => "!=",
            Self::Gt => ">",
            Self::Lt => "<",
        }
    }

    /// The snake_case identifier, accepted by the loader as an alias.
    pub fn identifier(&self) -> &'static str {
        match self {
            Self::HasPermission => "has_permission",
            Self::HasMoney => "has_money",
            Self::HasItem => "has_item",
            Self::ScriptExpression => "script_expression",
            Self::StringEquals => "string_equals",
            Self::StringEqualsIgnoreCase => "string_equals_ignorecase",
            Self::StringContains => "string_contains",
            Self::RegexMatches => "regex_matches",
            Self::Eq => "eq",
            Self::Gte => "gte",
            Self::Lte => "lte",
            Self::Neq => "neq",
            Self::Gt => "gt",
            Self::Lt => "lt",
        }
    }

    /// Document keys a requirement of this type may carry.
    pub fn known_fields(&self) -> &'static [&'static str] {
        match self {
            Self::HasPermission => &["type", "permission", "success_commands", "deny_commands", "optional"],
            Self::HasMoney => &["type", "amount", "success_commands", "deny_commands", "optional"],
            Self::HasItem => &[
                "type",
                "material",
                "amount",
                "name",
                "lore",
                "name_contains",
                "name_ignorecase",
                "lore_contains",
                "lore_ignorecase",
                "strict",
                "armor",
                "offhand",
                "success_commands",
                "deny_commands",
                "optional",
            ],
            Self::ScriptExpression => &["type", "expression", "success_commands", "deny_commands", "optional"],
            _ => &["type", "input", "output", "success_commands", "deny_commands", "optional"],
        }
    }
}

impl std::fmt::Display for RequirementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for RequirementType {
    type Err = UnknownRequirementType;

    /// Accepts either the wire name or the snake_case identifier.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|t| t.wire_name() == s || t.identifier() == s)
            .ok_or_else(|| UnknownRequirementType(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Variant payloads
// ---------------------------------------------------------------------------

/// String comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringComparison {
    /// `string equals`
    Equals,
    /// `string equals ignorecase`
    EqualsIgnoreCase,
    /// `string contains`
    Contains,
    /// `regex matches`
    RegexMatches,
}

/// Numeric comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericComparison {
    /// `==`
    Eq,
    /// `>=`
    Gte,
    /// `<=`
    Lte,
    /// `!=`
    Neq,
    /// `>`
    Gt,
    /// `<`
    Lt,
}

/// A comparator operand: literal text (often a placeholder such as
/// `%player_level%`) or a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Operand {
    /// Text operand.
    Text(String),
    /// Numeric operand.
    Number(Number),
}

impl Operand {
    /// Document representation.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Text(s) => Value::String(s.clone()),
            Self::Number(n) => Value::Number(n.clone()),
        }
    }
}

impl From<&str> for Operand {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<i64> for Operand {
    fn from(n: i64) -> Self {
        Self::Number(Number::from(n))
    }
}

/// Lore to match on a `has item` check: one line or several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemLore {
    /// A single line.
    Line(String),
    /// Multiple lines.
    Lines(Vec<String>),
}

impl ItemLore {
    /// Document representation.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Line(s) => Value::String(s.clone()),
            Self::Lines(lines) => Value::from(lines.clone()),
        }
    }
}

/// Payload of a `has item` requirement.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ItemCheck {
    /// Material the item must be.
    pub material: String,
    /// Minimum stack amount.
    pub amount: Option<Number>,
    /// Display name to match.
    pub name: Option<String>,
    /// Lore to match.
    pub lore: Option<ItemLore>,
    /// Match when the name contains `name` rather than equals it.
    pub name_contains: Option<bool>,
    /// Ignore case when matching the name.
    pub name_ignorecase: Option<bool>,
    /// Match when the lore contains `lore`.
    pub lore_contains: Option<bool>,
    /// Ignore case when matching the lore.
    pub lore_ignorecase: Option<bool>,
    /// Require an exact item match.
    pub strict: Option<bool>,
    /// Also search armor slots.
    pub armor: Option<bool>,
    /// Also search the off hand.
    pub offhand: Option<bool>,
}

impl ItemCheck {
    /// A check for `material` with every optional field unset.
    pub fn new(material: impl Into<String>) -> Self {
        Self {
            material: material.into(),
            ..Self::default()
        }
    }

    /// The matching-mode flags in document order, paired with their keys.
    pub fn flags(&self) -> [(&'static str, Option<bool>); 7] {
        [
            ("name_contains", self.name_contains),
            ("name_ignorecase", self.name_ignorecase),
            ("lore_contains", self.lore_contains),
            ("lore_ignorecase", self.lore_ignorecase),
            ("strict", self.strict),
            ("armor", self.armor),
            ("offhand", self.offhand),
        ]
    }
}

/// Variant-specific part of a requirement.
#[derive(Debug, Clone, PartialEq)]
pub enum RequirementKind {
    /// `has permission`
    HasPermission {
        /// Permission node; may be empty but is always written.
        permission: String,
    },
    /// `has money`
    HasMoney {
        /// Required balance.
        amount: Number,
    },
    /// `has item`
    HasItem(ItemCheck),
    /// `javascript`
    ScriptExpression {
        /// Expression evaluated by the plugin.
        expression: String,
    },
    /// String comparators.
    StringComparison {
        /// Operator.
        comparison: StringComparison,
        /// Left-hand side.
        input: Operand,
        /// Right-hand side.
        output: Operand,
    },
    /// Numeric comparators.
    NumericComparison {
        /// Operator.
        comparison: NumericComparison,
        /// Left-hand side.
        input: Operand,
        /// Right-hand side.
        output: Operand,
    },
}

impl RequirementKind {
    /// The requirement type this payload represents.
    pub fn requirement_type(&self) -> RequirementType {
        match self {
            Self::HasPermission { .. } => RequirementType::HasPermission,
            Self::HasMoney { .. } => RequirementType::HasMoney,
            Self::HasItem(_) => RequirementType::HasItem,
            Self::ScriptExpression { .. } => RequirementType::ScriptExpression,
            Self::StringComparison { comparison, .. } => match comparison {
                StringComparison::Equals => RequirementType::StringEquals,
                StringComparison::EqualsIgnoreCase => RequirementType::StringEqualsIgnoreCase,
                StringComparison::Contains => RequirementType::StringContains,
                StringComparison::RegexMatches => RequirementType::RegexMatches,
            },
            Self::NumericComparison { comparison, .. } => match comparison {
                NumericComparison::Eq => RequirementType::Eq,
                NumericComparison::Gte => RequirementType::Gte,
                NumericComparison::Lte => RequirementType::Lte,
                NumericComparison::Neq => RequirementType::Neq,
                NumericComparison::Gt => RequirementType::Gt,
                NumericComparison::Lt => RequirementType::Lt,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Requirement
// ---------------------------------------------------------------------------

/// One conditional gate.
///
/// Serializes to the same record the compiler emits, so persisted editor
/// state and exported documents share one requirement format.
#[derive(Debug, Clone, PartialEq)]
pub struct Requirement {
    /// Variant payload.
    pub kind: RequirementKind,
    /// Commands run when the check passes.
    pub success_commands: Vec<String>,
    /// Commands run when the check fails.
    pub deny_commands: Vec<String>,
    /// Whether the check may fail without failing the group. Unset reads
    /// as `false`.
    pub optional: Option<bool>,
}

impl Requirement {
    /// A requirement with no commands and `optional` unset.
    pub fn new(kind: RequirementKind) -> Self {
        Self {
            kind,
            success_commands: Vec::new(),
            deny_commands: Vec::new(),
            optional: None,
        }
    }

    /// `has permission` check.
    pub fn permission(permission: impl Into<String>) -> Self {
        Self::new(RequirementKind::HasPermission {
            permission: permission.into(),
        })
    }

    /// `has money` check.
    pub fn money(amount: impl Into<Number>) -> Self {
        Self::new(RequirementKind::HasMoney {
            amount: amount.into(),
        })
    }

    /// `javascript` check.
    pub fn script(expression: impl Into<String>) -> Self {
        Self::new(RequirementKind::ScriptExpression {
            expression: expression.into(),
        })
    }

    /// Replace the deny commands.
    pub fn with_deny_commands<I, S>(mut self, commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.deny_commands = commands.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the success commands.
    pub fn with_success_commands<I, S>(mut self, commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.success_commands = commands.into_iter().map(Into::into).collect();
        self
    }

    /// The requirement's type.
    pub fn requirement_type(&self) -> RequirementType {
        self.kind.requirement_type()
    }

    /// Effective `optional` flag.
    pub fn is_optional(&self) -> bool {
        self.optional.unwrap_or(false)
    }
}

impl Serialize for Requirement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        crate::compiler::encode_requirement(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Requirement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        crate::loader::decode_requirement(&value, &FieldPath::root())
            .map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// RequirementGroup
// ---------------------------------------------------------------------------

/// A collection of requirements evaluated together, plus group-level deny
/// behavior.
///
/// Group-local keys are opaque identifiers; the map keeps them unique.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RequirementGroup {
    /// Requirements by group-local key.
    #[serde(default)]
    pub requirements: BTreeMap<String, Requirement>,
    /// Commands run when the group as a whole fails.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deny_commands: Vec<String>,
    /// How many requirements must pass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_requirements: Option<i64>,
    /// Stop evaluating once enough requirements pass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_at_success: Option<bool>,
}

impl RequirementGroup {
    /// Add a requirement under `key`, replacing any previous one.
    pub fn insert(&mut self, key: impl Into<String>, requirement: Requirement) -> &mut Self {
        self.requirements.insert(key.into(), requirement);
        self
    }

    /// Remove the requirement under `key`.
    pub fn remove(&mut self, key: &str) -> Option<Requirement> {
        self.requirements.remove(key)
    }

    /// The first `requirement_<n>` key not yet used in this group.
    pub fn next_key(&self) -> String {
        (1..)
            .map(|n| format!("requirement_{n}"))
            .find(|k| !self.requirements.contains_key(k))
            .unwrap_or_default()
    }
}
