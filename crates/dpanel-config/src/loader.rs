//! # Panel Loader (import)
//!
//! Reads a configuration [`Document`] back into a [`Panel`]. Accepts
//! everything `compile` produces, plus hand-authored documents that leave
//! optional keys out.
//!
//! ## Lossy Cases
//!
//! Re-compiling a loaded panel reproduces the document except where:
//!
//! - a singleton record is stored under a key other than `slot_<slot>`;
//!   it loads as a one-cell group named after its key;
//! - a requirement `type` uses the snake_case alias; it normalizes to the
//!   wire name;
//! - a malformed action is dropped under [`ActionPolicy::Skip`];
//! - unknown keys are dropped;
//! - an absent `menu_title`, `open_command` or `register_command` is
//!   filled in (`""`, `""`, `false`) and written out on re-export;
//! - a number where text is expected (`display_name: 5`, `lore: [100]`)
//!   is read as its text form and re-exported as a string.
//!
//! Every lossy case except the alias normalization is reported as a
//! [`LoadWarning`]. Every failure carries the path of the offending field.

use std::collections::BTreeMap;
use std::fmt;

use dpanel_core::{
    integer_value, text_seq_value, text_value, ActionGrammarError, Document, FieldPath, LoadError,
    MappingReader, SchemaError,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::action::Action;
use crate::panel::{check_size, Panel};
use crate::requirement::{
    ItemCheck, ItemLore, NumericComparison, Operand, Requirement, RequirementGroup,
    RequirementKind, RequirementType, StringComparison,
};
use crate::slot::{parse_slot_key, slot_key, Slot, Trigger};

const PANEL_FIELDS: &[&str] = &[
    "menu_title",
    "open_command",
    "register_command",
    "open_commands",
    "size",
    "items",
];

const SLOT_FIELDS: &[&str] = &[
    "slot",
    "slots",
    "material",
    "display_name",
    "lore",
    "priority",
    "click_commands",
    "view_requirement",
    "left_click_requirement",
    "right_click_requirement",
    "enchantments",
    "hide_enchantments",
];

const GROUP_FIELDS: &[&str] = &[
    "requirements",
    "deny_commands",
    "minimum_requirements",
    "stop_at_success",
];

const PANEL_TEXT_FIELDS: &[&str] = &["menu_title", "open_command"];

const SLOT_TEXT_FIELDS: &[&str] = &["material", "display_name", "lore", "enchantments"];

const GROUP_TEXT_FIELDS: &[&str] = &["deny_commands"];

const REQUIREMENT_TEXT_FIELDS: &[&str] = &[
    "permission",
    "expression",
    "material",
    "name",
    "lore",
    "success_commands",
    "deny_commands",
];

/// Top-level fields the loader fills in when absent, with the value used.
const PANEL_DEFAULTS: &[(&str, &str)] = &[
    ("menu_title", "\"\""),
    ("open_command", "\"\""),
    ("register_command", "false"),
];

/// What to do with an action string that breaks the `[type] value` grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionPolicy {
    /// Fail the whole document.
    #[default]
    Reject,
    /// Drop the action and record a warning.
    Skip,
}

/// Loader settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Malformed action handling.
    pub action_policy: ActionPolicy,
}

impl LoadOptions {
    /// Options with the given action policy.
    pub fn with_action_policy(action_policy: ActionPolicy) -> Self {
        Self { action_policy }
    }
}

/// A non-fatal finding recorded while loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadWarning {
    /// Where in the document.
    pub path: FieldPath,
    /// What was dropped or changed.
    pub message: String,
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// A loaded panel plus the warnings raised along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
    /// The panel.
    pub panel: Panel,
    /// Non-fatal findings, in document order.
    pub warnings: Vec<LoadWarning>,
}

/// Load a document with the default options (malformed actions rejected).
///
/// # Errors
///
/// Returns `LoadError::Schema` for structural problems and
/// `LoadError::ActionGrammar` for the first malformed action.
pub fn load(raw: &Document) -> Result<Panel, LoadError> {
    load_with(raw, &LoadOptions::default()).map(|outcome| outcome.panel)
}

/// Load a document with explicit options.
///
/// # Errors
///
/// Same as [`load`]; under [`ActionPolicy::Skip`] malformed actions become
/// warnings instead.
pub fn load_with(raw: &Document, options: &LoadOptions) -> Result<LoadOutcome, LoadError> {
    let mut loader = Loader {
        options,
        warnings: Vec::new(),
    };
    let panel = loader.panel(raw)?;
    tracing::debug!(
        items = panel.items.len(),
        size = panel.size,
        warnings = loader.warnings.len(),
        "loaded panel"
    );
    Ok(LoadOutcome {
        panel,
        warnings: loader.warnings,
    })
}

struct Loader<'o> {
    options: &'o LoadOptions,
    warnings: Vec<LoadWarning>,
}

impl Loader<'_> {
    fn panel(&mut self, raw: &Document) -> Result<Panel, LoadError> {
        let root = MappingReader::new(raw, FieldPath::root())?;
        let size = read_size(&root)?;
        self.warn_unknown(&root, PANEL_FIELDS);
        for (key, default) in PANEL_DEFAULTS {
            if !root.contains(key) {
                self.warn(root.field_path(key), format!("absent; defaulted to {default}"));
            }
        }
        self.warn_coerced(&root, PANEL_TEXT_FIELDS);

        let open_commands = match root.opt_seq("open_commands")? {
            Some(items) => self.actions(items, &root.field_path("open_commands"))?,
            None => Vec::new(),
        };

        let mut items = IndexMap::new();
        if let Some(entries) = root.opt_mapping("items")? {
            for (key, value) in entries.entries() {
                let reader = MappingReader::new(value, entries.field_path(key))?;
                let slot = self.slot(key, &reader, size)?;
                items.insert(key.to_string(), slot);
            }
        }

        Ok(Panel {
            menu_title: root.opt_text("menu_title")?.unwrap_or_default(),
            open_command: root.opt_text("open_command")?.unwrap_or_default(),
            register_command: root.opt_bool("register_command")?.unwrap_or(false),
            open_commands,
            size,
            items,
        })
    }

    fn slot(&mut self, key: &str, reader: &MappingReader<'_>, size: u32) -> Result<Slot, LoadError> {
        self.warn_unknown(reader, SLOT_FIELDS);
        self.warn_coerced(reader, SLOT_TEXT_FIELDS);

        let (slots, slot_name) = match (reader.get("slot"), reader.get("slots")) {
            (Some(_), Some(_)) => {
                return Err(SchemaError::ConflictingFields {
                    path: reader.path().clone(),
                    first: "slot",
                    second: "slots",
                }
                .into())
            }
            (None, None) => {
                return Err(SchemaError::MissingField {
                    path: reader.field_path("slot"),
                }
                .into())
            }
            (Some(value), None) => {
                let index = grid_index(value, &reader.field_path("slot"))?;
                self.check_in_grid(index, size, &reader.field_path("slot"));
                if parse_slot_key(key) == Some(index) {
                    (None, None)
                } else {
                    self.warn(
                        reader.field_path("slot"),
                        format!("slot {index} stored under `{key}`; loaded as a one-cell group"),
                    );
                    (Some(vec![index]), Some(key.to_string()))
                }
            }
            (None, Some(_)) => {
                let path = reader.field_path("slots");
                let raw = reader.opt_seq("slots")?.unwrap_or_default();
                if raw.is_empty() {
                    return Err(SchemaError::InvalidValue {
                        path,
                        message: "slots must list at least one grid position".to_string(),
                    }
                    .into());
                }
                let mut indices = Vec::with_capacity(raw.len());
                for (i, value) in raw.iter().enumerate() {
                    let index = grid_index(value, &path.index(i))?;
                    self.check_in_grid(index, size, &path.index(i));
                    indices.push(index);
                }
                let derived = indices.iter().copied().min().map(slot_key);
                let slot_name = (derived.as_deref() != Some(key)).then(|| key.to_string());
                (Some(indices), slot_name)
            }
        };

        let actions = match reader.opt_seq("click_commands")? {
            Some(items) => self.actions(items, &reader.field_path("click_commands"))?,
            None => Vec::new(),
        };

        let mut slot = Slot {
            material: reader.opt_text("material")?,
            display_name: reader.opt_text("display_name")?,
            lore: reader.opt_text_seq("lore")?,
            actions,
            priority: reader.opt_integer("priority")?,
            enchantments: reader.opt_text_seq("enchantments")?.unwrap_or_default(),
            hide_enchantments: reader.opt_bool("hide_enchantments")?,
            slots,
            slot_name,
            ..Slot::default()
        };

        let requirements_path = reader.path().key("requirements");
        for trigger in Trigger::ALL {
            if let Some(value) = reader.get(trigger.key()) {
                let group = MappingReader::new(value, requirements_path.key(trigger.key()))?;
                *slot.requirements.entry(trigger) = Some(self.group(&group)?);
            }
        }
        Ok(slot)
    }

    fn group(&mut self, reader: &MappingReader<'_>) -> Result<RequirementGroup, LoadError> {
        self.warn_unknown(reader, GROUP_FIELDS);
        self.warn_coerced(reader, GROUP_TEXT_FIELDS);
        let mut requirements = BTreeMap::new();
        if let Some(entries) = reader.opt_mapping("requirements")? {
            for (key, value) in entries.entries() {
                let path = entries.field_path(key);
                let requirement = decode_requirement(value, &path)?;
                let record = MappingReader::new(value, path)?;
                let known = requirement.requirement_type().known_fields();
                self.warn_unknown(&record, known);
                let text_fields: Vec<&str> = REQUIREMENT_TEXT_FIELDS
                    .iter()
                    .copied()
                    .filter(|field| known.contains(field))
                    .collect();
                self.warn_coerced(&record, &text_fields);
                requirements.insert(key.to_string(), requirement);
            }
        }
        Ok(RequirementGroup {
            requirements,
            deny_commands: reader.opt_text_seq("deny_commands")?.unwrap_or_default(),
            minimum_requirements: reader.opt_integer("minimum_requirements")?,
            stop_at_success: reader.opt_bool("stop_at_success")?,
        })
    }

    fn actions(&mut self, items: &[Value], path: &FieldPath) -> Result<Vec<Action>, LoadError> {
        let mut actions = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let item_path = path.index(i);
            let raw = text_value(item, &item_path)?;
            match Action::parse(&raw) {
                Ok(action) => actions.push(action),
                Err(violation) => match self.options.action_policy {
                    ActionPolicy::Reject => {
                        return Err(ActionGrammarError {
                            path: item_path,
                            raw,
                            violation,
                        }
                        .into())
                    }
                    ActionPolicy::Skip => {
                        self.warn(item_path, format!("skipped malformed action {raw:?}: {violation}"));
                    }
                },
            }
        }
        Ok(actions)
    }

    fn check_in_grid(&mut self, index: u32, size: u32, path: &FieldPath) {
        if index >= size {
            self.warn(
                path.clone(),
                format!("slot {index} is outside the {size}-slot grid"),
            );
        }
    }

    fn warn_unknown(&mut self, reader: &MappingReader<'_>, known: &[&str]) {
        for path in reader.unknown_keys(known) {
            self.warn(path, "unknown key ignored".to_string());
        }
    }

    fn warn_coerced(&mut self, reader: &MappingReader<'_>, text_fields: &[&str]) {
        for path in reader.numbers_as_text(text_fields) {
            self.warn(path, "number read as text".to_string());
        }
    }

    fn warn(&mut self, path: FieldPath, message: String) {
        tracing::warn!(path = %path, "{message}");
        self.warnings.push(LoadWarning { path, message });
    }
}

fn read_size(root: &MappingReader<'_>) -> Result<u32, SchemaError> {
    let path = root.field_path("size");
    let value = root
        .get("size")
        .ok_or_else(|| SchemaError::MissingField { path: path.clone() })?;
    let Value::Number(number) = value else {
        return Err(SchemaError::InvalidType {
            path,
            expected: "integer",
            found: dpanel_core::kind_of(value),
        });
    };
    let invalid = |reason| SchemaError::InvalidSize {
        path: path.clone(),
        size: number.clone(),
        reason,
    };
    match number.as_i64() {
        Some(size) => check_size(size).map_err(invalid),
        None if number.is_u64() => Err(invalid("must be between 9 and 54")),
        None => Err(SchemaError::InvalidType {
            path: path.clone(),
            expected: "integer",
            found: "float",
        }),
    }
}

fn grid_index(value: &Value, path: &FieldPath) -> Result<u32, SchemaError> {
    let index = integer_value(value, path)?;
    u32::try_from(index).map_err(|_| SchemaError::InvalidValue {
        path: path.clone(),
        message: format!("grid position {index} is out of range"),
    })
}

/// Decode one requirement record at `path`.
///
/// The `type` may be the wire name or the snake_case alias; unknown types
/// are rejected. Unknown keys are not reported here.
///
/// # Errors
///
/// Returns a `SchemaError` for an unknown type, a missing required field
/// or a value of the wrong shape.
pub fn decode_requirement(value: &Value, path: &FieldPath) -> Result<Requirement, SchemaError> {
    let reader = MappingReader::new(value, path.clone())?;
    let raw_type = reader.req_text("type")?;
    let requirement_type: RequirementType =
        raw_type
            .parse()
            .map_err(|_| SchemaError::UnknownRequirementType {
                path: reader.field_path("type"),
                found: raw_type.clone(),
            })?;

    let string_cmp = |comparison| -> Result<RequirementKind, SchemaError> {
        Ok(RequirementKind::StringComparison {
            comparison,
            input: operand(&reader, "input")?,
            output: operand(&reader, "output")?,
        })
    };
    let numeric_cmp = |comparison| -> Result<RequirementKind, SchemaError> {
        Ok(RequirementKind::NumericComparison {
            comparison,
            input: operand(&reader, "input")?,
            output: operand(&reader, "output")?,
        })
    };

    let kind = match requirement_type {
        RequirementType::HasPermission => RequirementKind::HasPermission {
            permission: reader.req_text("permission")?,
        },
        RequirementType::HasMoney => RequirementKind::HasMoney {
            amount: reader.req_number("amount")?,
        },
        RequirementType::HasItem => RequirementKind::HasItem(item_check(&reader)?),
        RequirementType::ScriptExpression => RequirementKind::ScriptExpression {
            expression: reader.req_text("expression")?,
        },
        RequirementType::StringEquals => string_cmp(StringComparison::Equals)?,
        RequirementType::StringEqualsIgnoreCase => string_cmp(StringComparison::EqualsIgnoreCase)?,
        RequirementType::StringContains => string_cmp(StringComparison::Contains)?,
        RequirementType::RegexMatches => string_cmp(StringComparison::RegexMatches)?,
        RequirementType::Eq => numeric_cmp(NumericComparison::Eq)?,
        RequirementType::Gte => numeric_cmp(NumericComparison::Gte)?,
        RequirementType::Lte => numeric_cmp(NumericComparison::Lte)?,
        RequirementType::Neq => numeric_cmp(NumericComparison::Neq)?,
        RequirementType::Gt => numeric_cmp(NumericComparison::Gt)?,
        RequirementType::Lt => numeric_cmp(NumericComparison::Lt)?,
    };

    Ok(Requirement {
        kind,
        success_commands: reader.opt_text_seq("success_commands")?.unwrap_or_default(),
        deny_commands: reader.opt_text_seq("deny_commands")?.unwrap_or_default(),
        optional: reader.opt_bool("optional")?,
    })
}

fn item_check(reader: &MappingReader<'_>) -> Result<ItemCheck, SchemaError> {
    let lore = match reader.get("lore") {
        None => None,
        Some(value @ Value::Array(_)) => {
            Some(ItemLore::Lines(text_seq_value(value, &reader.field_path("lore"))?))
        }
        Some(value) => Some(ItemLore::Line(text_value(value, &reader.field_path("lore"))?)),
    };
    Ok(ItemCheck {
        material: reader.req_text("material")?,
        amount: reader.opt_number("amount")?,
        name: reader.opt_text("name")?,
        lore,
        name_contains: reader.opt_bool("name_contains")?,
        name_ignorecase: reader.opt_bool("name_ignorecase")?,
        lore_contains: reader.opt_bool("lore_contains")?,
        lore_ignorecase: reader.opt_bool("lore_ignorecase")?,
        strict: reader.opt_bool("strict")?,
        armor: reader.opt_bool("armor")?,
        offhand: reader.opt_bool("offhand")?,
    })
}

fn operand(reader: &MappingReader<'_>, key: &str) -> Result<Operand, SchemaError> {
    match reader.get(key) {
        None => Err(SchemaError::MissingField {
            path: reader.field_path(key),
        }),
        Some(Value::String(s)) => Ok(Operand::Text(s.clone())),
        Some(Value::Number(n)) => Ok(Operand::Number(n.clone())),
        Some(other) => Err(SchemaError::InvalidType {
            path: reader.field_path(key),
            expected: "string or number",
            found: dpanel_core::kind_of(other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dpanel_core::ActionGrammarViolation;
    use serde_json::json;

    fn minimal(items: Value) -> Value {
        json!({
            "menu_title": "&8Shop",
            "open_command": "shop",
            "register_command": true,
            "size": 27,
            "items": items
        })
    }

    fn schema_err(doc: &Value) -> SchemaError {
        match load(doc).unwrap_err() {
            LoadError::Schema(e) => e,
            other => panic!("expected schema error, got {other}"),
        }
    }

    #[test]
    fn loads_hand_authored_document() {
        let doc = minimal(json!({
            "slot_4": {
                "slot": 4,
                "material": "DIAMOND",
                "display_name": "&bDiamond",
                "lore": ["&7Costs", 100],
                "click_commands": ["[message] Hello", "[close] "]
            }
        }));
        let panel = load(&doc).unwrap();
        assert_eq!(panel.menu_title, "&8Shop");
        assert_eq!(panel.size, 27);
        let slot = panel.slot(4).unwrap();
        assert_eq!(slot.material.as_deref(), Some("DIAMOND"));
        assert_eq!(slot.lore.as_deref(), Some(&["&7Costs".to_string(), "100".to_string()][..]));
        assert_eq!(
            slot.actions,
            vec![Action::new("message", "Hello"), Action::new("close", "")]
        );
        assert!(!slot.is_group());
    }

    #[test]
    fn missing_optional_top_level_fields_default() {
        let outcome = load_with(&json!({"size": 9}), &LoadOptions::default()).unwrap();
        let panel = &outcome.panel;
        assert_eq!(panel.menu_title, "");
        assert_eq!(panel.open_command, "");
        assert!(!panel.register_command);
        assert!(panel.open_commands.is_empty());
        assert!(panel.items.is_empty());
        let messages: Vec<String> = outcome.warnings.iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            vec![
                "menu_title: absent; defaulted to \"\"",
                "open_command: absent; defaulted to \"\"",
                "register_command: absent; defaulted to false",
            ]
        );
    }

    #[test]
    fn numbers_in_text_fields_are_reported() {
        let doc = minimal(json!({
            "slot_0": {
                "slot": 0,
                "display_name": 5,
                "lore": ["&7Costs", 100],
                "view_requirement": {
                    "requirements": {
                        "perm": {"type": "has permission", "permission": 42}
                    }
                }
            }
        }));
        let outcome = load_with(&doc, &LoadOptions::default()).unwrap();
        let slot = &outcome.panel.items["slot_0"];
        assert_eq!(slot.display_name.as_deref(), Some("5"));
        assert_eq!(slot.lore.as_deref(), Some(&["&7Costs".to_string(), "100".to_string()][..]));
        let paths: Vec<String> = outcome.warnings.iter().map(|w| w.path.to_string()).collect();
        assert_eq!(
            paths,
            vec![
                "items.slot_0.display_name",
                "items.slot_0.lore[1]",
                "items.slot_0.requirements.view_requirement.requirements.perm.permission",
            ]
        );
        assert!(outcome.warnings.iter().all(|w| w.message == "number read as text"));
    }

    #[test]
    fn stray_field_on_money_requirement_is_dropped() {
        let doc = minimal(json!({
            "slot_0": {
                "slot": 0,
                "view_requirement": {
                    "requirements": {
                        "m": {"type": "has money", "amount": 5, "permission": "x"}
                    }
                }
            }
        }));
        let outcome = load_with(&doc, &LoadOptions::default()).unwrap();
        let messages: Vec<String> = outcome.warnings.iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            vec!["items.slot_0.requirements.view_requirement.requirements.m.permission: unknown key ignored"]
        );
        let recompiled = crate::compiler::compile(&outcome.panel);
        let record = &recompiled["items"]["slot_0"]["view_requirement"]["requirements"]["m"];
        assert_eq!(record, &json!({"type": "has money", "amount": 5}));
    }

    #[test]
    fn size_ten_is_rejected() {
        let err = schema_err(&json!({"size": 10, "items": {}}));
        assert_eq!(err.path().to_string(), "size");
        assert!(matches!(
            err,
            SchemaError::InvalidSize {
                reason: "must be a multiple of 9",
                ..
            }
        ));
    }

    #[test]
    fn size_thirty_six_has_four_rows() {
        let panel = load(&json!({"size": 36})).unwrap();
        assert_eq!(panel.rows(), 4);
    }

    #[test]
    fn size_is_never_coerced() {
        let err = schema_err(&json!({"size": "27"}));
        assert!(matches!(err, SchemaError::InvalidType { expected: "integer", found: "string", .. }));
        let err = schema_err(&json!({"size": 27.0}));
        assert!(matches!(err, SchemaError::InvalidType { found: "float", .. }));
        let err = schema_err(&json!({"size": 63}));
        assert!(matches!(err, SchemaError::InvalidSize { .. }));
        let err = schema_err(&json!({"menu_title": "x"}));
        assert_eq!(err, SchemaError::MissingField { path: FieldPath::root().key("size") });
    }

    #[test]
    fn top_level_must_be_a_mapping() {
        let err = schema_err(&json!(["size", 27]));
        assert_eq!(err.path().to_string(), "$");
    }

    #[test]
    fn unknown_requirement_type_names_its_path() {
        let doc = minimal(json!({
            "slot_12": {
                "slot": 12,
                "view_requirement": {
                    "requirements": {
                        "requirement_3": {"type": "has_diamond", "amount": 1}
                    }
                }
            }
        }));
        let err = schema_err(&doc);
        assert_eq!(
            err.path().to_string(),
            "items.slot_12.requirements.view_requirement.requirements.requirement_3.type"
        );
        assert!(matches!(err, SchemaError::UnknownRequirementType { ref found, .. } if found == "has_diamond"));
    }

    #[test]
    fn missing_variant_field_is_rejected() {
        let doc = minimal(json!({
            "slot_0": {
                "slot": 0,
                "left_click_requirement": {
                    "requirements": {"money": {"type": "has money"}}
                }
            }
        }));
        let err = schema_err(&doc);
        assert_eq!(
            err.path().to_string(),
            "items.slot_0.requirements.left_click_requirement.requirements.money.amount"
        );
    }

    #[test]
    fn type_alias_normalizes_to_wire_name() {
        let value = json!({"type": "gte", "input": "%player_level%", "output": 10});
        let req = decode_requirement(&value, &FieldPath::root()).unwrap();
        assert_eq!(req.requirement_type(), RequirementType::Gte);
        assert_eq!(crate::compiler::encode_requirement(&req)["type"], json!(">="));
    }

    #[test]
    fn item_requirement_reads_all_fields() {
        let value = json!({
            "type": "has item",
            "material": "DIAMOND",
            "amount": 3,
            "lore": "&7Rare",
            "strict": true,
            "deny_commands": ["[message] &cYou need 3 diamonds"],
            "optional": true
        });
        let req = decode_requirement(&value, &FieldPath::root()).unwrap();
        let RequirementKind::HasItem(check) = &req.kind else {
            panic!("expected has item");
        };
        assert_eq!(check.material, "DIAMOND");
        assert_eq!(check.amount, Some(3.into()));
        assert_eq!(check.lore, Some(ItemLore::Line("&7Rare".to_string())));
        assert_eq!(check.strict, Some(true));
        assert_eq!(req.deny_commands.len(), 1);
        assert!(req.is_optional());
    }

    #[test]
    fn slot_and_slots_conflict() {
        let doc = minimal(json!({"slot_1": {"slot": 1, "slots": [1, 2]}}));
        let err = schema_err(&doc);
        assert!(matches!(err, SchemaError::ConflictingFields { .. }));
        assert_eq!(err.path().to_string(), "items.slot_1");
    }

    #[test]
    fn slot_or_slots_is_required() {
        let err = schema_err(&minimal(json!({"slot_1": {"material": "STONE"}})));
        assert_eq!(err, SchemaError::MissingField { path: FieldPath::root().key("items").key("slot_1").key("slot") });
        let err = schema_err(&minimal(json!({"slot_1": {"slots": []}})));
        assert!(matches!(err, SchemaError::InvalidValue { .. }));
        let err = schema_err(&minimal(json!({"slot_1": {"slot": -1}})));
        assert!(matches!(err, SchemaError::InvalidValue { .. }));
    }

    #[test]
    fn group_key_derivation() {
        let doc = minimal(json!({
            "slot_10": {"slots": [10, 11, 19], "material": "GLASS"},
            "ranks": {"slots": [20, 21]}
        }));
        let panel = load(&doc).unwrap();
        let derived = &panel.items["slot_10"];
        assert_eq!(derived.slots.as_deref(), Some(&[10, 11, 19][..]));
        assert_eq!(derived.slot_name, None);
        let named = &panel.items["ranks"];
        assert_eq!(named.slot_name.as_deref(), Some("ranks"));
        assert_eq!(named.serialized_key("ranks"), "ranks");
    }

    #[test]
    fn singleton_under_foreign_key_becomes_one_cell_group() {
        let doc = minimal(json!({"diamond": {"slot": 13, "material": "DIAMOND"}}));
        let outcome = load_with(&doc, &LoadOptions::default()).unwrap();
        let slot = &outcome.panel.items["diamond"];
        assert_eq!(slot.slots.as_deref(), Some(&[13][..]));
        assert_eq!(slot.slot_name.as_deref(), Some("diamond"));
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn malformed_action_rejected_by_default() {
        let doc = minimal(json!({"slot_0": {"slot": 0, "click_commands": ["[message] ok", "message oops"]}}));
        let err = load(&doc).unwrap_err();
        let LoadError::ActionGrammar(err) = err else {
            panic!("expected action grammar error");
        };
        assert_eq!(err.path.to_string(), "items.slot_0.click_commands[1]");
        assert_eq!(err.raw, "message oops");
        assert_eq!(err.violation, ActionGrammarViolation::MissingOpenBracket);
    }

    #[test]
    fn malformed_action_skipped_with_warning() {
        let mut doc = minimal(json!({}));
        doc["open_commands"] = json!(["[close]", "[sound] BLOCK_CHEST_OPEN", "[[x]] y"]);
        let options = LoadOptions::with_action_policy(ActionPolicy::Skip);
        let outcome = load_with(&doc, &options).unwrap();
        assert_eq!(
            outcome.panel.open_commands,
            vec![Action::new("sound", "BLOCK_CHEST_OPEN")]
        );
        let paths: Vec<String> = outcome.warnings.iter().map(|w| w.path.to_string()).collect();
        assert_eq!(paths, vec!["open_commands[0]", "open_commands[2]"]);
    }

    #[test]
    fn unknown_keys_are_reported() {
        let mut doc = minimal(json!({"slot_0": {"slot": 0, "glow": true}}));
        doc["update_interval"] = json!(5);
        let outcome = load_with(&doc, &LoadOptions::default()).unwrap();
        let messages: Vec<String> = outcome.warnings.iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            vec![
                "update_interval: unknown key ignored",
                "items.slot_0.glow: unknown key ignored"
            ]
        );
    }

    #[test]
    fn out_of_grid_index_warns() {
        let mut doc = minimal(json!({"slot_20": {"slot": 20}}));
        doc["size"] = json!(9);
        let outcome = load_with(&doc, &LoadOptions::default()).unwrap();
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].message.contains("outside the 9-slot grid"));
    }

    #[test]
    fn null_reads_as_absent() {
        let doc = json!({"size": 9, "menu_title": null, "items": {"slot_0": {"slot": 0, "material": null}}});
        let panel = load(&doc).unwrap();
        assert_eq!(panel.menu_title, "");
        assert_eq!(panel.items["slot_0"].material, None);
    }

    #[test]
    fn action_policy_config_spelling() {
        let policy: ActionPolicy = serde_json::from_value(json!("skip")).unwrap();
        assert_eq!(policy, ActionPolicy::Skip);
        assert_eq!(ActionPolicy::default(), ActionPolicy::Reject);
    }
}
