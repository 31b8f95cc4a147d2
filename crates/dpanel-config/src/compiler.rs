//! # Panel Compiler (export)
//!
//! `compile` turns a [`Panel`] into the plugin's configuration
//! [`Document`]. It is a pure function: no I/O, no state, no failure mode.
//!
//! ## Document Layout
//!
//! ```text
//! menu_title: ...
//! open_command: ...
//! register_command: ...
//! open_commands: ["[type] value", ...]     (only if any)
//! size: 27
//! items:
//!   <key>:
//!     slot: 4 | slots: [10, 11]            (exactly one)
//!     material / display_name / lore / priority
//!     click_commands                       (only if any)
//!     view_requirement / left_click_requirement / right_click_requirement
//!     enchantments                         (only if any)
//!     hide_enchantments                    (only if set)
//! ```
//!
//! All omission decisions go through [`Record`].

use dpanel_core::Document;
use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::action::encode_actions;
use crate::emit::Record;
use crate::panel::Panel;
use crate::requirement::{Requirement, RequirementGroup, RequirementKind};
use crate::slot::{Placement, Slot, Trigger};

/// Compile a panel into its configuration document.
///
/// Items keep the panel's insertion order. Entries resolving to the same
/// serialized key (the cells of one group) collapse into one record: the
/// last entry's content at the first entry's position.
pub fn compile(panel: &Panel) -> Document {
    let mut doc = Record::new();
    doc.field("menu_title", panel.menu_title.as_str())
        .field("open_command", panel.open_command.as_str())
        .field("register_command", panel.register_command)
        .non_empty("open_commands", &encode_actions(&panel.open_commands))
        .field("size", panel.size)
        .field("items", compile_items(&panel.items));

    tracing::debug!(
        items = panel.items.len(),
        size = panel.size,
        "compiled panel"
    );
    doc.into_value()
}

fn compile_items(items: &IndexMap<String, Slot>) -> Value {
    let mut out = Map::new();
    for (key, slot) in items {
        let Some(placement) = slot.placement(key) else {
            tracing::warn!(key = %key, "skipping singleton slot whose key has no grid index");
            continue;
        };
        let serialized = slot.serialized_key(key);
        let record = compile_slot(slot, &placement);
        if out.get(&serialized).is_some_and(|earlier| *earlier != record) {
            tracing::warn!(
                key = %key,
                serialized = %serialized,
                "slot overwrites an earlier record with the same key"
            );
        }
        out.insert(serialized, record);
    }
    Value::Object(out)
}

/// Compile one slot record at the given placement.
pub fn compile_slot(slot: &Slot, placement: &Placement) -> Value {
    let mut record = Record::new();
    match placement {
        Placement::Single(index) => record.field("slot", *index),
        Placement::Group(indices) => record.field("slots", indices.clone()),
    };
    record
        .optional("material", slot.material.as_deref())
        .optional("display_name", slot.display_name.as_deref())
        .optional("lore", slot.lore.clone())
        .optional("priority", slot.priority)
        .non_empty("click_commands", &encode_actions(&slot.actions));
    for trigger in Trigger::ALL {
        record.optional(
            trigger.key(),
            slot.requirements.get(trigger).map(compile_group),
        );
    }
    record
        .non_empty("enchantments", &slot.enchantments)
        .optional("hide_enchantments", slot.hide_enchantments);
    record.into_value()
}

/// Compile a requirement group.
pub fn compile_group(group: &RequirementGroup) -> Value {
    let requirements: Map<String, Value> = group
        .requirements
        .iter()
        .map(|(key, req)| (key.clone(), encode_requirement(req)))
        .collect();

    let mut record = Record::new();
    record
        .field("requirements", Value::Object(requirements))
        .non_empty("deny_commands", &group.deny_commands)
        .optional("minimum_requirements", group.minimum_requirements)
        .optional("stop_at_success", group.stop_at_success);
    record.into_value()
}

/// Encode one requirement with only its defined fields.
pub fn encode_requirement(req: &Requirement) -> Value {
    let mut record = Record::new();
    record.field("type", req.requirement_type().wire_name());
    match &req.kind {
        RequirementKind::HasPermission { permission } => {
            record.field("permission", permission.as_str());
        }
        RequirementKind::HasMoney { amount } => {
            record.field("amount", Value::Number(amount.clone()));
        }
        RequirementKind::HasItem(item) => {
            record
                .field("material", item.material.as_str())
                .optional("amount", item.amount.clone().map(Value::Number))
                .optional("name", item.name.as_deref())
                .optional("lore", item.lore.as_ref().map(|l| l.to_value()));
            for (key, flag) in item.flags() {
                record.optional(key, flag);
            }
        }
        RequirementKind::ScriptExpression { expression } => {
            record.field("expression", expression.as_str());
        }
        RequirementKind::StringComparison { input, output, .. }
        | RequirementKind::NumericComparison { input, output, .. } => {
            record
                .field("input", input.to_value())
                .field("output", output.to_value());
        }
    }
    record
        .non_empty("success_commands", &req.success_commands)
        .non_empty("deny_commands", &req.deny_commands)
        .optional("optional", req.optional);
    record.into_value()
}
