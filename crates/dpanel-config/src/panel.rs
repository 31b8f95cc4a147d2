//! # Panel Model
//!
//! The whole menu being edited: title, open command, open actions, grid
//! size, and the insertion-ordered map of slots.
//!
//! The panel is a plain caller-owned value. The editing helpers here
//! mirror what the editor does on a click (create a default cell, assign
//! a multi-cell group, clear the grid); persistence lives in
//! `dpanel-store`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::compiler::compile_slot;
use crate::slot::{parse_slot_key, slot_key, Enchantment, Slot};

/// Width of one grid row.
pub const ROW_WIDTH: u32 = 9;

/// Smallest menu: one row.
pub const MIN_SIZE: u32 = 9;

/// Largest menu: six rows.
pub const MAX_SIZE: u32 = 54;

/// Check a menu size: a multiple of 9 in `[9, 54]`.
///
/// Returns the size as `u32`, or the reason it was rejected.
pub fn check_size(size: i64) -> Result<u32, &'static str> {
    if size < i64::from(MIN_SIZE) || size > i64::from(MAX_SIZE) {
        return Err("must be between 9 and 54");
    }
    if size % i64::from(ROW_WIDTH) != 0 {
        return Err("must be a multiple of 9");
    }
    u32::try_from(size).map_err(|_| "must be between 9 and 54")
}

/// A complete menu definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Panel {
    /// Inventory title; markup is opaque text.
    pub menu_title: String,
    /// Command that opens the menu.
    pub open_command: String,
    /// Whether the plugin registers `open_command` as a real command.
    pub register_command: bool,
    /// Actions run when the menu opens.
    #[serde(default)]
    pub open_commands: Vec<Action>,
    /// Number of cells, a multiple of 9 in `[9, 54]`.
    pub size: u32,
    /// Slots by map key, in insertion order.
    #[serde(default)]
    pub items: IndexMap<String, Slot>,
}

impl Default for Panel {
    fn default() -> Self {
        Self {
            menu_title: "&8Rank Store!".to_string(),
            open_command: "ranks".to_string(),
            register_command: true,
            open_commands: Vec::new(),
            size: 27,
            items: IndexMap::new(),
        }
    }
}

impl Panel {
    /// Number of grid rows.
    pub fn rows(&self) -> u32 {
        self.size / ROW_WIDTH
    }

    /// The singleton stored for grid position `index`.
    pub fn slot(&self, index: u32) -> Option<&Slot> {
        self.items.get(&slot_key(index))
    }

    /// Store `slot` as the singleton at `index`.
    pub fn set_slot(&mut self, index: u32, slot: Slot) -> Option<Slot> {
        self.items.insert(slot_key(index), slot)
    }

    /// Return the slot at `index`, creating the editor default if absent.
    pub fn ensure_slot(&mut self, index: u32) -> &mut Slot {
        self.items
            .entry(slot_key(index))
            .or_insert_with(Slot::editor_default)
    }

    /// Turn the cells at `indices` into one group showing `material`.
    ///
    /// Every `slot_<i>` entry receives the same `slots` list, material and
    /// name; other fields already set on those entries are kept. The
    /// compiler later folds them into one record.
    pub fn assign_group(&mut self, indices: &[u32], material: &str, display_name: &str) {
        for index in indices {
            let slot = self.items.entry(slot_key(*index)).or_default();
            slot.material = Some(material.to_string());
            slot.display_name = Some(display_name.to_string());
            slot.slots = Some(indices.to_vec());
        }
    }

    /// Remove the slot stored under `key`, keeping the order of the rest.
    pub fn remove_slot(&mut self, key: &str) -> Option<Slot> {
        self.items.shift_remove(key)
    }

    /// Remove every slot.
    pub fn clear_items(&mut self) {
        self.items.clear();
    }

    /// Check the panel for shapes the compiler cannot express faithfully.
    ///
    /// Returns a list of problems (empty = valid). This is the editing
    /// surface's check; `compile` itself never fails.
    ///
    /// Entries that serialize to the same key are reported only when their
    /// compiled records differ, since identical cells of one group fold
    /// without loss.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut compiled: IndexMap<String, (&str, serde_json::Value)> = IndexMap::new();
        if let Err(reason) = check_size(i64::from(self.size)) {
            errors.push(format!("size {}: {reason}", self.size));
        }
        for (key, slot) in &self.items {
            let indices: Vec<u32> = match &slot.slots {
                Some(slots) if !slots.is_empty() => slots.clone(),
                _ => match parse_slot_key(key) {
                    Some(index) => vec![index],
                    None => {
                        errors.push(format!(
                            "{key}: singleton slot key must be slot_<index>"
                        ));
                        continue;
                    }
                },
            };
            for index in indices.iter().filter(|i| **i >= self.size) {
                errors.push(format!(
                    "{key}: slot {index} is outside the {}-slot grid",
                    self.size
                ));
            }
            for raw in &slot.enchantments {
                if Enchantment::parse(raw).is_none() {
                    errors.push(format!("{key}: enchantment {raw:?} is not ID;LEVEL"));
                }
            }
            if let Some(placement) = slot.placement(key) {
                let serialized = slot.serialized_key(key);
                let record = compile_slot(slot, &placement);
                match compiled.get(&serialized) {
                    Some((first, earlier)) if *earlier != record => errors.push(format!(
                        "{key}: serializes to `{serialized}` like `{first}` with different content; only one is exported"
                    )),
                    Some(_) => {}
                    None => {
                        compiled.insert(serialized, (key.as_str(), record));
                    }
                }
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_panel_matches_editor() {
        let panel = Panel::default();
        assert_eq!(panel.menu_title, "&8Rank Store!");
        assert_eq!(panel.open_command, "ranks");
        assert!(panel.register_command);
        assert_eq!(panel.size, 27);
        assert_eq!(panel.rows(), 3);
        assert!(panel.items.is_empty());
        assert!(panel.validate().is_empty());
    }

    #[test]
    fn check_size_bounds() {
        assert_eq!(check_size(36), Ok(36));
        assert_eq!(check_size(9), Ok(9));
        assert_eq!(check_size(54), Ok(54));
        assert_eq!(check_size(10), Err("must be a multiple of 9"));
        assert_eq!(check_size(0), Err("must be between 9 and 54"));
        assert_eq!(check_size(63), Err("must be between 9 and 54"));
        assert_eq!(check_size(-9), Err("must be between 9 and 54"));
    }

    #[test]
    fn ensure_slot_creates_editor_default_once() {
        let mut panel = Panel::default();
        panel.ensure_slot(4).display_name = Some("Shop".to_string());
        let again = panel.ensure_slot(4);
        assert_eq!(again.display_name.as_deref(), Some("Shop"));
        assert_eq!(again.material.as_deref(), Some("STONE"));
        assert_eq!(panel.items.len(), 1);
    }

    #[test]
    fn assign_group_writes_every_cell() {
        let mut panel = Panel::default();
        panel.ensure_slot(11).priority = Some(2);
        panel.assign_group(&[11, 10, 19], "GRAY_STAINED_GLASS_PANE", " ");
        assert_eq!(panel.items.len(), 3);
        for index in [10, 11, 19] {
            let slot = panel.slot(index).unwrap();
            assert_eq!(slot.slots.as_deref(), Some(&[11, 10, 19][..]));
            assert_eq!(slot.material.as_deref(), Some("GRAY_STAINED_GLASS_PANE"));
        }
        assert_eq!(panel.slot(11).unwrap().priority, Some(2));
    }

    #[test]
    fn remove_slot_keeps_order() {
        let mut panel = Panel::default();
        panel.ensure_slot(3);
        panel.ensure_slot(1);
        panel.ensure_slot(2);
        panel.remove_slot("slot_1");
        let keys: Vec<&str> = panel.items.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["slot_3", "slot_2"]);
        panel.clear_items();
        assert!(panel.items.is_empty());
    }

    #[test]
    fn validate_reports_bad_shapes() {
        let mut panel = Panel {
            size: 9,
            ..Panel::default()
        };
        panel.items.insert("diamond".to_string(), Slot::default());
        panel.set_slot(12, Slot::default());
        panel.ensure_slot(2).enchantments = vec!["SHARPNESS".to_string()];
        let errors = panel.validate();
        assert_eq!(errors.len(), 3, "{errors:?}");
        assert!(errors[0].starts_with("diamond:"));
        assert!(errors[1].contains("outside the 9-slot grid"));
        assert!(errors[2].contains("SHARPNESS"));
    }

    #[test]
    fn validate_reports_conflicting_serialized_keys() {
        let mut panel = Panel::default();
        panel.ensure_slot(3).display_name = Some("Single".to_string());
        panel.items.insert(
            "border".to_string(),
            Slot {
                slots: Some(vec![3, 7]),
                ..Slot::default()
            },
        );
        let errors = panel.validate();
        assert_eq!(errors.len(), 1, "{errors:?}");
        assert!(errors[0].starts_with("border: serializes to `slot_3` like `slot_3`"));
    }

    #[test]
    fn validate_accepts_identical_group_cells() {
        let mut panel = Panel::default();
        panel.assign_group(&[10, 11, 19], "GRAY_STAINED_GLASS_PANE", " ");
        assert!(panel.validate().is_empty());
        panel.ensure_slot(11).priority = Some(2);
        let errors = panel.validate();
        assert_eq!(errors.len(), 1, "{errors:?}");
        assert!(errors[0].starts_with("slot_11: serializes to `slot_10`"));
    }

    #[test]
    fn editor_state_json_shape() {
        let json = serde_json::to_value(Panel::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "menuTitle": "&8Rank Store!",
                "openCommand": "ranks",
                "registerCommand": true,
                "openCommands": [],
                "size": 27,
                "items": {}
            })
        );
    }
}
