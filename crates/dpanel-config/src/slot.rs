//! # Slot Model
//!
//! A slot is one grid cell, or a named group of cells sharing one
//! configuration.
//!
//! ## Key Derivation
//!
//! - **Group** (`slots` present and non-empty): serialized under `slotName`
//!   if set, else `slot_<min(slots)>`.
//! - **Singleton**: serialized under its map key, which must be
//!   `slot_<index>`; the `slot` number written to the document is parsed
//!   from that suffix.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::requirement::RequirementGroup;

/// Prefix of every singleton slot key.
pub const SLOT_KEY_PREFIX: &str = "slot_";

/// Material prefix marking a custom head rendered from a texture hash.
pub const TEXTURE_PREFIX: &str = "texture-";

/// Base URL texture hashes resolve against.
pub const TEXTURE_BASE_URL: &str = "https://textures.minecraft.net/texture/";

/// Material given to a cell the first time it is opened in the editor.
pub const DEFAULT_MATERIAL: &str = "STONE";

/// Display name given to a cell the first time it is opened in the editor.
pub const DEFAULT_DISPLAY_NAME: &str = "New Item";

/// The map key for the singleton at grid position `index`.
pub fn slot_key(index: u32) -> String {
    format!("{SLOT_KEY_PREFIX}{index}")
}

/// Parse the grid position out of a `slot_<index>` key.
///
/// Only plain ASCII digits are accepted after the prefix.
pub fn parse_slot_key(key: &str) -> Option<u32> {
    let digits = key.strip_prefix(SLOT_KEY_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Where a slot record sits in the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// One cell.
    Single(u32),
    /// Several cells, in authored order.
    Group(Vec<u32>),
}

/// The three triggers a requirement group can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// Controls whether the slot is shown at all.
    View,
    /// Gates left-click commands.
    LeftClick,
    /// Gates right-click commands.
    RightClick,
}

impl Trigger {
    /// All triggers in document order.
    pub const ALL: [Trigger; 3] = [Self::View, Self::LeftClick, Self::RightClick];

    /// Document key of the requirement group for this trigger.
    pub fn key(&self) -> &'static str {
        match self {
            Self::View => "view_requirement",
            Self::LeftClick => "left_click_requirement",
            Self::RightClick => "right_click_requirement",
        }
    }
}

/// Requirement groups attached to a slot, at most one per trigger.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SlotRequirements {
    /// Shown only when this group passes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_requirement: Option<RequirementGroup>,
    /// Left-click gate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_click_requirement: Option<RequirementGroup>,
    /// Right-click gate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_click_requirement: Option<RequirementGroup>,
}

impl SlotRequirements {
    /// The group for `trigger`, if any.
    pub fn get(&self, trigger: Trigger) -> Option<&RequirementGroup> {
        match trigger {
            Trigger::View => self.view_requirement.as_ref(),
            Trigger::LeftClick => self.left_click_requirement.as_ref(),
            Trigger::RightClick => self.right_click_requirement.as_ref(),
        }
    }

    /// Mutable slot for the group of `trigger`.
    pub fn entry(&mut self, trigger: Trigger) -> &mut Option<RequirementGroup> {
        match trigger {
            Trigger::View => &mut self.view_requirement,
            Trigger::LeftClick => &mut self.left_click_requirement,
            Trigger::RightClick => &mut self.right_click_requirement,
        }
    }

    /// Returns true when no trigger has a group.
    pub fn is_empty(&self) -> bool {
        Trigger::ALL.iter().all(|t| self.get(*t).is_none())
    }
}

/// One grid cell or group of cells.
///
/// Field names follow the editor's persisted state (`displayName`,
/// `hideEnchantments`, ...); the compiler maps them to the plugin's
/// snake_case document keys.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    /// Catalog item id, or `texture-<hash>` for a custom head.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    /// Display name; markup is opaque text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Lore lines, one display line each.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lore: Option<Vec<String>>,
    /// Click actions in execution order.
    #[serde(default)]
    pub actions: Vec<Action>,
    /// Priority among slots sharing a cell.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    /// Requirement groups per trigger.
    #[serde(default, skip_serializing_if = "SlotRequirements::is_empty")]
    pub requirements: SlotRequirements,
    /// `ID;LEVEL` strings.
    #[serde(default)]
    pub enchantments: Vec<String>,
    /// Explicit enchantment glint hiding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_enchantments: Option<bool>,
    /// Grid positions, present only on groups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slots: Option<Vec<u32>>,
    /// Explicit serialized key for a group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot_name: Option<String>,
}

impl Slot {
    /// The slot the editor creates when an empty cell is first selected.
    pub fn editor_default() -> Self {
        Self {
            material: Some(DEFAULT_MATERIAL.to_string()),
            display_name: Some(DEFAULT_DISPLAY_NAME.to_string()),
            lore: Some(Vec::new()),
            ..Self::default()
        }
    }

    /// Returns true if this slot occupies several cells.
    pub fn is_group(&self) -> bool {
        self.slots.as_ref().is_some_and(|s| !s.is_empty())
    }

    /// Grid placement, given the map key the slot is stored under.
    ///
    /// `None` for a singleton stored under a key with no numeric suffix.
    pub fn placement(&self, map_key: &str) -> Option<Placement> {
        match &self.slots {
            Some(slots) if !slots.is_empty() => Some(Placement::Group(slots.clone())),
            _ => parse_slot_key(map_key).map(Placement::Single),
        }
    }

    /// The key this slot is written under in the document.
    pub fn serialized_key(&self, map_key: &str) -> String {
        match &self.slots {
            Some(slots) if !slots.is_empty() => match &self.slot_name {
                Some(name) => name.clone(),
                None => slot_key(slots.iter().copied().min().unwrap_or_default()),
            },
            _ => map_key.to_string(),
        }
    }

    /// Texture hash of a custom head material.
    pub fn texture_hash(&self) -> Option<&str> {
        let hash = self.material.as_deref()?.strip_prefix(TEXTURE_PREFIX)?;
        let well_formed = hash.len() == 64
            && hash
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        well_formed.then_some(hash)
    }

    /// Returns true if the material denotes a custom head.
    pub fn is_custom_head(&self) -> bool {
        self.texture_hash().is_some()
    }

    /// Texture URL a head renderer would fetch.
    pub fn texture_url(&self) -> Option<String> {
        self.texture_hash()
            .map(|hash| format!("{TEXTURE_BASE_URL}{hash}"))
    }
}

/// A parsed `ID;LEVEL` enchantment entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Enchantment {
    /// Enchantment id, e.g. `DURABILITY`.
    pub id: String,
    /// Level, starting at 1.
    pub level: u32,
}

impl Enchantment {
    /// Parse an `ID;LEVEL` string.
    pub fn parse(raw: &str) -> Option<Self> {
        let (id, level) = raw.split_once(';')?;
        if id.is_empty() {
            return None;
        }
        let level = level.parse().ok().filter(|l| *l > 0)?;
        Some(Self {
            id: id.to_string(),
            level,
        })
    }
}

impl fmt::Display for Enchantment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{}", self.id, self.level)
    }
}
