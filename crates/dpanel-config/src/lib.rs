//! # dpanel-config: Panel Configuration Compiler
//!
//! The editing model for an inventory menu, plus the two pure functions
//! that move it in and out of the plugin's configuration document:
//!
//! - [`compile`] (export): [`Panel`] to [`Document`]. Total; never fails.
//! - [`load`] / [`load_with`] (import): [`Document`] to [`Panel`], with a
//!   path-carrying [`LoadError`] on bad input.
//!
//! Field omission is the load-bearing rule of the export format: a key is
//! written only when its value is meaningful. Every record goes through
//! [`emit::Record`], which owns that decision.
//!
//! YAML text lives one layer out, in [`yaml`].
//!
//! ## Crate Policy
//!
//! - Depends only on `dpanel-core` internally.
//! - No I/O outside the text helpers in [`yaml`], which take and return
//!   strings.

pub mod action;
pub mod compiler;
pub mod emit;
pub mod error;
pub mod loader;
pub mod panel;
pub mod requirement;
pub mod slot;
pub mod yaml;

pub use action::{encode_actions, Action};
pub use compiler::{compile, encode_requirement};
pub use dpanel_core::{Document, FieldPath, LoadError, SchemaError};
pub use error::{DocumentError, ImportError};
pub use loader::{
    decode_requirement, load, load_with, ActionPolicy, LoadOptions, LoadOutcome, LoadWarning,
};
pub use panel::Panel;
pub use requirement::{
    ItemCheck, ItemLore, NumericComparison, Operand, Requirement, RequirementGroup,
    RequirementKind, RequirementType, StringComparison,
};
pub use slot::{Enchantment, Placement, Slot, SlotRequirements, Trigger};
pub use yaml::{export_yaml, fingerprint, import_yaml, parse_yaml, render_yaml};
