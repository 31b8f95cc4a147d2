//! # dpanel-store: Editor State Persistence
//!
//! The panel being edited is a plain value owned by the caller; this crate
//! is the collaborator that keeps it between sessions.
//!
//! - [`KeyValueStore`]: byte-oriented `get` / `set` / `remove`.
//! - [`MemoryStore`] and [`FileStore`]: the two backends.
//! - [`session`]: restore and save a [`dpanel_config::Panel`] snapshot.

pub mod error;
pub mod session;
pub mod store;

pub use error::StoreError;
pub use session::{restore, save, EditorState, DEFAULT_STATE_KEY};
pub use store::{validate_key, FileStore, KeyValueStore, MemoryStore};
