//! # dpanel-core: Foundational Types
//!
//! Shared primitives for the panel configuration compiler. Every other
//! crate in the workspace depends on `dpanel-core`; it depends on nothing
//! internal.
//!
//! ## Key Design Principles
//!
//! 1. **Every import error carries a `FieldPath`.** A rejected document
//!    always names the offending field in dotted form, e.g.
//!    `items.slot_12.requirements.view_requirement.requirements.req_3.type`.
//!
//! 2. **Typed document readers.** The loader never indexes raw
//!    `serde_json::Value` trees directly; it goes through [`MappingReader`],
//!    which turns every shape mismatch into a [`SchemaError`] at the right
//!    path.
//!
//! 3. **`CanonicalBytes` newtype.** Fingerprints are computed only over
//!    JCS-canonical bytes, so two documents with the same content always
//!    produce the same digest regardless of key order.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `dpanel-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod document;
pub mod error;
pub mod path;

pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, ContentDigest};
pub use document::{integer_value, kind_of, text_seq_value, text_value, Document, MappingReader};
pub use error::{
    ActionGrammarError, ActionGrammarViolation, CanonicalizationError, LoadError, SchemaError,
};
pub use path::FieldPath;
