//! # Canonical Serialization: JCS-Compatible Byte Production
//!
//! `CanonicalBytes` is the sole input accepted by [`crate::sha256_digest`].
//! Serialization uses `serde_jcs` (RFC 8785): sorted keys, compact
//! separators, deterministic number formatting. Two documents that differ
//! only in mapping key order therefore canonicalize to the same bytes.
//!
//! Item order inside `items` is a mapping order too, so fingerprints do not
//! distinguish two exports that list the same slots in a different order.
//! Byte-level comparison of exports goes through the rendered YAML text.

use serde::Serialize;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by JCS canonicalization.
///
/// The inner `Vec<u8>` is private; the only constructor is
/// [`CanonicalBytes::new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Canonicalize any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::SerializationFailed` if the value
    /// cannot be represented as JSON.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        let s = serde_jcs::to_string(&value)?;
        Ok(Self(s.into_bytes()))
    }

    /// Access the canonical bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical_str(value: &serde_json::Value) -> String {
        let cb = CanonicalBytes::new(value).expect("should canonicalize");
        String::from_utf8(cb.as_bytes().to_vec()).unwrap()
    }

    #[test]
    fn keys_are_sorted() {
        let data = serde_json::json!({"size": 27, "menu_title": "&8Ranks", "items": {}});
        assert_eq!(
            canonical_str(&data),
            r#"{"items":{},"menu_title":"&8Ranks","size":27}"#
        );
    }

    #[test]
    fn nested_mappings_are_sorted() {
        let data = serde_json::json!({
            "items": {"slot_2": {"slot": 2, "material": "STONE"}, "slot_1": {"slot": 1}}
        });
        assert_eq!(
            canonical_str(&data),
            r#"{"items":{"slot_1":{"slot":1},"slot_2":{"material":"STONE","slot":2}}}"#
        );
    }

    #[test]
    fn floats_are_accepted() {
        let data = serde_json::json!({"amount": 12.5});
        assert_eq!(canonical_str(&data), r#"{"amount":12.5}"#);
    }

    #[test]
    fn markup_passes_through_unchanged() {
        let data = serde_json::json!({"display_name": "&#FFAA00<bold>Gold</bold> &lé"});
        assert!(canonical_str(&data).contains("&#FFAA00<bold>Gold</bold> &lé"));
    }

    #[test]
    fn len_and_is_empty() {
        let cb = CanonicalBytes::new(&serde_json::json!({})).unwrap();
        assert_eq!(cb.as_bytes(), b"{}");
        assert_eq!(cb.len(), 2);
        assert!(!cb.is_empty());
    }
}
