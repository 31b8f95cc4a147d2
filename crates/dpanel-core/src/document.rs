//! # Documents and Typed Readers
//!
//! A [`Document`] is the plain nested-mapping structure exchanged between
//! the compiler, the loader and the YAML renderer. Objects keep insertion
//! order (`serde_json` is built with `preserve_order`), so the order of
//! `items` survives every hop.
//!
//! [`MappingReader`] is the only way the loader looks into a document. It
//! treats `null` the same as an absent key, coerces numbers to text where
//! text is expected (YAML happily reads `- 100` in a lore list as an
//! integer), and reports every other shape mismatch as a [`SchemaError`]
//! carrying the full field path. The coercion is lossy on re-export, so
//! [`MappingReader::numbers_as_text`] lists where it happened.

use serde_json::{Map, Number, Value};

use crate::error::SchemaError;
use crate::path::FieldPath;

/// The deserialized configuration document.
pub type Document = Value;

/// Human-readable name for the shape of a value, used in error messages.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "float",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

/// Read a text value: strings verbatim, numbers via their display form.
pub fn text_value(value: &Value, path: &FieldPath) -> Result<String, SchemaError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(SchemaError::InvalidType {
            path: path.clone(),
            expected: "string",
            found: kind_of(other),
        }),
    }
}

/// Read a sequence of text values.
pub fn text_seq_value(value: &Value, path: &FieldPath) -> Result<Vec<String>, SchemaError> {
    let items = value.as_array().ok_or_else(|| SchemaError::InvalidType {
        path: path.clone(),
        expected: "sequence",
        found: kind_of(value),
    })?;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| text_value(item, &path.index(i)))
        .collect()
}

/// Read a signed integer.
pub fn integer_value(value: &Value, path: &FieldPath) -> Result<i64, SchemaError> {
    match value {
        Value::Number(n) => n.as_i64().ok_or_else(|| {
            if n.is_u64() {
                SchemaError::InvalidValue {
                    path: path.clone(),
                    message: format!("integer {n} is out of range"),
                }
            } else {
                SchemaError::InvalidType {
                    path: path.clone(),
                    expected: "integer",
                    found: "float",
                }
            }
        }),
        other => Err(SchemaError::InvalidType {
            path: path.clone(),
            expected: "integer",
            found: kind_of(other),
        }),
    }
}

/// A view over one mapping in a document, positioned at `path`.
#[derive(Debug, Clone)]
pub struct MappingReader<'a> {
    map: &'a Map<String, Value>,
    path: FieldPath,
}

impl<'a> MappingReader<'a> {
    /// Wrap `value`, which must be a mapping.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::InvalidType` if `value` is not a mapping.
    pub fn new(value: &'a Value, path: FieldPath) -> Result<Self, SchemaError> {
        match value {
            Value::Object(map) => Ok(Self { map, path }),
            other => Err(SchemaError::InvalidType {
                path,
                expected: "mapping",
                found: kind_of(other),
            }),
        }
    }

    /// Path of this mapping.
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Path of `key` within this mapping.
    pub fn field_path(&self, key: &str) -> FieldPath {
        self.path.key(key)
    }

    /// The value under `key`; `null` reads as absent.
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    /// Returns true if `key` holds a non-null value.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// All entries in document order, including nulls.
    pub fn entries(&self) -> impl Iterator<Item = (&'a str, &'a Value)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if the mapping has no entries.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Paths of keys not listed in `known`, in document order.
    pub fn unknown_keys(&self, known: &[&str]) -> Vec<FieldPath> {
        self.map
            .keys()
            .filter(|k| !known.contains(&k.as_str()))
            .map(|k| self.path.key(k.as_str()))
            .collect()
    }

    /// Paths under `keys` where a number stands in for text, including
    /// numbers inside sequences, in the order of `keys`.
    pub fn numbers_as_text(&self, keys: &[&str]) -> Vec<FieldPath> {
        let mut paths = Vec::new();
        for key in keys {
            match self.get(key) {
                Some(Value::Number(_)) => paths.push(self.field_path(key)),
                Some(Value::Array(items)) => {
                    let base = self.field_path(key);
                    paths.extend(
                        items
                            .iter()
                            .enumerate()
                            .filter(|(_, item)| item.is_number())
                            .map(|(i, _)| base.index(i)),
                    );
                }
                _ => {}
            }
        }
        paths
    }

    /// Optional text field.
    pub fn opt_text(&self, key: &str) -> Result<Option<String>, SchemaError> {
        self.get(key)
            .map(|v| text_value(v, &self.field_path(key)))
            .transpose()
    }

    /// Required text field.
    pub fn req_text(&self, key: &str) -> Result<String, SchemaError> {
        self.opt_text(key)?.ok_or_else(|| self.missing(key))
    }

    /// Optional boolean field.
    pub fn opt_bool(&self, key: &str) -> Result<Option<bool>, SchemaError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(SchemaError::InvalidType {
                path: self.field_path(key),
                expected: "boolean",
                found: kind_of(other),
            }),
        }
    }

    /// Optional integer field.
    pub fn opt_integer(&self, key: &str) -> Result<Option<i64>, SchemaError> {
        self.get(key)
            .map(|v| integer_value(v, &self.field_path(key)))
            .transpose()
    }

    /// Optional numeric field, integer or float, kept as written.
    pub fn opt_number(&self, key: &str) -> Result<Option<Number>, SchemaError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Number(n)) => Ok(Some(n.clone())),
            Some(other) => Err(SchemaError::InvalidType {
                path: self.field_path(key),
                expected: "number",
                found: kind_of(other),
            }),
        }
    }

    /// Required numeric field.
    pub fn req_number(&self, key: &str) -> Result<Number, SchemaError> {
        self.opt_number(key)?.ok_or_else(|| self.missing(key))
    }

    /// Optional sequence of text values.
    pub fn opt_text_seq(&self, key: &str) -> Result<Option<Vec<String>>, SchemaError> {
        self.get(key)
            .map(|v| text_seq_value(v, &self.field_path(key)))
            .transpose()
    }

    /// Optional sequence, returned raw for element-wise handling.
    pub fn opt_seq(&self, key: &str) -> Result<Option<&'a [Value]>, SchemaError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Array(items)) => Ok(Some(items.as_slice())),
            Some(other) => Err(SchemaError::InvalidType {
                path: self.field_path(key),
                expected: "sequence",
                found: kind_of(other),
            }),
        }
    }

    /// Optional nested mapping.
    pub fn opt_mapping(&self, key: &str) -> Result<Option<MappingReader<'a>>, SchemaError> {
        self.get(key)
            .map(|v| MappingReader::new(v, self.field_path(key)))
            .transpose()
    }

    fn missing(&self, key: &str) -> SchemaError {
        SchemaError::MissingField {
            path: self.field_path(key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reader(value: &Value) -> MappingReader<'_> {
        MappingReader::new(value, FieldPath::root().key("items").key("slot_0")).unwrap()
    }

    #[test]
    fn non_mapping_is_rejected() {
        let value = json!([1, 2]);
        let err = MappingReader::new(&value, FieldPath::root()).unwrap_err();
        assert_eq!(
            err,
            SchemaError::InvalidType {
                path: FieldPath::root(),
                expected: "mapping",
                found: "sequence",
            }
        );
    }

    #[test]
    fn null_reads_as_absent() {
        let value = json!({"display_name": null});
        let r = reader(&value);
        assert!(!r.contains("display_name"));
        assert_eq!(r.opt_text("display_name").unwrap(), None);
    }

    #[test]
    fn numbers_as_text_lists_coerced_positions() {
        let value = json!({"display_name": 5, "lore": ["line", 100], "material": "STONE", "slot": 0});
        let paths: Vec<String> = reader(&value)
            .numbers_as_text(&["material", "display_name", "lore"])
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(paths, vec!["items.slot_0.display_name", "items.slot_0.lore[1]"]);
    }

    #[test]
    fn numbers_coerce_to_text() {
        let value = json!({"lore": ["line", 100, 2.5]});
        let r = reader(&value);
        assert_eq!(
            r.opt_text_seq("lore").unwrap(),
            Some(vec!["line".to_string(), "100".to_string(), "2.5".to_string()])
        );
    }

    #[test]
    fn bad_sequence_element_reports_index() {
        let value = json!({"lore": ["ok", true]});
        let err = reader(&value).opt_text_seq("lore").unwrap_err();
        assert_eq!(err.path().to_string(), "items.slot_0.lore[1]");
    }

    #[test]
    fn float_is_not_an_integer() {
        let value = json!({"priority": 1.5});
        let err = reader(&value).opt_integer("priority").unwrap_err();
        assert!(matches!(
            err,
            SchemaError::InvalidType {
                expected: "integer",
                found: "float",
                ..
            }
        ));
    }

    #[test]
    fn required_text_missing() {
        let value = json!({});
        let err = reader(&value).req_text("permission").unwrap_err();
        assert_eq!(
            err,
            SchemaError::MissingField {
                path: FieldPath::root()
                    .key("items")
                    .key("slot_0")
                    .key("permission")
            }
        );
    }

    #[test]
    fn number_keeps_integer_representation() {
        let value = json!({"amount": 100, "other": 2.5});
        let r = reader(&value);
        assert_eq!(r.req_number("amount").unwrap(), Number::from(100));
        assert!(r.req_number("other").unwrap().is_f64());
    }

    #[test]
    fn unknown_keys_in_document_order() {
        let value = json!({"slot": 1, "glow": true, "material": "STONE", "amount": 3});
        let unknown = reader(&value).unknown_keys(&["slot", "material"]);
        let rendered: Vec<String> = unknown.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec!["items.slot_0.glow", "items.slot_0.amount"]
        );
    }

    #[test]
    fn kind_names() {
        assert_eq!(kind_of(&json!(null)), "null");
        assert_eq!(kind_of(&json!(true)), "boolean");
        assert_eq!(kind_of(&json!(3)), "integer");
        assert_eq!(kind_of(&json!(3.5)), "float");
        assert_eq!(kind_of(&json!("x")), "string");
        assert_eq!(kind_of(&json!([])), "sequence");
        assert_eq!(kind_of(&json!({})), "mapping");
    }
}
