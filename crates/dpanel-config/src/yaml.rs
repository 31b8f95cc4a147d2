//! # Document Text Format
//!
//! The plugin reads its menus from YAML files. Rendering and parsing are
//! kept apart from the compiler and loader, which only see [`Document`]s.
//!
//! YAML is parsed into `serde_yaml::Value` first and then converted, so
//! that numeric and boolean mapping keys (`1: ...`) become text keys
//! instead of failing the parse.

use dpanel_core::{kind_of, sha256_digest, CanonicalBytes, ContentDigest, Document};
use serde_json::{Map, Number, Value};

use crate::compiler::compile;
use crate::error::{DocumentError, ImportError};
use crate::loader::{load_with, LoadOptions, LoadOutcome};
use crate::panel::Panel;

/// Render a document as YAML text, keeping key order.
pub fn render_yaml(doc: &Document) -> Result<String, DocumentError> {
    Ok(serde_yaml::to_string(doc)?)
}

/// Parse YAML text into a document.
///
/// # Errors
///
/// Fails on invalid YAML, on YAML with no document equivalent, and when
/// the top level is not a mapping.
pub fn parse_yaml(text: &str) -> Result<Document, DocumentError> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(text)?;
    let doc = yaml_to_document(&yaml)?;
    if !doc.is_object() {
        return Err(DocumentError::NotAMapping {
            found: kind_of(&doc),
        });
    }
    Ok(doc)
}

/// Content digest of a document, independent of key order.
pub fn fingerprint(doc: &Document) -> Result<ContentDigest, DocumentError> {
    let canonical = CanonicalBytes::new(doc)?;
    Ok(sha256_digest(&canonical))
}

/// Compile a panel straight to YAML text.
pub fn export_yaml(panel: &Panel) -> Result<String, DocumentError> {
    render_yaml(&compile(panel))
}

/// Parse YAML text and load it as a panel.
pub fn import_yaml(text: &str, options: &LoadOptions) -> Result<LoadOutcome, ImportError> {
    let doc = parse_yaml(text)?;
    Ok(load_with(&doc, options)?)
}

fn yaml_to_document(yaml: &serde_yaml::Value) -> Result<Value, DocumentError> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(Number::from(i)))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(Number::from(u)))
            } else {
                n.as_f64()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .ok_or_else(|| DocumentError::Unsupported(format!("number {n}")))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => seq
            .iter()
            .map(yaml_to_document)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        serde_yaml::Value::Mapping(map) => {
            let mut out = Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => {
                        return Err(DocumentError::Unsupported(format!("mapping key {other:?}")))
                    }
                };
                out.insert(key, yaml_to_document(v)?);
            }
            Ok(Value::Object(out))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_document(&tagged.value),
    }
}
