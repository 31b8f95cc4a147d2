//! # Record Emission
//!
//! Every document record the compiler writes is built through [`Record`].
//! The field-omission policy lives in exactly one place,
//! [`Record::present_if`]: a key is written only when its condition holds,
//! and its value is only computed in that case. The other helpers are thin
//! wrappers that state the condition:
//!
//! - [`Record::optional`]: present when the value is set.
//! - [`Record::non_empty`]: present when the sequence has elements.
//! - [`Record::field`]: always present.
//!
//! No helper ever writes `null`.

use serde_json::{Map, Value};

/// A document mapping under construction, keys in insertion order.
#[derive(Debug, Default)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    /// An empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `key` only if `condition` holds; `value` is evaluated lazily.
    pub fn present_if<F>(&mut self, condition: bool, key: &str, value: F) -> &mut Self
    where
        F: FnOnce() -> Value,
    {
        if condition {
            self.fields.insert(key.to_string(), value());
        }
        self
    }

    /// Write `key` unconditionally.
    pub fn field(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        self.present_if(true, key, || value.into())
    }

    /// Write `key` when `value` is set.
    pub fn optional<T: Into<Value>>(&mut self, key: &str, value: Option<T>) -> &mut Self {
        let present = value.is_some();
        self.present_if(present, key, || value.map_or(Value::Null, Into::into))
    }

    /// Write `key` when `items` is non-empty.
    pub fn non_empty<T>(&mut self, key: &str, items: &[T]) -> &mut Self
    where
        T: Clone + Into<Value>,
    {
        self.present_if(!items.is_empty(), key, || {
            Value::Array(items.iter().cloned().map(Into::into).collect())
        })
    }

    /// Number of keys written so far.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no key has been written.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Finish the record.
    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}
