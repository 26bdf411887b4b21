//! Open product records and dotted-path field access.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An open product record as returned by the remote catalog.
///
/// Records always carry at least an `id`. `sku`, `label`, and `gtin` are
/// conventional top-level keys; all other domain attributes live under a
/// nested `attributes` object and are addressed by dotted path
/// (`attributes.foo`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(pub Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wrap a JSON value, provided it is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Primary identifier. Every well-formed catalog record has one.
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        self.0.insert(field.into(), value);
    }

    /// Top-level field narrowed to string values.
    pub fn str_field(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    /// Resolve a dotted path (`attributes.foo.bar`) against this record.
    ///
    /// Missing intermediate keys resolve to `None`. Arrays are never
    /// traversed implicitly: a non-final segment landing on an array (or any
    /// non-object) resolves to `None`.
    pub fn resolve_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.0.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Dotted-path lookup narrowed to string values.
    pub fn str_at(&self, path: &str) -> Option<&str> {
        self.resolve_path(path).and_then(Value::as_str)
    }

    /// Dotted-path lookup narrowed to numeric values.
    pub fn number_at(&self, path: &str) -> Option<f64> {
        self.resolve_path(path).and_then(Value::as_f64)
    }

    /// String-valued entries of the nested `attributes` object.
    pub fn string_attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .get("attributes")
            .and_then(Value::as_object)
            .into_iter()
            .flat_map(|attrs| {
                attrs
                    .iter()
                    .filter_map(|(key, value)| value.as_str().map(|s| (key.as_str(), s)))
            })
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
