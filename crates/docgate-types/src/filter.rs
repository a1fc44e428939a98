//! Opaque selectors used to locate a single document.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::document::{Document, ID_FIELD};

/// An equality selector over top-level document fields.
///
/// Built by callers and handed to the store untouched; the repository
/// never looks inside. An empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filter(Map<String, Value>);

impl Filter {
    /// Selects the document whose `_id` equals `id`.
    pub fn by_id(id: impl Into<String>) -> Self {
        Self::eq(ID_FIELD, Value::String(id.into()))
    }

    /// Selects documents whose `field` equals `value`.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut fields = Map::new();
        fields.insert(field.into(), value.into());
        Self(fields)
    }

    /// Adds another equality condition.
    pub fn and(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Returns the identifier when this filter selects solely by `_id`.
    ///
    /// Store adapters use this to take an indexed lookup path.
    pub fn as_id(&self) -> Option<&str> {
        if self.0.len() != 1 {
            return None;
        }
        self.0.get(ID_FIELD).and_then(Value::as_str)
    }

    /// Whether `doc` satisfies every condition.
    pub fn matches(&self, doc: &Document) -> bool {
        self.0
            .iter()
            .all(|(field, expected)| doc.get(field).is_some_and(|v| values_equal(v, expected)))
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// Numbers compare by value so `25565` matches `25565.0`.
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x == y,
            _ => x.as_f64() == y.as_f64(),
        },
        _ => a == b,
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = serde_json::to_string(&self.0).map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        Document::try_from(value).expect("object")
    }

    #[test]
    fn by_id_matches_identifier_only() {
        let f = Filter::by_id("p-1");
        assert!(f.matches(&doc(json!({"_id": "p-1", "port": 1}))));
        assert!(!f.matches(&doc(json!({"_id": "p-2"}))));
        assert_eq!(f.as_id(), Some("p-1"));
    }

    #[test]
    fn field_filter_compares_numbers_by_value() {
        let f = Filter::eq("port", 25565);
        assert!(f.matches(&doc(json!({"_id": "a", "port": 25565}))));
        assert!(f.matches(&doc(json!({"_id": "a", "port": 25565.0}))));
        assert!(!f.matches(&doc(json!({"_id": "a", "port": "25565"}))));
        assert_eq!(f.as_id(), None);
    }

    #[test]
    fn compound_filter_requires_all_fields() {
        let f = Filter::by_id("a").and("region", "eu");
        assert!(f.matches(&doc(json!({"_id": "a", "region": "eu"}))));
        assert!(!f.matches(&doc(json!({"_id": "a", "region": "us"}))));
        assert_eq!(f.as_id(), None);
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(Filter::default().matches(&doc(json!({"_id": "z"}))));
    }

    #[test]
    fn display_renders_compact_json() {
        assert_eq!(Filter::by_id("x").to_string(), r#"{"_id":"x"}"#);
    }
}
