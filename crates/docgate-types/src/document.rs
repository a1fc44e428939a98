//! JSON documents with a reserved identifier field.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the reserved identifier field.
pub const ID_FIELD: &str = "_id";

/// An opaque JSON object stored in a collection.
///
/// Only `_id` carries meaning; every other field is passed through
/// verbatim. Field order is preserved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a document whose `_id` is forced to `id`, followed by every
    /// other field of `payload`.
    pub fn with_id(id: impl Into<String>, payload: &Document) -> Self {
        let mut fields = Map::with_capacity(payload.0.len() + 1);
        fields.insert(ID_FIELD.to_string(), Value::String(id.into()));
        for (key, value) in &payload.0 {
            if key != ID_FIELD {
                fields.insert(key.clone(), value.clone());
            }
        }
        Self(fields)
    }

    /// Returns the `_id` value when it is a string.
    pub fn id(&self) -> Option<&str> {
        self.0.get(ID_FIELD).and_then(Value::as_str)
    }

    /// Whether the document carries an `_id` field of any type.
    pub fn contains_id(&self) -> bool {
        self.0.contains_key(ID_FIELD)
    }

    /// Copies every field of `changes` into this document, overwriting
    /// existing keys. `_id` is never touched.
    pub fn merge(&mut self, changes: &Document) {
        for (key, value) in &changes.0 {
            if key != ID_FIELD {
                self.0.insert(key.clone(), value.clone());
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Document {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        Value::Object(doc.0)
    }
}

impl TryFrom<Value> for Document {
    type Error = Value;

    /// Accepts only JSON objects; any other value is handed back.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(other),
        }
    }
}
