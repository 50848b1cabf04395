//! [`Value`] — the document tree the encoder walks and rewrites.
//!
//! A closed union of the JSON shapes plus the two rich MongoDB types the
//! encoder produces. Maps keep their insertion order.

use indexmap::IndexMap;

use crate::error::DocumentError;
use crate::object_id::ObjectId;
use crate::timestamp::Timestamp;

/// Ordered key-value map; the top-level unit the encoder operates on.
pub type Document = IndexMap<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    /// JSON number, kept exactly as parsed (integer vs float).
    Number(serde_json::Number),
    String(String),
    Array(Vec<Value>),
    Document(Document),
    ObjectId(ObjectId),
    Timestamp(Timestamp),
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Document(_) => "document",
            Value::ObjectId(_) => "objectId",
            Value::Timestamp(_) => "timestamp",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Value::Document(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object_id(&self) -> Option<&ObjectId> {
        match self {
            Value::ObjectId(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<&Timestamp> {
        match self {
            Value::Timestamp(ts) => Some(ts),
            _ => None,
        }
    }

    pub fn is_document(&self) -> bool {
        matches!(self, Value::Document(_))
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(arr) => {
                Value::Array(arr.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(obj) => Value::Document(
                obj.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
            ),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<ObjectId> for Value {
    fn from(id: ObjectId) -> Self {
        Value::ObjectId(id)
    }
}

impl From<Timestamp> for Value {
    fn from(ts: Timestamp) -> Self {
        Value::Timestamp(ts)
    }
}

impl From<Document> for Value {
    fn from(d: Document) -> Self {
        Value::Document(d)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

/// Build a [`Document`] from a parsed JSON value whose root must be an object.
pub fn document_from_json(v: serde_json::Value) -> Result<Document, DocumentError> {
    match Value::from(v) {
        Value::Document(d) => Ok(d),
        other => Err(DocumentError::NotAnObject(other.kind())),
    }
}

/// Parse JSON text into a [`Document`].
pub fn document_from_str(json: &str) -> Result<Document, DocumentError> {
    let v: serde_json::Value = serde_json::from_str(json)?;
    document_from_json(v)
}
