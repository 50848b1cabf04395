#![allow(dead_code)]

use mongo_encode::{document_from_json, Document, ObjectId, Timestamp, Value};

pub fn doc(v: serde_json::Value) -> Document {
    document_from_json(v).expect("fixture root must be an object")
}

pub fn oid(hex: &str) -> Value {
    Value::ObjectId(ObjectId::parse_str(hex).expect("fixture ObjectId"))
}

pub fn date(s: &str) -> Value {
    Value::Timestamp(Timestamp::parse(s))
}

/// Builds an expected document, reading `{"$oid": hex}` as an ObjectId and
/// `{"$date": text}` as a Timestamp.
pub fn expected(v: serde_json::Value) -> Document {
    match with_markers(Value::from(v)) {
        Value::Document(d) => d,
        other => panic!("expected fixture must be an object, got {}", other.kind()),
    }
}

fn with_markers(v: Value) -> Value {
    match v {
        Value::Document(d) => {
            if d.len() == 1 {
                if let Some(Value::String(hex)) = d.get("$oid") {
                    return oid(hex);
                }
                if let Some(Value::String(s)) = d.get("$date") {
                    return date(s);
                }
            }
            Value::Document(d.into_iter().map(|(k, v)| (k, with_markers(v))).collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(with_markers).collect()),
        other => other,
    }
}
