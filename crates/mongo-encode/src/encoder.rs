//! In-place conversion of named string fields to ObjectId and Timestamp values.
//!
//! Field names match by bare key anywhere in the tree. For each `(key, value)`
//! of a document, in key order:
//!
//! 1. a nested document is descended into; the key itself is never converted;
//! 2. an array whose elements are all documents is descended into element by
//!    element; the key itself is never converted;
//! 3. any other array has its string elements converted under `key`, and the
//!    string elements of directly nested arrays too. Documents inside such an
//!    array are left as they are, not descended into;
//! 4. a string under `key` is converted; other scalars are left alone.
//!
//! Identifier fields take precedence when a key is in both sets. A malformed
//! identifier is always an error. A malformed date becomes
//! [`Timestamp::INVALID`] unless [`TimestampPolicy::Strict`] is selected.
//!
//! The walk keeps its own stack of borrowed iterators instead of recursing, so
//! [`DocumentEncoder::encode`] handles any nesting depth that fits in memory.
//! [`DocumentEncoder::encoded`] does not; see its docs.

use indexmap::IndexSet;
use serde::Deserialize;

use crate::error::EncodeError;
use crate::object_id::ObjectId;
use crate::path::{format_pointer, PathSegment};
use crate::timestamp::Timestamp;
use crate::value::{Document, Value};

// ----------------------------------------------------------------
// Options

/// What happens to a string under a timestamp field that does not parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampPolicy {
    /// Store [`Timestamp::INVALID`] and carry on.
    #[default]
    Lenient,
    /// Fail with [`EncodeError::MalformedTimestamp`].
    Strict,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncoderOptions {
    pub timestamp_policy: TimestampPolicy,
}

// ----------------------------------------------------------------
// Field names

/// A set of bare key names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldNameSet(IndexSet<String>);

impl FieldNameSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.0.insert(name.into())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for FieldNameSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>> Extend<S> for FieldNameSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().map(Into::into));
    }
}

// ----------------------------------------------------------------
// Encoder

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conversion {
    Identifier,
    Timestamp,
}

/// Converts configured fields of a [`Document`] in place.
///
/// Immutable once built; one encoder can serve any number of documents.
#[derive(Debug, Clone, Default)]
pub struct DocumentEncoder {
    identifier_fields: FieldNameSet,
    timestamp_fields: FieldNameSet,
    options: EncoderOptions,
}

impl DocumentEncoder {
    pub fn new<I, T>(identifier_fields: I, timestamp_fields: T) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        T: IntoIterator,
        T::Item: Into<String>,
    {
        Self::with_options(identifier_fields, timestamp_fields, EncoderOptions::default())
    }

    /// Encoder that rejects unparseable dates.
    pub fn strict<I, T>(identifier_fields: I, timestamp_fields: T) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        T: IntoIterator,
        T::Item: Into<String>,
    {
        Self::with_options(
            identifier_fields,
            timestamp_fields,
            EncoderOptions {
                timestamp_policy: TimestampPolicy::Strict,
            },
        )
    }

    pub fn with_options<I, T>(identifier_fields: I, timestamp_fields: T, options: EncoderOptions) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        T: IntoIterator,
        T::Item: Into<String>,
    {
        Self {
            identifier_fields: identifier_fields.into_iter().collect(),
            timestamp_fields: timestamp_fields.into_iter().collect(),
            options,
        }
    }

    pub fn identifier_fields(&self) -> &FieldNameSet {
        &self.identifier_fields
    }

    pub fn timestamp_fields(&self) -> &FieldNameSet {
        &self.timestamp_fields
    }

    pub fn options(&self) -> EncoderOptions {
        self.options
    }

    /// Encode `document` in place and hand the same reference back.
    ///
    /// On error the document may already be partly converted.
    pub fn encode<'d>(&self, document: &'d mut Document) -> Result<&'d mut Document, EncodeError> {
        tracing::debug!(
            identifier_fields = self.identifier_fields.len(),
            timestamp_fields = self.timestamp_fields.len(),
            keys = document.len(),
            "encoding document"
        );
        self.walk(document)?;
        Ok(document)
    }

    /// Encode a copy, leaving `document` untouched.
    ///
    /// The copy is made with the recursive `Clone` of [`Document`], so very
    /// deep trees (tens of thousands of levels) can overflow the call stack
    /// here. Use [`encode`](Self::encode) on an owned document for those.
    pub fn encoded(&self, document: &Document) -> Result<Document, EncodeError> {
        let mut copy = document.clone();
        self.walk(&mut copy)?;
        Ok(copy)
    }

    fn walk(&self, document: &mut Document) -> Result<(), EncodeError> {
        let mut stack = vec![Frame::fields(document)];
        while let Some(frame) = stack.last_mut() {
            let Some((key, value)) = frame.advance() else {
                stack.pop();
                continue;
            };
            let descend = match &*value {
                Value::Document(_) => true,
                Value::Array(items) => items.iter().all(Value::is_document),
                _ => false,
            };
            if descend {
                match value {
                    Value::Document(child) => stack.push(Frame::fields(child)),
                    Value::Array(items) => stack.push(Frame::elements(items)),
                    _ => {}
                }
            } else if let Some(key) = key {
                // Elements frames only ever yield documents.
                self.convert_field(key, value, &stack)?;
            }
        }
        Ok(())
    }

    fn conversion_for(&self, key: &str) -> Option<Conversion> {
        if self.identifier_fields.contains(key) {
            Some(Conversion::Identifier)
        } else if self.timestamp_fields.contains(key) {
            Some(Conversion::Timestamp)
        } else {
            None
        }
    }

    fn convert_field(&self, key: &str, value: &mut Value, stack: &[Frame<'_>]) -> Result<(), EncodeError> {
        let Some(conversion) = self.conversion_for(key) else {
            return Ok(());
        };
        let items = match value {
            Value::Array(items) => items,
            scalar => return self.convert_scalar(conversion, key, scalar, || error_path(stack, &[])),
        };
        for (i, item) in items.iter_mut().enumerate() {
            match item {
                Value::Array(inner) => {
                    for (j, element) in inner.iter_mut().enumerate() {
                        self.convert_scalar(conversion, key, element, || {
                            error_path(stack, &[PathSegment::Index(i), PathSegment::Index(j)])
                        })?;
                    }
                }
                element => self.convert_scalar(conversion, key, element, || {
                    error_path(stack, &[PathSegment::Index(i)])
                })?,
            }
        }
        Ok(())
    }

    fn convert_scalar(
        &self,
        conversion: Conversion,
        key: &str,
        value: &mut Value,
        path: impl FnOnce() -> String,
    ) -> Result<(), EncodeError> {
        let Value::String(s) = value else {
            return Ok(());
        };
        let converted = match conversion {
            Conversion::Identifier => match ObjectId::parse_str(s) {
                Ok(id) => Value::ObjectId(id),
                Err(_) => {
                    return Err(EncodeError::MalformedIdentifier {
                        key: key.to_string(),
                        value: s.clone(),
                        path: path(),
                    })
                }
            },
            Conversion::Timestamp => {
                let ts = Timestamp::parse(s);
                if !ts.is_valid() {
                    match self.options.timestamp_policy {
                        TimestampPolicy::Strict => {
                            return Err(EncodeError::MalformedTimestamp {
                                key: key.to_string(),
                                value: s.clone(),
                                path: path(),
                            })
                        }
                        TimestampPolicy::Lenient => {
                            tracing::warn!(key, value = %s, "unparseable date stored as invalid timestamp")
                        }
                    }
                }
                Value::Timestamp(ts)
            }
        };
        tracing::trace!(key, kind = converted.kind(), "converted field");
        *value = converted;
        Ok(())
    }
}

/// Encode `document` in place with the default (lenient) options.
pub fn encode_document<I, T>(
    document: &mut Document,
    identifier_fields: I,
    timestamp_fields: T,
) -> Result<&mut Document, EncodeError>
where
    I: IntoIterator,
    I::Item: Into<String>,
    T: IntoIterator,
    T::Item: Into<String>,
{
    DocumentEncoder::new(identifier_fields, timestamp_fields).encode(document)
}

// ----------------------------------------------------------------
// Work-list

/// A container being visited, plus the position last handed out.
enum Frame<'a> {
    Fields {
        iter: indexmap::map::IterMut<'a, String, Value>,
        at: Option<&'a str>,
    },
    Elements {
        iter: std::iter::Enumerate<std::slice::IterMut<'a, Value>>,
        at: Option<usize>,
    },
}

impl<'a> Frame<'a> {
    fn fields(document: &'a mut Document) -> Self {
        Frame::Fields {
            iter: document.iter_mut(),
            at: None,
        }
    }

    fn elements(items: &'a mut [Value]) -> Self {
        Frame::Elements {
            iter: items.iter_mut().enumerate(),
            at: None,
        }
    }

    /// Next child, with its key when the container is a document.
    fn advance(&mut self) -> Option<(Option<&'a str>, &'a mut Value)> {
        match self {
            Frame::Fields { iter, at } => iter.next().map(|(k, v)| {
                *at = Some(k.as_str());
                (Some(k.as_str()), v)
            }),
            Frame::Elements { iter, at } => iter.next().map(|(i, v)| {
                *at = Some(i);
                (None, v)
            }),
        }
    }

    fn segment(&self) -> Option<PathSegment<'a>> {
        match self {
            Frame::Fields { at, .. } => at.map(PathSegment::Key),
            Frame::Elements { at, .. } => at.map(PathSegment::Index),
        }
    }
}

fn error_path<'a>(stack: &[Frame<'a>], tail: &[PathSegment<'a>]) -> String {
    format_pointer(stack.iter().filter_map(Frame::segment).chain(tail.iter().copied()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::document_from_json;
    use serde_json::json;

    fn doc(v: serde_json::Value) -> Document {
        document_from_json(v).unwrap()
    }

    #[test]
    fn returns_the_same_document() {
        let mut d = doc(json!({"id": "123456789012345678901234"}));
        let before: *const Document = &d;
        let out = encode_document(&mut d, ["id"], Vec::<String>::new()).unwrap();
        assert!(std::ptr::eq(before, out));
    }

    #[test]
    fn identifier_wins_when_key_is_in_both_sets() {
        let mut d = doc(json!({"k": "123456789012345678901234"}));
        encode_document(&mut d, ["k"], ["k"]).unwrap();
        assert!(d["k"].as_object_id().is_some());
    }

    #[test]
    fn non_string_scalars_under_matching_keys_are_untouched() {
        let mut d = doc(json!({"id": 5, "date": null, "flag": true}));
        let before = d.clone();
        encode_document(&mut d, ["id", "flag"], ["date"]).unwrap();
        assert_eq!(d, before);
    }

    #[test]
    fn error_path_points_into_nested_arrays() {
        let mut d = doc(json!({
            "outer": [{"inner": {"ids": ["123456789012345678901234", ["000000000000000000000001", "bad"]]}}]
        }));
        let err = encode_document(&mut d, ["ids"], Vec::<String>::new()).unwrap_err();
        assert_eq!(
            err,
            EncodeError::MalformedIdentifier {
                key: "ids".into(),
                value: "bad".into(),
                path: "/outer/0/inner/ids/1/1".into(),
            }
        );
    }

    #[test]
    fn error_path_escapes_keys() {
        let mut d = doc(json!({"a/b": {"~id": "xyz"}}));
        let err = encode_document(&mut d, ["~id"], Vec::<String>::new()).unwrap_err();
        assert_eq!(err.path(), "/a~1b/~0id");
        assert_eq!(err.key(), "~id");
    }

    #[test]
    fn strict_policy_rejects_bad_dates() {
        let mut d = doc(json!({"when": ["2024-01-01", "soon"]}));
        let err = DocumentEncoder::strict(Vec::<String>::new(), ["when"])
            .encode(&mut d)
            .unwrap_err();
        assert_eq!(
            err,
            EncodeError::MalformedTimestamp {
                key: "when".into(),
                value: "soon".into(),
                path: "/when/1".into(),
            }
        );
    }

    #[test]
    fn lenient_policy_stores_invalid_sentinel() {
        let mut d = doc(json!({"when": "soon"}));
        encode_document(&mut d, Vec::<String>::new(), ["when"]).unwrap();
        assert_eq!(d["when"], Value::Timestamp(Timestamp::INVALID));
    }

    #[test]
    fn encoded_leaves_input_untouched() {
        let d = doc(json!({"id": "123456789012345678901234"}));
        let out = DocumentEncoder::new(["id"], Vec::<String>::new()).encoded(&d).unwrap();
        assert!(d["id"].as_str().is_some());
        assert!(out["id"].as_object_id().is_some());
    }

    #[test]
    fn deep_nesting_does_not_overflow_the_stack() {
        let mut root = Document::new();
        root.insert("id".into(), Value::from("123456789012345678901234"));
        for _ in 0..100_000 {
            let mut parent = Document::new();
            parent.insert("child".into(), Value::Document(root));
            root = parent;
        }
        encode_document(&mut root, ["id"], Vec::<String>::new()).unwrap();

        let mut cursor = &root;
        while let Some(Value::Document(next)) = cursor.get("child") {
            cursor = next;
        }
        assert!(cursor["id"].as_object_id().is_some());
        // Dropping a 100k-deep tree recurses in the destructor; unwind it by hand.
        let mut next = root.shift_remove("child");
        while let Some(Value::Document(mut d)) = next {
            next = d.shift_remove("child");
        }
    }

    #[test]
    fn array_of_documents_and_scalars_is_walked_in_order() {
        let mut d = doc(json!({
            "items": [{"id": "123456789012345678901234"}, {"id": "000000000000000000000001"}],
            "id": "bad"
        }));
        let err = encode_document(&mut d, ["id"], Vec::<String>::new()).unwrap_err();
        assert_eq!(err.path(), "/id");
        for item in d["items"].as_array().unwrap() {
            assert!(item.as_document().unwrap()["id"].as_object_id().is_some());
        }
    }

    #[test]
    fn field_name_set_deduplicates() {
        let mut set: FieldNameSet = ["a", "b", "a"].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert!(!set.insert("b"));
        set.extend(["c"]);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }
}
