//! MongoDB Extended JSON v2 output for encoded documents.
//!
//! Two modes:
//! - **Relaxed** (default): numbers stay native JSON, dates in 1970-9999 are
//!   written as ISO strings.
//! - **Canonical**: numbers and dates always use explicit type wrappers.
//!
//! ObjectIds are `{"$oid":"<hex>"}` in both modes.

use serde_json::{json, Map};
use thiserror::Error;

use crate::path::{format_pointer, PathSegment};
use crate::timestamp::Timestamp;
use crate::value::{Document, Value};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtendedJsonError {
    /// The invalid timestamp has no Extended JSON form.
    #[error("Invalid Date at {0:?}")]
    InvalidDate(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtendedJsonOptions {
    pub canonical: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExtendedJsonWriter {
    pub options: ExtendedJsonOptions,
}

impl ExtendedJsonWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn canonical() -> Self {
        Self::with_options(ExtendedJsonOptions { canonical: true })
    }

    pub fn with_options(options: ExtendedJsonOptions) -> Self {
        Self { options }
    }

    pub fn write_document(&self, document: &Document) -> Result<serde_json::Value, ExtendedJsonError> {
        let mut path = Vec::new();
        self.write_fields(document, &mut path)
    }

    pub fn write_value(&self, value: &Value) -> Result<serde_json::Value, ExtendedJsonError> {
        let mut path = Vec::new();
        self.write_any(value, &mut path)
    }

    pub fn to_string(&self, document: &Document) -> Result<String, ExtendedJsonError> {
        Ok(self.write_document(document)?.to_string())
    }

    pub fn to_string_pretty(&self, document: &Document) -> Result<String, ExtendedJsonError> {
        let value = self.write_document(document)?;
        // Serializing a serde_json::Value into a String cannot fail.
        Ok(serde_json::to_string_pretty(&value).unwrap_or_default())
    }

    // ----------------------------------------------------------------
    // Dispatch

    fn write_any<'d>(
        &self,
        value: &'d Value,
        path: &mut Vec<PathSegment<'d>>,
    ) -> Result<serde_json::Value, ExtendedJsonError> {
        Ok(match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => self.write_number(n),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    path.push(PathSegment::Index(i));
                    out.push(self.write_any(item, path)?);
                    path.pop();
                }
                serde_json::Value::Array(out)
            }
            Value::Document(d) => self.write_fields(d, path)?,
            Value::ObjectId(id) => json!({ "$oid": id.to_hex() }),
            Value::Timestamp(ts) => self.write_date(ts, path)?,
        })
    }

    fn write_fields<'d>(
        &self,
        document: &'d Document,
        path: &mut Vec<PathSegment<'d>>,
    ) -> Result<serde_json::Value, ExtendedJsonError> {
        let mut out = Map::with_capacity(document.len());
        for (k, v) in document {
            path.push(PathSegment::Key(k));
            out.insert(k.clone(), self.write_any(v, path)?);
            path.pop();
        }
        Ok(serde_json::Value::Object(out))
    }

    // ----------------------------------------------------------------
    // Date

    fn write_date(&self, ts: &Timestamp, path: &[PathSegment<'_>]) -> Result<serde_json::Value, ExtendedJsonError> {
        let (Some(ms), Some(dt)) = (ts.timestamp_millis(), ts.to_datetime()) else {
            return Err(ExtendedJsonError::InvalidDate(format_pointer(path.iter().copied())));
        };
        if !self.options.canonical && (1970..=9999).contains(&chrono::Datelike::year(&dt)) {
            if let Some(iso) = ts.to_iso_string() {
                return Ok(json!({ "$date": iso }));
            }
        }
        Ok(json!({ "$date": { "$numberLong": ms.to_string() } }))
    }

    // ----------------------------------------------------------------
    // Numbers

    fn write_number(&self, n: &serde_json::Number) -> serde_json::Value {
        if !self.options.canonical {
            return serde_json::Value::Number(n.clone());
        }
        if let Some(i) = n.as_i64() {
            if i32::try_from(i).is_ok() {
                json!({ "$numberInt": i.to_string() })
            } else {
                json!({ "$numberLong": i.to_string() })
            }
        } else {
            let f = n.as_f64().unwrap_or(f64::NAN);
            json!({ "$numberDouble": format_double(f) })
        }
    }
}

fn format_double(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f == f64::INFINITY {
        "Infinity".to_string()
    } else if f == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        // Debug keeps a trailing `.0` on integral values.
        format!("{f:?}")
    }
}
