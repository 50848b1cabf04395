//! Error types.

use thiserror::Error;

/// Failure while encoding a document.
///
/// `path` is the JSON Pointer (RFC 6901) of the offending value, `key` the
/// bare field name that selected the conversion.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("error encoding key \"{key}\" at {path}: {value:?} is not a valid ObjectId")]
    MalformedIdentifier {
        key: String,
        value: String,
        path: String,
    },
    /// Only raised under [`TimestampPolicy::Strict`](crate::TimestampPolicy::Strict).
    #[error("error encoding key \"{key}\" at {path}: {value:?} is not a valid date")]
    MalformedTimestamp {
        key: String,
        value: String,
        path: String,
    },
}

impl EncodeError {
    pub fn key(&self) -> &str {
        match self {
            EncodeError::MalformedIdentifier { key, .. }
            | EncodeError::MalformedTimestamp { key, .. } => key,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            EncodeError::MalformedIdentifier { path, .. }
            | EncodeError::MalformedTimestamp { path, .. } => path,
        }
    }
}

/// Failure while turning JSON input into a [`Document`](crate::Document).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DocumentError {
    #[error("invalid JSON: {0}")]
    Json(String),
    #[error("document root must be an object, got {0}")]
    NotAnObject(&'static str),
}

impl From<serde_json::Error> for DocumentError {
    fn from(e: serde_json::Error) -> Self {
        DocumentError::Json(e.to_string())
    }
}
