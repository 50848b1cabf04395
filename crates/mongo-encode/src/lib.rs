//! In-place MongoDB field encoding for JSON documents.
//!
//! Given a parsed document and two sets of field names, [`encode_document`]
//! turns string values under identifier fields into [`ObjectId`]s and string
//! values under timestamp fields into [`Timestamp`]s, at any depth. The
//! document is mutated in place and the same reference is returned.
//!
//! # Example
//!
//! ```
//! use mongo_encode::{document_from_json, encode_document, ObjectId, Timestamp, Value};
//! use serde_json::json;
//!
//! let mut doc = document_from_json(json!({
//!     "owner": {"ownerId": "123456789012345678901234"},
//!     "createdAt": "2024-12-27T12:34:56.000Z",
//!     "name": "report"
//! }))
//! .unwrap();
//!
//! encode_document(&mut doc, ["ownerId"], ["createdAt"]).unwrap();
//!
//! let owner = doc["owner"].as_document().unwrap();
//! assert_eq!(
//!     owner["ownerId"],
//!     Value::ObjectId(ObjectId::parse_str("123456789012345678901234").unwrap())
//! );
//! assert_eq!(
//!     doc["createdAt"],
//!     Value::Timestamp(Timestamp::parse("2024-12-27T12:34:56.000Z"))
//! );
//! assert_eq!(doc["name"].as_str(), Some("report"));
//! ```

pub mod cli;
pub mod config;
pub mod ejson;
pub mod encoder;
pub mod error;
pub mod object_id;
pub mod path;
pub mod timestamp;
pub mod value;

pub use config::{ConfigError, EncoderConfig};
pub use ejson::{ExtendedJsonError, ExtendedJsonOptions, ExtendedJsonWriter};
pub use encoder::{encode_document, DocumentEncoder, EncoderOptions, FieldNameSet, TimestampPolicy};
pub use error::{DocumentError, EncodeError};
pub use object_id::{ObjectId, ObjectIdParseError};
pub use timestamp::Timestamp;
pub use value::{document_from_json, document_from_str, Document, Value};
