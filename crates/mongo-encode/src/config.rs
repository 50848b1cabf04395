//! Encoder configuration loaded from JSON or TOML.
//!
//! ```toml
//! identifierFields = ["_id", "ownerId"]
//! timestampFields = ["createdAt"]
//! timestampPolicy = "strict"
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::encoder::{DocumentEncoder, EncoderOptions, TimestampPolicy};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid JSON config: {0}")]
    Json(String),
    #[error("invalid TOML config: {0}")]
    Toml(String),
    #[error("cannot read {path}: {message}")]
    Io { path: String, message: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EncoderConfig {
    #[serde(default)]
    pub identifier_fields: Vec<String>,
    #[serde(default)]
    pub timestamp_fields: Vec<String>,
    #[serde(default)]
    pub timestamp_policy: TimestampPolicy,
}

impl EncoderConfig {
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(|e| ConfigError::Json(e.to_string()))
    }

    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Toml(e.to_string()))
    }

    /// Reads a `.toml` file as TOML and anything else as JSON.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml(&text),
            _ => Self::from_json(&text),
        }
    }

    pub fn options(&self) -> EncoderOptions {
        EncoderOptions {
            timestamp_policy: self.timestamp_policy,
        }
    }

    pub fn build(&self) -> DocumentEncoder {
        DocumentEncoder::with_options(
            self.identifier_fields.iter().map(String::as_str),
            self.timestamp_fields.iter().map(String::as_str),
            self.options(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_camel_case_json() {
        let cfg = EncoderConfig::from_json(
            r#"{"identifierFields": ["_id"], "timestampFields": ["at"], "timestampPolicy": "strict"}"#,
        )
        .unwrap();
        assert_eq!(cfg.identifier_fields, vec!["_id"]);
        assert_eq!(cfg.timestamp_fields, vec!["at"]);
        assert_eq!(cfg.timestamp_policy, TimestampPolicy::Strict);
    }

    #[test]
    fn reads_toml() {
        let cfg = EncoderConfig::from_toml(
            "identifierFields = [\"a\", \"b\"]\ntimestampPolicy = \"lenient\"\n",
        )
        .unwrap();
        assert_eq!(cfg.identifier_fields, vec!["a", "b"]);
        assert!(cfg.timestamp_fields.is_empty());
        assert_eq!(cfg.timestamp_policy, TimestampPolicy::Lenient);
    }

    #[test]
    fn missing_keys_default() {
        assert_eq!(EncoderConfig::from_json("{}").unwrap(), EncoderConfig::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            EncoderConfig::from_json(r#"{"idFields": ["x"]}"#),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            EncoderConfig::from_json(r#"{"timestampPolicy": "sometimes"}"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn build_carries_fields_and_policy() {
        let cfg = EncoderConfig {
            identifier_fields: vec!["id".into()],
            timestamp_fields: vec!["at".into()],
            timestamp_policy: TimestampPolicy::Strict,
        };
        let encoder = cfg.build();
        assert!(encoder.identifier_fields().contains("id"));
        assert!(encoder.timestamp_fields().contains("at"));
        assert_eq!(encoder.options().timestamp_policy, TimestampPolicy::Strict);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = EncoderConfig::from_path(Path::new("/nonexistent/encoder.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
