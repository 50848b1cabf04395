//! Logic behind the `mongo-encode` binary: JSON in, Extended JSON out.

use thiserror::Error;

use crate::config::{ConfigError, EncoderConfig};
use crate::ejson::{ExtendedJsonError, ExtendedJsonOptions, ExtendedJsonWriter};
use crate::encoder::TimestampPolicy;
use crate::error::{DocumentError, EncodeError};
use crate::value::document_from_str;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Output(#[from] ExtendedJsonError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Clone, Default)]
pub struct CliOptions {
    pub config: EncoderConfig,
    /// Forces [`TimestampPolicy::Strict`] regardless of `config`.
    pub strict_dates: bool,
    pub canonical: bool,
    pub pretty: bool,
}

/// Parse `input` as a JSON object, encode it and render Extended JSON.
pub fn run(input: &str, options: &CliOptions) -> Result<String, CliError> {
    let mut config = options.config.clone();
    if options.strict_dates {
        config.timestamp_policy = TimestampPolicy::Strict;
    }
    let mut document = document_from_str(input.trim())?;
    config.build().encode(&mut document)?;

    let writer = ExtendedJsonWriter::with_options(ExtendedJsonOptions {
        canonical: options.canonical,
    });
    let out = if options.pretty {
        writer.to_string_pretty(&document)?
    } else {
        writer.to_string(&document)?
    };
    Ok(out)
}
