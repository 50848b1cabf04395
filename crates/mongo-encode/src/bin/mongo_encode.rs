//! `mongo-encode` — convert named fields of a JSON document (stdin) to
//! ObjectId/Date values and print MongoDB Extended JSON (stdout).
//!
//! Usage:
//!   mongo-encode [--id-field KEY]... [--date-field KEY]... [--config FILE]
//!                [--strict-dates] [--canonical] [--pretty]
//!
//! Set `RUST_LOG=mongo_encode=debug` to see what the encoder is doing.

use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use mongo_encode::cli::{run, CliOptions};
use mongo_encode::config::EncoderConfig;

#[derive(Parser, Debug)]
#[command(name = "mongo-encode", version, about)]
struct Args {
    /// Key whose string values become ObjectIds. Repeatable.
    #[arg(long = "id-field", value_name = "KEY")]
    id_fields: Vec<String>,
    /// Key whose string values become Dates. Repeatable.
    #[arg(long = "date-field", value_name = "KEY")]
    date_fields: Vec<String>,
    /// JSON or TOML file with identifierFields / timestampFields / timestampPolicy.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Fail on unparseable dates instead of storing an invalid date.
    #[arg(long)]
    strict_dates: bool,
    /// Emit canonical rather than relaxed Extended JSON.
    #[arg(long)]
    canonical: bool,
    #[arg(long)]
    pretty: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => EncoderConfig::from_path(path)?,
        None => EncoderConfig::default(),
    };
    config.identifier_fields.extend(args.id_fields);
    config.timestamp_fields.extend(args.date_fields);

    let options = CliOptions {
        config,
        strict_dates: args.strict_dates,
        canonical: args.canonical,
        pretty: args.pretty,
    };

    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("reading stdin")?;

    let out = run(&input, &options)?;
    let mut stdout = io::stdout().lock();
    stdout.write_all(out.as_bytes())?;
    stdout.write_all(b"\n")?;
    Ok(())
}
