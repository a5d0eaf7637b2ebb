#![deny(missing_docs)]

//! # gosrv CLI
//!
//! Command Line Interface for the Go server generator core.
//!
//! Supported Commands:
//! - `enrich`: OpenAPI document -> enriched package/condition tree (JSON) for a renderer.
//!
//! Log verbosity follows `RUST_LOG`; logs go to stderr so JSON on stdout stays clean.

use clap::{Parser, Subcommand};

use crate::error::CliResult;

mod enrich;
mod error;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Go server generator CLI")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve packages, aliases, imports and validation conditions for every model and operation.
    Enrich(enrich::EnrichArgs),
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Enrich(args) => enrich::execute(args)?,
    }

    Ok(())
}
