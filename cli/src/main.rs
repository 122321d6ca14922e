#![deny(missing_docs)]

//! # DTO Generator CLI
//!
//! Command line front end for the schema compiler.
//!
//! Supported Commands:
//! - `generate`: OpenAPI schemas + control manifest -> resolved type model (JSON or YAML).
//!
//! Diagnostics go to stderr through `tracing`; set `RUST_LOG` to adjust
//! the level (default `warn`).

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::error::CliResult;

mod error;
mod generate;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Pulumi DTO model generator")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile schemas and the control manifest into the resolved type model.
    Generate(generate::GenerateArgs),
}

fn main() -> CliResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Generate(args) => generate::execute(args)?,
    }

    Ok(())
}
