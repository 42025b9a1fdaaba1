#![deny(missing_docs)]

//! # Typed Swagger CLI
//!
//! Command Line Interface for the Swagger 2.0 document generator.
//!
//! Supported Commands:
//! - `generate`: Builds the demo API document and writes JSON or YAML.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::error::CliResult;

mod error;
mod generate;
mod thor;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Typed Swagger CLI")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generates the Swagger 2.0 document of the demo API.
    Generate(generate::GenerateArgs),
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> CliResult<()> {
    init_tracing();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Generate(args) => generate::execute(args)?,
    }

    Ok(())
}
