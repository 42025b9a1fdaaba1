#![deny(missing_docs)]

//! # Generate Command
//!
//! Builds the Swagger document of the demo API and writes it as JSON or YAML.

use crate::error::CliResult;
use crate::thor;
use std::fs;
use std::path::PathBuf;
use typed_swagger_core::{generate, IgnoreSpec, SwaggerConfig};

/// Arguments for the generate command.
#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Configuration file (YAML or JSON). Uses the built-in demo configuration when absent.
    #[clap(long, env = "TYPED_SWAGGER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output path. `.yaml` / `.yml` write YAML, anything else JSON.
    /// If not provided, prints JSON to stdout.
    #[clap(long)]
    pub output: Option<PathBuf>,

    /// Endpoint paths to leave out of the document.
    #[clap(long = "ignore-path")]
    pub ignore_paths: Vec<String>,
}

/// Executes the generation.
pub fn execute(args: &GenerateArgs) -> CliResult<()> {
    let config = match &args.config {
        Some(path) => SwaggerConfig::from_path(path)?,
        None => SwaggerConfig::from_yaml_str(thor::DEFAULT_CONFIG)?,
    };

    let ignore = args
        .ignore_paths
        .iter()
        .fold(IgnoreSpec::new(), |spec, path| spec.ignore_path(path.clone()));

    let endpoints = thor::endpoints()?;
    let document = generate(&config, &endpoints, &ignore)?;

    let yaml = args
        .output
        .as_ref()
        .and_then(|p| p.extension())
        .and_then(|e| e.to_str())
        .map(|ext| matches!(ext, "yaml" | "yml"))
        .unwrap_or(false);
    let rendered = if yaml {
        document.to_yaml_string()?
    } else {
        document.to_json_string()?
    };

    match &args.output {
        Some(out_path) => {
            if let Some(parent) = out_path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::write(out_path, rendered)?;
            tracing::info!(
                path = %out_path.display(),
                paths = document.paths.len(),
                definitions = document.definitions.len(),
                "swagger document written"
            );
        }
        None => println!("{}", rendered),
    }
    Ok(())
}
