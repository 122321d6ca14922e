#![deny(missing_docs)]

//! # Generate Command
//!
//! Runs the compiler and writes the resolved model for the template stage.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use dtogen_core::{compile, CompiledModel};
use tracing::{info, warn};

use crate::error::{CliError, CliResult};

/// Serialisation format of the resolved model.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty printed JSON.
    Json,
    /// YAML.
    Yaml,
}

/// Arguments for the generate command.
#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Root directory holding the OpenAPI schema documents.
    #[clap(long)]
    pub schemas: PathBuf,

    /// Path to the control manifest.
    #[clap(long)]
    pub manifest: PathBuf,

    /// Output format.
    #[clap(long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Output file. The model is written to stdout when absent.
    #[clap(long)]
    pub output: Option<PathBuf>,
}

/// Executes the generate command.
pub fn execute(args: &GenerateArgs) -> CliResult<()> {
    if !args.manifest.exists() {
        return Err(CliError::General(format!(
            "Control manifest not found: {:?}",
            args.manifest
        )));
    }

    let model = compile(&args.schemas, &args.manifest)?;
    if !model.dangling.is_empty() {
        warn!(
            count = model.dangling.len(),
            names = ?model.dangling,
            "model references undefined types"
        );
    }

    let rendered = render(&model, args.format)?;

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, rendered)?;
            info!(path = %path.display(), types = model.types.len(), "wrote model");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}

/// Serialises the model in the requested format.
pub fn render(model: &CompiledModel, format: OutputFormat) -> CliResult<String> {
    let mut text = match format {
        OutputFormat::Json => serde_json::to_string_pretty(model)?,
        OutputFormat::Yaml => serde_yaml::to_string(model)?,
    };
    if !text.ends_with('\n') {
        text.push('\n');
    }
    Ok(text)
}
