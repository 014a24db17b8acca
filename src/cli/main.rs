//! Model configuration check CLI
//!
//! Loads a configuration document, runs the load-time validation pass and
//! prints the resulting input/output description.

use super::config::CliConfigBuilder;
use crate::{
    config::ModelConfigDocument,
    io_entry::IoAttribute,
    store::ModelAttributeStore,
    tracing_config::{init_cli_tracing, spans},
    validator::ConfigValidator,
};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde_json::json;
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::debug;

/// Validate a OneFlow backend model configuration
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "oneflow-config-check")]
pub struct Cli {
    /// Model configuration document (JSON)
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = CliOutputFormat::Text)]
    pub format: CliOutputFormat,

    /// Accept duplicate input/output names (later entries replace earlier ones)
    #[arg(long)]
    pub allow_duplicates: bool,

    /// Reject dimensions written as strings
    #[arg(long)]
    pub strict_dims: bool,

    /// Model name used in log output [default: document name or file stem]
    #[arg(long)]
    pub model_name: Option<String>,

    /// Enable verbose logging (-v: DEBUG, -vv: TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log output format (json needs the `tracing-json` feature)
    #[arg(long, value_enum, default_value_t = CliLogFormat::Console)]
    pub log_format: CliLogFormat,

    /// Write logs to PATH instead of stderr (needs the `tracing-files` feature)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum CliOutputFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum CliLogFormat {
    Console,
    Compact,
    Json,
}

pub fn main() -> Result<()> {
    let cli = Cli::parse();

    let _tracing = init_cli_tracing(CliConfigBuilder::tracing_from_cli(&cli)?)
        .context("Failed to initialize tracing")?;

    let span = spans::config_check(&cli.config);
    let _enter = span.enter();

    let document = ModelConfigDocument::from_file(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    let config = CliConfigBuilder::from_cli(&cli, document.model_name());
    debug!(config = ?config, "Validator configuration");

    let store = ConfigValidator::new(config)
        .validate(&document)
        .with_context(|| format!("Invalid model configuration {}", cli.config.display()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.format {
        CliOutputFormat::Text => render_text(&store, &mut out)?,
        CliOutputFormat::Json => render_json(&store, &mut out)?,
    }
    out.flush()?;

    Ok(())
}

/// Print a human-readable summary, entries in document order
fn render_text<W: Write>(store: &ModelAttributeStore, out: &mut W) -> io::Result<()> {
    writeln!(out, "backend: {}", store.backend_kind())?;
    writeln!(out, "inputs ({}):", store.num_inputs())?;
    write_entries(out, store.input_names(), store.input_attributes())?;
    writeln!(out, "outputs ({}):", store.num_outputs())?;
    write_entries(out, store.output_names(), store.output_attributes())?;
    Ok(())
}

fn write_entries<W: Write>(
    out: &mut W,
    names: &[String],
    attributes: &HashMap<String, IoAttribute>,
) -> io::Result<()> {
    for name in names {
        if let Some(attribute) = attributes.get(name) {
            writeln!(
                out,
                "  {name:<24} {:<6} {}",
                attribute.data_type,
                format_shape(&attribute.shape)
            )?;
        }
    }
    Ok(())
}

fn format_shape(shape: &[i64]) -> String {
    let dims: Vec<String> = shape.iter().map(ToString::to_string).collect();
    format!("[{}]", dims.join(", "))
}

/// Print the store as JSON, entries as ordered arrays
fn render_json<W: Write>(store: &ModelAttributeStore, out: &mut W) -> io::Result<()> {
    let entries = |names: &[String], attributes: &HashMap<String, IoAttribute>| {
        names
            .iter()
            .filter_map(|name| {
                attributes.get(name).map(|attribute| {
                    json!({
                        "name": name,
                        "data_type": attribute.data_type,
                        "shape": attribute.shape,
                        "order_index": attribute.order_index,
                    })
                })
            })
            .collect::<Vec<_>>()
    };

    let value = json!({
        "backend_kind": store.backend_kind(),
        "inputs": entries(store.input_names(), store.input_attributes()),
        "outputs": entries(store.output_names(), store.output_attributes()),
    });
    serde_json::to_writer_pretty(&mut *out, &value)?;
    writeln!(out)
}
