//! Configuration conversion utilities for CLI arguments

use crate::cli::main_impl::{Cli, CliLogFormat};
use crate::config::{DuplicateNamePolicy, ValidatorConfig};
use crate::tracing_config::{TracingConfig, TracingFormat, TracingOutput};

/// Convert CLI arguments to a `ValidatorConfig`
pub(crate) struct CliConfigBuilder;

impl CliConfigBuilder {
    /// Build a validator configuration from CLI arguments
    ///
    /// `document_name` is the `name` field of the loaded document, used when
    /// `--model-name` is not given.
    pub(crate) fn from_cli(cli: &Cli, document_name: Option<&str>) -> ValidatorConfig {
        let policy = if cli.allow_duplicates {
            DuplicateNamePolicy::LastWins
        } else {
            DuplicateNamePolicy::Reject
        };

        let mut builder = ValidatorConfig::builder()
            .duplicate_names(policy)
            .allow_string_dims(!cli.strict_dims);

        let model_name = cli
            .model_name
            .as_deref()
            .or(document_name)
            .map(str::to_string)
            .or_else(|| {
                cli.config
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .map(str::to_string)
            });
        if let Some(name) = model_name {
            builder = builder.model_name(name);
        }

        builder.build()
    }

    /// Build the tracing configuration from the logging flags
    ///
    /// Fails when a flag asks for an output the binary was built without.
    pub(crate) fn tracing_from_cli(cli: &Cli) -> anyhow::Result<TracingConfig> {
        let format = match cli.log_format {
            CliLogFormat::Console => TracingFormat::Console,
            CliLogFormat::Compact => TracingFormat::Compact,
            #[cfg(feature = "tracing-json")]
            CliLogFormat::Json => TracingFormat::Json,
            #[cfg(not(feature = "tracing-json"))]
            CliLogFormat::Json => {
                anyhow::bail!("--log-format json requires the `tracing-json` feature")
            },
        };

        let output = match &cli.log_file {
            None => TracingOutput::Console,
            #[cfg(feature = "tracing-files")]
            Some(path) => TracingOutput::File(path.clone()),
            #[cfg(not(feature = "tracing-files"))]
            Some(_) => anyhow::bail!("--log-file requires the `tracing-files` feature"),
        };

        Ok(TracingConfig::new()
            .with_verbosity(cli.verbose)
            .with_format(format)
            .with_output(output))
    }
}
