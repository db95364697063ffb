//! # veridoc CLI Entry Point
//!
//! Parses flags, merges them with the optional YAML request config,
//! enforces the caller-level preconditions, and runs one validation pass.

use std::path::PathBuf;

use clap::Parser;

use veridoc_cli::config::{Overrides, RequestConfig, ResolvedRequest};
use veridoc_cli::render;
use veridoc_cli::OutputFormat;
use veridoc_engine::Engine;

/// Validate JSON/YAML documents against schemas, pattern rules, path
/// expressions, and whitespace hygiene.
#[derive(Parser, Debug)]
#[command(name = "veridoc", version, about)]
struct Cli {
    /// Path to a YAML request-config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to the YAML or JSON data file.
    #[arg(long)]
    data: Option<PathBuf>,

    /// Comma-separated JSON schema files or URLs.
    #[arg(long)]
    schemas: Option<String>,

    /// Output rendering.
    #[arg(long, value_enum)]
    output: Option<OutputFormat>,

    /// Exit non-zero when validation fails.
    #[arg(long)]
    strict_validation: Option<bool>,

    /// Audit tabs and trailing whitespace.
    #[arg(long)]
    check_trailing_whitespace: Option<bool>,

    /// Inline JSON array of pattern-rule objects.
    #[arg(long)]
    pattern_rules: Option<String>,

    /// Inline JSON array of search-path objects.
    #[arg(long)]
    search_paths: Option<String>,

    /// Comma- or newline-separated extension names.
    #[arg(long)]
    extensions: Option<String>,
}

impl Cli {
    fn overrides(&self) -> anyhow::Result<Overrides> {
        Ok(Overrides {
            data: self.data.clone(),
            schemas: self.schemas.as_deref().map(|list| {
                list.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            }),
            output: self.output,
            strict_validation: self.strict_validation,
            check_trailing_whitespace: self.check_trailing_whitespace,
            regex_pattern_rules: self
                .pattern_rules
                .as_deref()
                .map(|raw| serde_json::from_str(raw))
                .transpose()
                .map_err(|err| anyhow::anyhow!("parse --pattern-rules: {err}"))?,
            search_paths: self
                .search_paths
                .as_deref()
                .map(|raw| serde_json::from_str(raw))
                .transpose()
                .map_err(|err| anyhow::anyhow!("parse --search-paths: {err}"))?,
            extensions: self.extensions.clone(),
        })
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = RequestConfig::load(cli.config.as_deref())?;
    let resolved = ResolvedRequest::merge(config, cli.overrides()?)?;

    tracing::info!(data = %resolved.data.display(), "validation started");

    let data = std::fs::read(&resolved.data).map_err(|err| {
        anyhow::anyhow!("read data file {}: {err}", resolved.data.display())
    })?;

    if veridoc_core::is_unknown(&data) {
        anyhow::bail!(
            "Provided data is neither valid JSON nor valid YAML. Please check if your YAML/JSON is correct."
        );
    }

    let request = resolved.to_validation_request(String::from_utf8_lossy(&data).into_owned());
    let engine = Engine::new();
    let response = engine.validate(&request);

    let rendered = match resolved.output {
        OutputFormat::Json => render::to_json(&response)?,
        OutputFormat::Yaml => render::to_yaml(&response)?,
        OutputFormat::Text => render::to_text(&response),
    };
    println!("{rendered}");

    tracing::info!(valid = response.validation_summary.valid, "validation finished");

    if resolved.strict_validation && !response.validation_summary.valid {
        std::process::exit(1);
    }
    Ok(())
}
