//! # Request Configuration
//!
//! A request can come from a YAML config file, from flags, or both.
//! Flags override file values; defaults apply last (strict validation
//! and the whitespace audit are both on by default).

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::ValueEnum;
use serde::Deserialize;

use veridoc_engine::ValidationRequest;
use veridoc_paths::PathSpec;
use veridoc_rules::PatternRule;

/// How the CLI renders the validation response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
    #[default]
    Text,
}

/// The YAML request-config file.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestConfig {
    pub cli_output_format: Option<String>,
    pub schemas: Vec<String>,
    pub data: Option<PathBuf>,
    pub strict_validation: Option<bool>,
    pub check_trailing_whitespace: Option<bool>,
    pub regex_pattern_rules: Vec<PatternRule>,
    pub search_paths: Vec<PathSpec>,
    pub extensions: Option<String>,
}

impl RequestConfig {
    /// Load a config file, or an empty config when no path is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("config file does not exist: {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("parse config file {}", path.display()))
    }
}

/// Flag-level overrides, already parsed out of the command line.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub data: Option<PathBuf>,
    pub schemas: Option<Vec<String>>,
    pub output: Option<OutputFormat>,
    pub strict_validation: Option<bool>,
    pub check_trailing_whitespace: Option<bool>,
    pub regex_pattern_rules: Option<Vec<PatternRule>>,
    pub search_paths: Option<Vec<PathSpec>>,
    pub extensions: Option<String>,
}

/// A fully merged request, ready to run.
#[derive(Debug, Clone)]
pub struct ResolvedRequest {
    pub data: PathBuf,
    pub output: OutputFormat,
    pub strict_validation: bool,
    pub check_trailing_whitespace: bool,
    pub schemas: Vec<String>,
    pub regex_pattern_rules: Vec<PatternRule>,
    pub search_paths: Vec<PathSpec>,
    pub extensions: String,
}

impl ResolvedRequest {
    /// Merge config-file values with flag overrides.
    pub fn merge(config: RequestConfig, overrides: Overrides) -> anyhow::Result<Self> {
        let data = overrides
            .data
            .or(config.data)
            .context("data file must be specified either via the config file or --data")?;

        let output = overrides.output.map(Ok).unwrap_or_else(|| {
            match config.cli_output_format.as_deref() {
                None => Ok(OutputFormat::default()),
                Some(name) => OutputFormat::from_str(name, true)
                    .map_err(|_| anyhow::anyhow!("cliOutputFormat should be json | yaml | text")),
            }
        })?;

        Ok(Self {
            data,
            output,
            strict_validation: overrides
                .strict_validation
                .or(config.strict_validation)
                .unwrap_or(true),
            check_trailing_whitespace: overrides
                .check_trailing_whitespace
                .or(config.check_trailing_whitespace)
                .unwrap_or(true),
            schemas: overrides.schemas.unwrap_or(config.schemas),
            regex_pattern_rules: overrides
                .regex_pattern_rules
                .unwrap_or(config.regex_pattern_rules),
            search_paths: overrides.search_paths.unwrap_or(config.search_paths),
            extensions: overrides
                .extensions
                .or(config.extensions)
                .unwrap_or_default(),
        })
    }

    /// Build the engine request around the data file's content.
    pub fn to_validation_request(&self, data: String) -> ValidationRequest {
        ValidationRequest {
            schemas: self.schemas.clone(),
            data,
            check_trailing_whitespace: Some(self.check_trailing_whitespace),
            regex_pattern_rules: self.regex_pattern_rules.clone(),
            search_paths: self.search_paths.clone(),
            extensions: self.extensions.clone(),
        }
    }
}
