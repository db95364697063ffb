//! # Output Rendering
//!
//! Pure views of a [`ValidationResponse`]: nothing here inspects the
//! document or mutates the result.

use std::fmt::Write as _;

use veridoc_engine::ValidationResponse;

pub fn to_json(response: &ValidationResponse) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(response)
}

pub fn to_yaml(response: &ValidationResponse) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(response)
}

/// Human-readable console rendering.
pub fn to_text(response: &ValidationResponse) -> String {
    let mut out = String::new();
    let summary = &response.validation_summary;

    let _ = writeln!(
        out,
        "Validation report for {} data.",
        summary.validation_data_type
    );

    for result in &response.schema_results {
        if result.valid {
            let _ = writeln!(out, "  schema {} .. ok", result.schema);
        } else {
            let _ = writeln!(
                out,
                "  schema {} .. failed ({} errors, {} warnings)",
                result.schema,
                result.errors.len(),
                result.warnings.len()
            );
        }
        for error in &result.errors {
            let _ = writeln!(out, "    ERROR   {error}");
        }
        for warning in &result.warnings {
            let _ = writeln!(out, "    WARNING {warning}");
        }
    }

    for pattern in &response.regex_patterns {
        let _ = writeln!(
            out,
            "  pattern {} (checkEnv: {}, strict: {})",
            pattern.name, pattern.check_env, pattern.check_env_strict_mode
        );
        for value in &pattern.data {
            let _ = writeln!(out, "    match   {value}");
        }
        for message in &pattern.messages {
            let _ = writeln!(out, "    INFO    {message}");
        }
        for error in &pattern.errors {
            let _ = writeln!(out, "    ERROR   {error}");
        }
        for env in &pattern.env_values {
            let _ = writeln!(out, "    ENV     {env}");
        }
    }

    for output in &response.path_search_output {
        let _ = writeln!(out, "  path {} ({})", output.path_name, output.path_key);
        if output.results.is_empty() {
            let _ = writeln!(out, "    no results found");
        }
        for item in &output.results {
            let _ = writeln!(out, "    {} = {}", item.full_path, item.raw);
        }
    }

    for extension in &response.extension_results {
        let _ = writeln!(
            out,
            "  extension {} ({} ms)",
            extension.name, extension.execution_time_ms
        );
        if let Some(load_error) = &extension.load_error {
            let _ = writeln!(out, "    LOAD ERROR {load_error}");
            continue;
        }
        for message in &extension.messages {
            let _ = writeln!(out, "    INFO    {message}");
        }
        for warning in &extension.warnings {
            let _ = writeln!(out, "    WARNING {warning}");
        }
        for error in &extension.errors {
            let _ = writeln!(out, "    ERROR   {error}");
        }
    }

    for error in &summary.errors {
        let _ = writeln!(out, "ERROR   {error}");
    }
    for warning in &summary.warnings {
        let _ = writeln!(out, "WARNING {warning}");
    }
    for message in &summary.messages {
        let _ = writeln!(out, "NOTE    {message}");
    }

    if summary.valid {
        let _ = writeln!(out, "Validation successful.");
    } else {
        let _ = writeln!(out, "Validation failed.");
    }

    out
}
