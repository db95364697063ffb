//! # The Validation Pass
//!
//! One engine call runs the fixed sequence: whitespace audit, pattern
//! rules, path resolution, schema checks, extensions. No step short-
//! circuits another; the summary verdict is computed at the end from
//! what each step recorded.

use veridoc_core::{format, whitespace, DocumentTree, EnvLookup, ProcessEnv};
use veridoc_paths::resolve_paths;
use veridoc_rules::scan;
use veridoc_schema::{SchemaChecker, Severity};

use crate::extension::ExtensionRegistry;
use crate::types::{
    SchemaOutcome, ValidationRequest, ValidationResponse, ValidationSummary,
};

const STRICT_ENV_FAILURE: &str = "Environment variable(s) not set. Strict mode is true.";
const NO_SCHEMAS_PROVIDED: &str = "No schema(s) provided.";

/// Runs validation passes.
///
/// The engine owns its collaborators: the schema checker, the
/// environment lookup for pattern rules, and the extension registry.
/// Calls are sequential and share no mutable state, so one engine can be
/// reused across calls and threads.
pub struct Engine {
    checker: SchemaChecker,
    env: Box<dyn EnvLookup>,
    registry: ExtensionRegistry,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// An engine with the process environment, the default schema fetch
    /// timeout, and the built-in extensions.
    pub fn new() -> Self {
        Self {
            checker: SchemaChecker::new(),
            env: Box::new(ProcessEnv),
            registry: ExtensionRegistry::builtin(),
        }
    }

    /// An engine with explicit collaborators.
    pub fn with_parts(
        checker: SchemaChecker,
        env: Box<dyn EnvLookup>,
        registry: ExtensionRegistry,
    ) -> Self {
        Self {
            checker,
            env,
            registry,
        }
    }

    /// Run the full validation pass over one request.
    pub fn validate(&self, request: &ValidationRequest) -> ValidationResponse {
        let data = request.data.as_bytes();
        let mut summary = ValidationSummary::default();
        let mut has_error = false;
        let mut whitespace_failed = false;

        tracing::debug!(
            schemas = request.schemas.len(),
            rules = request.regex_pattern_rules.len(),
            paths = request.search_paths.len(),
            "validation started"
        );

        if request.check_trailing_whitespace.unwrap_or(true) {
            let report = whitespace::audit(data);
            whitespace_failed = !report.errors.is_empty();
            summary.errors.extend(report.errors);
            summary.warnings.extend(report.warnings);
            summary.messages.extend(report.messages);
        }

        let mut regex_patterns = Vec::new();
        if !request.regex_pattern_rules.is_empty() {
            let (reports, strict_failure) =
                scan(&request.regex_pattern_rules, data, self.env.as_ref());
            regex_patterns = reports;
            if strict_failure {
                summary.errors.push(STRICT_ENV_FAILURE.to_string());
                has_error = true;
            }
        }

        let mut path_search_output = Vec::new();
        if !request.search_paths.is_empty() {
            match DocumentTree::parse(data) {
                Ok(tree) => {
                    path_search_output = resolve_paths(&tree, &request.search_paths);
                }
                Err(err) => {
                    has_error = true;
                    summary
                        .messages
                        .push(format!("parse yaml/json into node: {err}"));
                }
            }
        }

        let mut schema_results = Vec::with_capacity(request.schemas.len());
        if request.schemas.is_empty() {
            summary.messages.push(NO_SCHEMAS_PROVIDED.to_string());
        } else {
            for reference in &request.schemas {
                match self.checker.check(reference, data) {
                    Err(err) => {
                        has_error = true;
                        schema_results.push(SchemaOutcome {
                            schema: reference.clone(),
                            valid: false,
                            errors: vec![err.to_string()],
                            warnings: Vec::new(),
                        });
                    }
                    Ok(messages) => {
                        let mut errors = Vec::new();
                        let mut warnings = Vec::new();
                        for message in messages {
                            match message.severity {
                                Severity::Error => errors.push(message.text),
                                Severity::Warning => warnings.push(message.text),
                            }
                        }
                        let valid = errors.is_empty();
                        if !valid {
                            has_error = true;
                        }
                        schema_results.push(SchemaOutcome {
                            schema: reference.clone(),
                            valid,
                            errors,
                            warnings,
                        });
                    }
                }
            }
        }

        let extension_results = self.registry.run_spec(&request.extensions, data);

        summary.valid = !has_error && !whitespace_failed;
        summary.validation_data_type = format::detect(data).as_str().to_uppercase();

        tracing::debug!(valid = summary.valid, "validation finished");

        ValidationResponse {
            validation_summary: summary,
            schema_results,
            regex_patterns,
            path_search_output,
            extension_results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Arc;

    use veridoc_core::FixedEnv;
    use veridoc_paths::PathSpec;
    use veridoc_rules::{EnvCheck, PatternRule};

    use crate::extension::{Extension, ExtensionOutcome};

    fn engine() -> Engine {
        Engine::with_parts(
            SchemaChecker::new(),
            Box::new(FixedEnv::new().set("PRESENT", "yes")),
            ExtensionRegistry::builtin(),
        )
    }

    fn request(data: &str) -> ValidationRequest {
        ValidationRequest {
            data: data.to_string(),
            ..ValidationRequest::default()
        }
    }

    fn person_schema_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"{
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "age": { "type": "number" }
                },
                "required": ["name", "age"]
            }"#,
        )
        .unwrap();
        file
    }

    #[test]
    fn conforming_document_is_valid_end_to_end() {
        let schema = person_schema_file();
        let mut req = request(r#"{"name":"John","age":30}"#);
        req.schemas = vec![schema.path().display().to_string()];

        let response = engine().validate(&req);
        let summary = &response.validation_summary;
        assert!(summary.valid, "summary: {summary:?}");
        assert_eq!(summary.validation_data_type, "JSON");
        assert!(summary.errors.is_empty());
        assert_eq!(response.schema_results.len(), 1);
        assert!(response.schema_results[0].valid);
        assert!(response.schema_results[0].errors.is_empty());
    }

    #[test]
    fn tab_indentation_fails_the_call() {
        let response = engine().validate(&request("\tname: John\n"));
        let summary = &response.validation_summary;
        assert!(!summary.valid);
        assert!(summary
            .errors
            .iter()
            .any(|e| e.contains("Tab character found")));
    }

    #[test]
    fn whitespace_audit_can_be_disabled() {
        let mut req = request("\tname: John\n");
        req.check_trailing_whitespace = Some(false);
        let response = engine().validate(&req);
        assert!(response.validation_summary.valid);
        assert!(response.validation_summary.errors.is_empty());
    }

    #[test]
    fn no_schemas_is_informational_not_fatal() {
        let response = engine().validate(&request("name: John\n"));
        let summary = &response.validation_summary;
        assert!(summary.valid);
        assert!(summary.messages.iter().any(|m| m == NO_SCHEMAS_PROVIDED));
        assert_eq!(summary.validation_data_type, "YAML");
    }

    #[test]
    fn strict_env_failure_fails_the_call_but_other_checks_still_run() {
        let mut req = request("url: ${MISSING_ONE}\npath: ok\n");
        req.regex_pattern_rules = vec![PatternRule {
            name: "env".to_string(),
            regex: r"\$\{(\w+)\}".to_string(),
            check_env: Some(EnvCheck {
                enabled: true,
                strict: true,
            }),
        }];
        req.search_paths = vec![PathSpec {
            path_name: "Path".to_string(),
            path_key: "path".to_string(),
        }];

        let response = engine().validate(&req);
        assert!(!response.validation_summary.valid);
        assert!(response
            .validation_summary
            .errors
            .iter()
            .any(|e| e == STRICT_ENV_FAILURE));
        // Sibling checks were not suppressed.
        assert_eq!(response.path_search_output.len(), 1);
        assert_eq!(response.path_search_output[0].results[0].raw, "\"ok\"");
        assert_eq!(response.regex_patterns.len(), 1);
    }

    #[test]
    fn present_variable_in_strict_mode_passes() {
        let mut req = request("url: ${PRESENT}\n");
        req.regex_pattern_rules = vec![PatternRule {
            name: "env".to_string(),
            regex: r"\$\{(\w+)\}".to_string(),
            check_env: Some(EnvCheck {
                enabled: true,
                strict: true,
            }),
        }];
        let response = engine().validate(&req);
        assert!(response.validation_summary.valid);
        assert_eq!(response.regex_patterns[0].env_values, vec!["PRESENT=yes"]);
    }

    #[test]
    fn unparsable_data_downgrades_path_resolution_to_a_message() {
        let mut req = request("a: [unclosed\n");
        req.search_paths = vec![PathSpec {
            path_name: "A".to_string(),
            path_key: "a".to_string(),
        }];
        let response = engine().validate(&req);
        assert!(!response.validation_summary.valid);
        assert!(response
            .validation_summary
            .messages
            .iter()
            .any(|m| m.starts_with("parse yaml/json into node:")));
        assert!(response.path_search_output.is_empty());
        // The pass still completed and recorded the detected type.
        assert_eq!(response.validation_summary.validation_data_type, "UNKNOWN");
    }

    #[test]
    fn unreachable_schema_fails_only_that_schema() {
        let schema = person_schema_file();
        let mut req = request(r#"{"name":"John","age":30}"#);
        req.schemas = vec![
            "/nonexistent/schema.json".to_string(),
            schema.path().display().to_string(),
        ];

        let response = engine().validate(&req);
        assert!(!response.validation_summary.valid);
        assert_eq!(response.schema_results.len(), 2);
        assert!(!response.schema_results[0].valid);
        assert!(response.schema_results[0].errors[0]
            .starts_with("schema does not exist or is unreachable:"));
        assert!(response.schema_results[1].valid);
    }

    #[test]
    fn schema_violations_split_into_errors_with_lines() {
        let schema = person_schema_file();
        let mut req = request("name: John\nage: thirty\n");
        req.schemas = vec![schema.path().display().to_string()];

        let response = engine().validate(&req);
        assert!(!response.validation_summary.valid);
        let outcome = &response.schema_results[0];
        assert!(!outcome.valid);
        assert!(outcome.errors.iter().any(|e| e.starts_with("Line 2: age:")));
    }

    #[test]
    fn extensions_run_last_and_record_results() {
        struct Tail;
        impl Extension for Tail {
            fn name(&self) -> &str {
                "tail"
            }
            fn run(&self, data: &[u8]) -> ExtensionOutcome {
                ExtensionOutcome {
                    warnings: vec![format!("saw {} bytes", data.len())],
                    ..ExtensionOutcome::default()
                }
            }
        }
        let mut registry = ExtensionRegistry::builtin();
        registry.register(Arc::new(Tail));
        let engine = Engine::with_parts(SchemaChecker::new(), Box::new(FixedEnv::new()), registry);

        let mut req = request("a: 1\n");
        req.extensions = "doc-stats,tail,missing".to_string();
        let response = engine.validate(&req);

        assert_eq!(response.extension_results.len(), 3);
        assert_eq!(response.extension_results[0].name, "doc-stats");
        assert_eq!(response.extension_results[1].warnings, vec!["saw 5 bytes"]);
        assert!(response.extension_results[2].load_error.is_some());
        // Extension failures never touch the summary verdict.
        assert!(response.validation_summary.valid);
    }
}
