//! # Request/Response Contract
//!
//! Serde-derived types shared by the CLI and the HTTP API. Wire names
//! are camelCase.

use serde::{Deserialize, Serialize};

use veridoc_paths::{PathReport, PathSpec};
use veridoc_rules::{PatternReport, PatternRule};

/// One validation request: the document plus everything to check it with.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidationRequest {
    /// Schema references: local paths or URLs.
    pub schemas: Vec<String>,
    /// The document to validate, as text.
    pub data: String,
    /// Whitespace audit toggle; on when absent.
    pub check_trailing_whitespace: Option<bool>,
    pub regex_pattern_rules: Vec<PatternRule>,
    pub search_paths: Vec<PathSpec>,
    /// Extension selection: comma- or newline-separated registered names.
    pub extensions: String,
}

/// Outcome of checking the document against one schema reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaOutcome {
    pub schema: String,
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// The aggregate verdict for one validation call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    /// Detected data type, uppercased: `JSON`, `YAML`, or `UNKNOWN`.
    pub validation_data_type: String,
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<String>,
}

/// Result of running one extension.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionResult {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    /// Populated when the extension could not be selected; execution was
    /// skipped in that case.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_error: Option<String>,
    /// Wall-clock execution time in milliseconds.
    pub execution_time_ms: u64,
}

/// Everything one validation call produced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResponse {
    pub validation_summary: ValidationSummary,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schema_results: Vec<SchemaOutcome>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub regex_patterns: Vec<PatternReport>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path_search_output: Vec<PathReport>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension_results: Vec<ExtensionResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_are_camel_case() {
        let response = ValidationResponse {
            validation_summary: ValidationSummary {
                validation_data_type: "JSON".to_string(),
                valid: true,
                ..ValidationSummary::default()
            },
            ..ValidationResponse::default()
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"validationSummary\""), "{json}");
        assert!(json.contains("\"validationDataType\""), "{json}");
        // Empty sections are omitted.
        assert!(!json.contains("schemaResults"), "{json}");
    }

    #[test]
    fn request_fields_default_when_absent() {
        let request: ValidationRequest =
            serde_json::from_str(r#"{"data": "a: 1"}"#).unwrap();
        assert_eq!(request.data, "a: 1");
        assert!(request.schemas.is_empty());
        assert!(request.check_trailing_whitespace.is_none());
        assert!(request.extensions.is_empty());
    }
}
