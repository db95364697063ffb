//! # veridoc-schema — Schema Conformance Checking
//!
//! Validates JSON/YAML documents against JSON Schemas referenced by local
//! path or URL, and maps each violation back to a source line.
//!
//! ## Reference Resolution
//!
//! A reference is resolved before anything else: local paths (with or
//! without a `file://` prefix) are existence-checked on disk; `http(s)`
//! URLs are probed with a HEAD request expecting a 200. Both the probe
//! and the later content fetch carry the same bounded timeout (5 s by
//! default). An unresolvable reference fails that schema before any
//! message is produced.
//!
//! ## Line Back-Mapping
//!
//! The document is parsed twice: once into the line-annotated tree and
//! once into a plain JSON object for the evaluator. Each violation's
//! instance path is walked through the tree to find the originating node,
//! whose line prefixes the message; unresolvable paths are prefixed with
//! `Line unknown`.
//!
//! Violations are only translated when the document's detected type is
//! JSON or YAML; for any other detected type they are dropped. This is a
//! known limitation of the translation step, kept as-is.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use veridoc_core::{detect, DataFormat, DocumentTree};

/// Default timeout applied to both the existence probe and the content
/// fetch of remote schema references.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Error during schema conformance checking. Each variant is fatal to the
/// schema being checked, never to sibling schemas.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The reference did not resolve to an existing schema.
    #[error("schema does not exist or is unreachable: {reference}")]
    Unavailable {
        /// The normalized reference that failed to resolve.
        reference: String,
    },

    /// The input document could not be parsed for checking.
    #[error("parse yaml/json into map: {reason}")]
    DocumentParse {
        /// Parser-reported reason.
        reason: String,
    },

    /// The schema content could not be fetched or read as JSON.
    #[error("schema load failed for '{reference}': {reason}")]
    SchemaLoad { reference: String, reason: String },

    /// The evaluator rejected the schema (e.g. a malformed reference).
    #[error("schema evaluation failed for '{reference}': {reason}")]
    Evaluation { reference: String, reason: String },
}

/// Message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single conformance message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaMessage {
    pub severity: Severity,
    pub text: String,
    /// Source line of the violating node, when the back-mapping found one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

const IRRELEVANT_SCHEMA_WARNING: &str =
    "schema appears irrelevant: no overlapping top-level fields between schema and data.";

/// Checks documents against schema references.
///
/// Stateless apart from the fetch timeout; every call builds fresh
/// results. Checking is synchronous; the probe and fetch are the only
/// operations that block on the network.
#[derive(Debug, Clone)]
pub struct SchemaChecker {
    timeout: Duration,
}

impl Default for SchemaChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaChecker {
    /// A checker with the default 5 second fetch timeout.
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_FETCH_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Check the document bytes against one schema reference.
    ///
    /// Returns the conformance messages (errors for violations, plus the
    /// advisory relevance warning), or the error that made this schema
    /// impossible to check.
    pub fn check(&self, reference: &str, data: &[u8]) -> Result<Vec<SchemaMessage>, SchemaError> {
        let source = self.resolve_reference(reference)?;

        let tree = DocumentTree::parse(data).map_err(|err| SchemaError::DocumentParse {
            reason: err.to_string(),
        })?;
        let instance = parse_plain_mapping(data)?;

        let schema_doc = self.fetch_schema(&source)?;

        let mut messages = Vec::new();
        if no_top_level_overlap(&schema_doc, &instance) {
            messages.push(SchemaMessage {
                severity: Severity::Warning,
                text: IRRELEVANT_SCHEMA_WARNING.to_string(),
                line: None,
            });
        }

        let validator =
            jsonschema::validator_for(&schema_doc).map_err(|err| SchemaError::Evaluation {
                reference: source.display(),
                reason: err.to_string(),
            })?;

        let instance = Value::Object(instance);
        let format = detect(data);
        if matches!(format, DataFormat::Json | DataFormat::Yaml) {
            for violation in validator.iter_errors(&instance) {
                let pointer = violation.instance_path.to_string();
                let segments: Vec<&str> =
                    pointer.split('/').filter(|s| !s.is_empty()).collect();
                let field = if segments.is_empty() {
                    "root".to_string()
                } else {
                    segments.join(".")
                };
                let line = tree.node_at_segments(&segments).map(|node| node.line);
                let text = match line {
                    Some(line) => format!("Line {line}: {field}: {violation}"),
                    None => format!("Line unknown: {field}: {violation}"),
                };
                messages.push(SchemaMessage {
                    severity: Severity::Error,
                    text,
                    line,
                });
            }
        }

        Ok(messages)
    }

    /// Resolve a reference to a local path or a probed remote URL.
    fn resolve_reference(&self, reference: &str) -> Result<SchemaSource, SchemaError> {
        if reference.starts_with("http://") || reference.starts_with("https://") {
            let reachable = self
                .http_client()
                .and_then(|client| client.head(reference).send())
                .map(|response| response.status() == reqwest::StatusCode::OK)
                .unwrap_or(false);
            if reachable {
                Ok(SchemaSource::Remote(reference.to_string()))
            } else {
                Err(SchemaError::Unavailable {
                    reference: reference.to_string(),
                })
            }
        } else {
            let path = reference.strip_prefix("file://").unwrap_or(reference);
            if Path::new(path).exists() {
                Ok(SchemaSource::Local(PathBuf::from(path)))
            } else {
                Err(SchemaError::Unavailable {
                    reference: format!("file://{path}"),
                })
            }
        }
    }

    fn fetch_schema(&self, source: &SchemaSource) -> Result<Value, SchemaError> {
        let reference = source.display();
        let bytes = match source {
            SchemaSource::Local(path) => {
                std::fs::read(path).map_err(|err| SchemaError::SchemaLoad {
                    reference: reference.clone(),
                    reason: format!("read schema file: {err}"),
                })?
            }
            SchemaSource::Remote(url) => {
                tracing::debug!(url = %url, "fetching remote schema");
                let response = self
                    .http_client()
                    .and_then(|client| client.get(url).send())
                    .and_then(|response| response.error_for_status())
                    .map_err(|err| SchemaError::SchemaLoad {
                        reference: reference.clone(),
                        reason: format!("fetch schema: {err}"),
                    })?;
                response
                    .bytes()
                    .map_err(|err| SchemaError::SchemaLoad {
                        reference: reference.clone(),
                        reason: format!("read schema response: {err}"),
                    })?
                    .to_vec()
            }
        };

        serde_json::from_slice(&bytes).map_err(|err| SchemaError::SchemaLoad {
            reference,
            reason: format!("parse schema JSON: {err}"),
        })
    }

    fn http_client(&self) -> reqwest::Result<reqwest::blocking::Client> {
        reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
    }
}

#[derive(Debug, Clone)]
enum SchemaSource {
    Local(PathBuf),
    Remote(String),
}

impl SchemaSource {
    fn display(&self) -> String {
        match self {
            SchemaSource::Local(path) => format!("file://{}", path.display()),
            SchemaSource::Remote(url) => url.clone(),
        }
    }
}

/// Parse the document into a plain JSON object for the evaluator.
fn parse_plain_mapping(data: &[u8]) -> Result<serde_json::Map<String, Value>, SchemaError> {
    let yaml: serde_yaml::Value =
        serde_yaml::from_slice(data).map_err(|err| SchemaError::DocumentParse {
            reason: err.to_string(),
        })?;
    let json = yaml_to_json_value(&yaml).map_err(|reason| SchemaError::DocumentParse { reason })?;
    match json {
        Value::Object(map) => Ok(map),
        _ => Err(SchemaError::DocumentParse {
            reason: "document root is not a mapping".to_string(),
        }),
    }
}

/// True when the schema's declared top-level properties share no name
/// with the data's top-level keys. A schema without declared properties
/// counts as non-overlapping.
fn no_top_level_overlap(schema: &Value, data: &serde_json::Map<String, Value>) -> bool {
    match schema.get("properties").and_then(Value::as_object) {
        Some(properties) => !data.keys().any(|key| properties.contains_key(key)),
        None => true,
    }
}

/// Convert a `serde_yaml::Value` to a `serde_json::Value`.
///
/// YAML has a richer type system than JSON (tags, anchors, etc.); the
/// documents checked here use only the JSON-compatible subset.
fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(serde_json::Number::from(i)))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(serde_json::Number::from(u)))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent float {f} in JSON"))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => {
            let items: Result<Vec<Value>, String> = seq.iter().map(yaml_to_json_value).collect();
            Ok(Value::Array(items?))
        }
        serde_yaml::Value::Mapping(map) => {
            let mut json_map = serde_json::Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => return Err(format!("unsupported YAML map key type: {other:?}")),
                };
                json_map.insert(key, yaml_to_json_value(v)?);
            }
            Ok(Value::Object(json_map))
        }
        serde_yaml::Value::Tagged(tagged) => {
            // Ignore YAML tags, just convert the inner value.
            yaml_to_json_value(&tagged.value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PERSON_SCHEMA: &str = r#"{
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "properties": {
            "name": { "type": "string" },
            "age": { "type": "number" }
        },
        "required": ["name", "age"]
    }"#;

    fn schema_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn check(schema: &tempfile::NamedTempFile, data: &str) -> Vec<SchemaMessage> {
        SchemaChecker::new()
            .check(schema.path().to_str().unwrap(), data.as_bytes())
            .unwrap()
    }

    #[test]
    fn conforming_document_yields_no_messages() {
        let schema = schema_file(PERSON_SCHEMA);
        let messages = check(&schema, r#"{"name": "John", "age": 30}"#);
        assert!(messages.is_empty(), "unexpected: {messages:?}");
    }

    #[test]
    fn type_violation_names_the_field_and_line() {
        let schema = schema_file(PERSON_SCHEMA);
        let messages = check(&schema, "name: John\nage: thirty\n");
        assert_eq!(messages.len(), 1);
        let message = &messages[0];
        assert_eq!(message.severity, Severity::Error);
        assert_eq!(message.line, Some(2));
        assert!(message.text.starts_with("Line 2: age:"), "{}", message.text);
        assert!(message.text.contains("number"), "{}", message.text);
    }

    #[test]
    fn missing_required_field_maps_to_the_root() {
        let schema = schema_file(PERSON_SCHEMA);
        let messages = check(&schema, r#"{"name": "John"}"#);
        assert_eq!(messages.len(), 1);
        assert!(messages[0].text.contains("age"), "{}", messages[0].text);
        assert!(messages[0].text.contains("root"), "{}", messages[0].text);
    }

    #[test]
    fn file_scheme_references_resolve() {
        let schema = schema_file(PERSON_SCHEMA);
        let reference = format!("file://{}", schema.path().display());
        let messages = SchemaChecker::new()
            .check(&reference, br#"{"name": "John", "age": 30}"#)
            .unwrap();
        assert!(messages.is_empty());
    }

    #[test]
    fn missing_schema_is_unavailable_before_any_message() {
        let err = SchemaChecker::new()
            .check("/nonexistent/schema.json", br#"{"name": "x"}"#)
            .unwrap_err();
        assert!(matches!(err, SchemaError::Unavailable { .. }), "{err}");
        assert!(err
            .to_string()
            .starts_with("schema does not exist or is unreachable:"));
    }

    #[test]
    fn unrelated_schema_earns_the_advisory_warning() {
        let schema = schema_file(PERSON_SCHEMA);
        let messages = check(&schema, "color: red\nshape: square\n");
        assert!(messages
            .iter()
            .any(|m| m.severity == Severity::Warning && m.text.contains("appears irrelevant")));
    }

    #[test]
    fn non_mapping_document_is_a_parse_error() {
        let schema = schema_file(PERSON_SCHEMA);
        let err = SchemaChecker::new()
            .check(schema.path().to_str().unwrap(), b"- just\n- a\n- list\n")
            .unwrap_err();
        assert!(matches!(err, SchemaError::DocumentParse { .. }), "{err}");
    }

    #[test]
    fn malformed_schema_json_is_a_load_error() {
        let schema = schema_file("{ not json");
        let err = SchemaChecker::new()
            .check(schema.path().to_str().unwrap(), br#"{"a": 1}"#)
            .unwrap_err();
        assert!(matches!(err, SchemaError::SchemaLoad { .. }), "{err}");
    }

    #[test]
    fn nested_violations_map_into_sequences() {
        let schema = schema_file(
            r#"{
                "type": "object",
                "properties": {
                    "employees": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": { "age": { "type": "number" } }
                        }
                    }
                }
            }"#,
        );
        let data = "employees:\n  - age: 30\n  - age: old\n";
        let messages = check(&schema, data);
        assert_eq!(messages.len(), 1);
        assert!(
            messages[0].text.starts_with("Line 3: employees.1.age:"),
            "{}",
            messages[0].text
        );
    }

    #[test]
    fn yaml_to_json_conversion_covers_scalars() {
        let yaml: serde_yaml::Value =
            serde_yaml::from_str("a: 1\nb: true\nc: text\nd: 1.5\ne: null\n").unwrap();
        let json = yaml_to_json_value(&yaml).unwrap();
        assert_eq!(json["a"], 1);
        assert_eq!(json["b"], true);
        assert_eq!(json["c"], "text");
        assert_eq!(json["d"], 1.5);
        assert!(json["e"].is_null());
    }
}
