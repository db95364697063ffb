//! # Data-Format Detection
//!
//! Classifies raw bytes as JSON, YAML, or unknown. The JSON gate runs
//! first: anything `serde_json` accepts in full is JSON. What remains is
//! YAML only when it parses to a root mapping or sequence written in
//! block style; flow-style roots (`{...}`/`[...]` that failed the JSON
//! gate) and bare scalars are deliberately unknown.

use serde::{Deserialize, Serialize};

use crate::document::{DocumentTree, NodeValue};

/// The detected format of an input document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataFormat {
    Json,
    Yaml,
    Unknown,
}

impl DataFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataFormat::Json => "json",
            DataFormat::Yaml => "yaml",
            DataFormat::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for DataFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detect the format of the given bytes.
pub fn detect(bytes: &[u8]) -> DataFormat {
    let text = String::from_utf8_lossy(bytes);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return DataFormat::Unknown;
    }

    if serde_json::from_str::<serde_json::Value>(trimmed).is_ok() {
        return DataFormat::Json;
    }

    let tree = match DocumentTree::parse(trimmed.as_bytes()) {
        Ok(tree) => tree,
        Err(_) => return DataFormat::Unknown,
    };

    match tree.root().value {
        NodeValue::Mapping(_) | NodeValue::Sequence(_) => {
            // A flow-style root that survived to this point is YAML-only
            // syntax wearing JSON clothes; it still starts with `{`/`[`.
            if trimmed.starts_with('{') || trimmed.starts_with('[') {
                DataFormat::Unknown
            } else {
                DataFormat::Yaml
            }
        }
        NodeValue::Scalar(_) => DataFormat::Unknown,
    }
}

/// True when the bytes are neither JSON nor YAML.
pub fn is_unknown(bytes: &[u8]) -> bool {
    detect(bytes) == DataFormat::Unknown
}
