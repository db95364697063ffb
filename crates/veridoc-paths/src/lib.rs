//! # veridoc-paths — Path-Expression Resolution
//!
//! Evaluates dot-separated path expressions against the document tree.
//! A segment is a bare mapping key, `key[]` (iterate the sequence under
//! `key`, descending into each element), or `key[idx]` (select one
//! element).
//!
//! When a segment does not match directly at the current level, the
//! resolver falls back to a recursive deep search: it descends into every
//! child with the unmatched segment list unchanged (consuming a segment
//! where a mapping key happens to equal it). Expressions are therefore
//! not anchored to a depth — a key name appearing at several depths can
//! yield several unrelated matches. That behavior is kept on purpose;
//! treat ambiguous expressions with care.
//!
//! Each path spec is evaluated independently against an already-parsed
//! tree; an empty match list is a valid result, and resolution itself
//! cannot fail.

use serde::{Deserialize, Serialize};

use veridoc_core::{DocumentTree, Node, NodeValue};

/// A named path expression to evaluate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathSpec {
    /// User-facing label for the expression.
    pub path_name: String,
    /// The dot/bracket expression itself.
    pub path_key: String,
}

/// One value found for a path expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathMatch {
    /// Concrete path to the value, with indices substituted for `[]`.
    pub full_path: String,
    /// The value serialized as pretty-printed JSON.
    pub raw: String,
}

/// All matches for one path spec, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathReport {
    pub path_name: String,
    pub path_key: String,
    pub results: Vec<PathMatch>,
}

/// Evaluate every path spec against the tree.
pub fn resolve_paths(tree: &DocumentTree, specs: &[PathSpec]) -> Vec<PathReport> {
    specs
        .iter()
        .map(|spec| PathReport {
            path_name: spec.path_name.clone(),
            path_key: spec.path_key.clone(),
            results: resolve_key(tree, &spec.path_key),
        })
        .collect()
}

/// Evaluate a single path expression.
pub fn resolve_key(tree: &DocumentTree, path_key: &str) -> Vec<PathMatch> {
    let segments: Vec<&str> = path_key.split('.').collect();
    let mut matches = Vec::new();
    resolve(tree.root(), &segments, "", &mut matches);
    matches
}

fn resolve(node: &Node, segments: &[&str], current: &str, out: &mut Vec<PathMatch>) {
    if segments.is_empty() {
        out.push(PathMatch {
            full_path: current.to_string(),
            raw: serialize_raw(node),
        });
        return;
    }

    let head = segments[0];
    let rest = &segments[1..];

    if let Some(key) = head.strip_suffix("[]") {
        if let Some(items) = sequence_under_key(node, key) {
            for (idx, item) in items.iter().enumerate() {
                let path = format!("{}{}[{}]", prefix(current), key, idx);
                resolve(item, rest, &path, out);
            }
            return;
        }
    } else if head.contains('[') && head.ends_with(']') {
        if let Some((key, idx)) = parse_indexed(head) {
            if let Some(item) = sequence_under_key(node, key).and_then(|items| items.get(idx)) {
                let path = format!("{}{}[{}]", prefix(current), key, idx);
                resolve(item, rest, &path, out);
                return;
            }
        }
    } else if let NodeValue::Mapping(entries) = &node.value {
        if let Some((key, value)) = entries.iter().find(|(k, _)| k.as_str() == head) {
            let path = format!("{}{}", prefix(current), key);
            resolve(value, rest, &path, out);
            return;
        }
    }

    // Deep-search fallback: the unmatched segment list is carried into
    // every child unchanged, except where a mapping key equals the head.
    match &node.value {
        NodeValue::Sequence(items) => {
            for (idx, item) in items.iter().enumerate() {
                let path = format!("{current}[{idx}]");
                resolve(item, segments, &path, out);
            }
        }
        NodeValue::Mapping(entries) => {
            for (key, value) in entries {
                let path = format!("{}{}", prefix(current), key);
                if key.as_str() == head {
                    resolve(value, rest, &path, out);
                } else {
                    resolve(value, segments, &path, out);
                }
            }
        }
        NodeValue::Scalar(_) => {}
    }
}

/// Split `key[idx]` into its parts. Non-numeric and negative indices
/// yield `None`, which sends the segment to the fallback search.
fn parse_indexed(segment: &str) -> Option<(&str, usize)> {
    let body = segment.strip_suffix(']')?;
    let (key, index) = body.split_once('[')?;
    let index = index.parse::<usize>().ok()?;
    Some((key, index))
}

fn sequence_under_key<'a>(node: &'a Node, key: &str) -> Option<&'a [Node]> {
    let NodeValue::Mapping(entries) = &node.value else {
        return None;
    };
    let (_, value) = entries.iter().find(|(k, _)| k.as_str() == key)?;
    match &value.value {
        NodeValue::Sequence(items) => Some(items.as_slice()),
        _ => None,
    }
}

fn prefix(current: &str) -> String {
    if current.is_empty() {
        String::new()
    } else {
        format!("{current}.")
    }
}

fn serialize_raw(node: &Node) -> String {
    let value = node.to_json();
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
}
