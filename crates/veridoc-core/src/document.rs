//! # Document Tree — Line-Annotated Generic Representation
//!
//! Builds an immutable tree of scalar/sequence/mapping nodes from raw
//! JSON or YAML bytes, with every node annotated with its 1-based source
//! line. JSON is handled by the same parser: every JSON document is also
//! a valid YAML document, so one event stream covers both formats.
//!
//! The builder consumes the marked event stream of `yaml-rust`'s parser
//! (the same stream its own `YamlLoader` consumes) instead of a ready-made
//! value type, because the value types of `serde_yaml`/`serde_json` do not
//! carry source positions.

use std::collections::HashMap;

use yaml_rust::parser::{Event, MarkedEventReceiver, Parser};
use yaml_rust::scanner::{Marker, TScalarStyle, TokenType};

use crate::error::ParseError;

/// A typed scalar value, resolved per the YAML core schema.
///
/// Plain scalars resolve to null/bool/int/float where they parse as such;
/// quoted scalars are always strings.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

/// The payload of a tree node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeValue {
    Scalar(Scalar),
    Sequence(Vec<Node>),
    /// Key/value pairs in source order. Lookups return the first match.
    Mapping(Vec<(String, Node)>),
}

/// One node of the document tree, annotated with its source line.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// 1-based line on which the node starts.
    pub line: usize,
    pub value: NodeValue,
}

impl Node {
    /// Convert the subtree rooted at this node into a plain JSON value.
    ///
    /// Mapping keys are sorted by `serde_json`'s object representation;
    /// non-finite floats degrade to `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match &self.value {
            NodeValue::Scalar(Scalar::Null) => serde_json::Value::Null,
            NodeValue::Scalar(Scalar::Bool(b)) => serde_json::Value::Bool(*b),
            NodeValue::Scalar(Scalar::Int(i)) => serde_json::Value::Number((*i).into()),
            NodeValue::Scalar(Scalar::Float(f)) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            NodeValue::Scalar(Scalar::Str(s)) => serde_json::Value::String(s.clone()),
            NodeValue::Sequence(items) => {
                serde_json::Value::Array(items.iter().map(Node::to_json).collect())
            }
            NodeValue::Mapping(entries) => {
                let mut map = serde_json::Map::new();
                for (key, value) in entries {
                    map.insert(key.clone(), value.to_json());
                }
                serde_json::Value::Object(map)
            }
        }
    }

    /// Look up a direct child: mapping nodes by key, sequence nodes by a
    /// numeric index segment. Scalars have no children.
    pub fn child(&self, segment: &str) -> Option<&Node> {
        match &self.value {
            NodeValue::Mapping(entries) => entries
                .iter()
                .find(|(key, _)| key.as_str() == segment)
                .map(|(_, value)| value),
            NodeValue::Sequence(items) => {
                segment.parse::<usize>().ok().and_then(|idx| items.get(idx))
            }
            NodeValue::Scalar(_) => None,
        }
    }
}

/// An immutable parsed document.
///
/// The tree is built once via [`DocumentTree::parse`] and only borrowed
/// afterwards. For multi-document YAML streams the first document wins.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentTree {
    root: Node,
}

impl DocumentTree {
    /// Parse raw JSON or YAML bytes into a line-annotated tree.
    pub fn parse(bytes: &[u8]) -> Result<Self, ParseError> {
        let text = String::from_utf8_lossy(bytes);
        let mut parser = Parser::new(text.chars());
        let mut builder = TreeBuilder::default();
        parser
            .load(&mut builder, true)
            .map_err(|err| ParseError::new(err.to_string()))?;
        if let Some(err) = builder.error {
            return Err(err);
        }
        match builder.root {
            Some(root) => Ok(Self { root }),
            None => Err(ParseError::new("empty document")),
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Walk the tree along path segments (mapping keys and sequence
    /// indices) and return the node the segments lead to, if any.
    pub fn node_at_segments(&self, segments: &[&str]) -> Option<&Node> {
        let mut current = &self.root;
        for segment in segments {
            current = current.child(segment)?;
        }
        Some(current)
    }
}

/// Event receiver assembling nodes bottom-up.
///
/// Anchored nodes are remembered by anchor id so aliases resolve to a
/// clone of the anchored subtree, mirroring `YamlLoader`.
#[derive(Default)]
struct TreeBuilder {
    stack: Vec<Frame>,
    root: Option<Node>,
    anchors: HashMap<usize, Node>,
    error: Option<ParseError>,
}

enum Frame {
    Sequence {
        line: usize,
        anchor: usize,
        items: Vec<Node>,
    },
    Mapping {
        line: usize,
        anchor: usize,
        entries: Vec<(String, Node)>,
        pending_key: Option<String>,
    },
}

impl TreeBuilder {
    fn complete(&mut self, node: Node, anchor: usize) {
        if anchor > 0 {
            self.anchors.insert(anchor, node.clone());
        }
        match self.stack.last_mut() {
            Some(Frame::Sequence { items, .. }) => items.push(node),
            Some(Frame::Mapping {
                entries,
                pending_key,
                ..
            }) => match pending_key.take() {
                Some(key) => entries.push((key, node)),
                None => match key_string(&node) {
                    Ok(key) => *pending_key = Some(key),
                    Err(reason) => self.error = Some(ParseError::new(reason)),
                },
            },
            // Top level: the first completed node is the document root.
            None => {
                if self.root.is_none() {
                    self.root = Some(node);
                }
            }
        }
    }
}

impl MarkedEventReceiver for TreeBuilder {
    fn on_event(&mut self, event: Event, marker: Marker) {
        if self.error.is_some() {
            return;
        }
        match event {
            Event::SequenceStart(anchor) => self.stack.push(Frame::Sequence {
                line: marker.line(),
                anchor,
                items: Vec::new(),
            }),
            Event::MappingStart(anchor) => self.stack.push(Frame::Mapping {
                line: marker.line(),
                anchor,
                entries: Vec::new(),
                pending_key: None,
            }),
            Event::SequenceEnd => {
                if let Some(Frame::Sequence {
                    line,
                    anchor,
                    items,
                }) = self.stack.pop()
                {
                    self.complete(
                        Node {
                            line,
                            value: NodeValue::Sequence(items),
                        },
                        anchor,
                    );
                }
            }
            Event::MappingEnd => {
                if let Some(Frame::Mapping {
                    line,
                    anchor,
                    entries,
                    ..
                }) = self.stack.pop()
                {
                    self.complete(
                        Node {
                            line,
                            value: NodeValue::Mapping(entries),
                        },
                        anchor,
                    );
                }
            }
            Event::Scalar(value, style, anchor, tag) => {
                let scalar = resolve_scalar(value, style, tag.as_ref());
                self.complete(
                    Node {
                        line: marker.line(),
                        value: NodeValue::Scalar(scalar),
                    },
                    anchor,
                );
            }
            Event::Alias(anchor) => match self.anchors.get(&anchor) {
                Some(node) => {
                    let node = node.clone();
                    self.complete(node, 0);
                }
                None => self.error = Some(ParseError::new("unresolved alias")),
            },
            Event::Nothing
            | Event::StreamStart
            | Event::StreamEnd
            | Event::DocumentStart
            | Event::DocumentEnd => {}
        }
    }
}

/// Resolve a scalar event to a typed value.
///
/// Quoted and block scalars are strings; plain scalars resolve through
/// the core schema; explicit `!!` tags force their type where the text
/// parses, degrading to a string otherwise.
fn resolve_scalar(value: String, style: TScalarStyle, tag: Option<&TokenType>) -> Scalar {
    if style != TScalarStyle::Plain {
        return Scalar::Str(value);
    }
    if let Some(TokenType::Tag(handle, suffix)) = tag {
        if handle == "!!" {
            return match suffix.as_str() {
                "null" => Scalar::Null,
                "bool" => value
                    .parse::<bool>()
                    .map(Scalar::Bool)
                    .unwrap_or(Scalar::Str(value)),
                "int" => value
                    .parse::<i64>()
                    .map(Scalar::Int)
                    .unwrap_or(Scalar::Str(value)),
                "float" => value
                    .parse::<f64>()
                    .map(Scalar::Float)
                    .unwrap_or(Scalar::Str(value)),
                _ => Scalar::Str(value),
            };
        }
        return Scalar::Str(value);
    }
    resolve_plain(value)
}

fn resolve_plain(value: String) -> Scalar {
    match value.as_str() {
        "" | "~" | "null" | "Null" | "NULL" => return Scalar::Null,
        "true" | "True" | "TRUE" => return Scalar::Bool(true),
        "false" | "False" | "FALSE" => return Scalar::Bool(false),
        _ => {}
    }
    if let Ok(int) = value.parse::<i64>() {
        return Scalar::Int(int);
    }
    if let Ok(float) = value.parse::<f64>() {
        return Scalar::Float(float);
    }
    Scalar::Str(value)
}

/// Mapping keys must be scalars; they are stored in string form.
fn key_string(node: &Node) -> Result<String, String> {
    match &node.value {
        NodeValue::Scalar(Scalar::Str(s)) => Ok(s.clone()),
        NodeValue::Scalar(Scalar::Int(i)) => Ok(i.to_string()),
        NodeValue::Scalar(Scalar::Float(f)) => Ok(f.to_string()),
        NodeValue::Scalar(Scalar::Bool(b)) => Ok(b.to_string()),
        NodeValue::Scalar(Scalar::Null) => Ok("null".to_string()),
        NodeValue::Sequence(_) | NodeValue::Mapping(_) => {
            Err(format!("unsupported mapping key on line {}", node.line))
        }
    }
}
