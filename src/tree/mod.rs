// src/tree/mod.rs

//! Located value tree: the format-agnostic form of a parsed configuration
//! file.
//!
//! Front ends (see [`crate::parsers`]) produce it; everything else only reads
//! it. Each node is owned by its parent container and carries two spans:
//! where its key appears (`name_location`) and where its value appears
//! (`value_location`).

use std::collections::BTreeMap;
use std::fmt;

use crate::diagnostics::Span;

/// Intrinsic tag of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Null,
    Bool,
    Int,
    Float,
    String,
    Array,
    Object,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Null => "null",
            NodeKind::Bool => "bool",
            NodeKind::Int => "int",
            NodeKind::Float => "float",
            NodeKind::String => "string",
            NodeKind::Array => "array",
            NodeKind::Object => "object",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<Node>),
    Object(BTreeMap<String, Node>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub value: NodeValue,
    pub name_location: Span,
    pub value_location: Span,
}

impl Node {
    pub fn new(value: NodeValue) -> Self {
        Self {
            value,
            name_location: Span::zero(),
            value_location: Span::zero(),
        }
    }

    pub fn with_locations(value: NodeValue, name_location: Span, value_location: Span) -> Self {
        Self {
            value,
            name_location,
            value_location,
        }
    }

    /// Empty object, the shape of a freshly parsed document root.
    pub fn empty_object() -> Self {
        Self::new(NodeValue::Object(BTreeMap::new()))
    }

    pub fn kind(&self) -> NodeKind {
        match &self.value {
            NodeValue::Null => NodeKind::Null,
            NodeValue::Bool(_) => NodeKind::Bool,
            NodeValue::Int(_) => NodeKind::Int,
            NodeValue::Float(_) => NodeKind::Float,
            NodeValue::String(_) => NodeKind::String,
            NodeValue::Array(_) => NodeKind::Array,
            NodeValue::Object(_) => NodeKind::Object,
        }
    }

    /// Direct child of an object node, or element of an array node when
    /// `segment` is a decimal index.
    pub fn child(&self, segment: &str) -> Option<&Node> {
        match &self.value {
            NodeValue::Object(map) => map.get(segment),
            NodeValue::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    }

    /// Resolve a dotted path (`server.ports.0`). The empty path is `self`.
    pub fn lookup(&self, path: &str) -> Option<&Node> {
        if path.is_empty() {
            return Some(self);
        }
        self.lookup_segments(path.split('.'))
    }

    pub fn lookup_segments<'s, I>(&self, segments: I) -> Option<&Node>
    where
        I: IntoIterator<Item = &'s str>,
    {
        let mut current = self;
        for segment in segments {
            current = current.child(segment)?;
        }
        Some(current)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            NodeValue::Null => f.write_str("null"),
            NodeValue::Bool(b) => write!(f, "{b}"),
            NodeValue::Int(i) => write!(f, "{i}"),
            NodeValue::Float(x) => write!(f, "{x}"),
            NodeValue::String(s) => write!(f, "{s:?}"),
            NodeValue::Array(items) => {
                f.write_str("[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            NodeValue::Object(map) => {
                f.write_str("{")?;
                for (idx, (key, item)) in map.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key} = {item}")?;
                }
                f.write_str("}")
            }
        }
    }
}
