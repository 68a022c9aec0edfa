// src/types/mod.rs

//! Dynamically typed values exposed to check expressions.
//!
//! A [`TypedValue`] is built fresh from a tree [`Node`] (or a default
//! literal) against a type descriptor. Every variant has a fixed method
//! table, see [`methods`]. Named object types come from the specification's
//! `object` declarations through a [`TypeRegistry`].
//!
//! Typing is strict: a node's intrinsic tag must equal the requested
//! primitive, and ints are never widened to floats.

pub mod methods;
pub mod object;

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::spec::{ObjectDef, Specification};
use crate::tree::{Node, NodeKind, NodeValue};

pub use methods::{MethodInfo, methods_for};
pub use object::CustomObject;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TypeError {
    #[error("expected {expected}, found {found}")]
    Mismatch { expected: String, found: String },

    #[error("unknown type {0}")]
    UnknownType(String),

    #[error("missing required property {0}")]
    MissingProperty(String),

    #[error("property {property}: {source}")]
    Property {
        property: String,
        source: Box<TypeError>,
    },

    #[error("element {index}: {source}")]
    Element { index: usize, source: Box<TypeError> },

    #[error("type {type_name} has no method {method}")]
    UnknownMethod { type_name: String, method: String },

    #[error("{method} expects {expected} argument(s), got {found}")]
    Arity {
        method: String,
        expected: String,
        found: usize,
    },

    #[error("argument {index} to {method} must be {expected}, found {found}")]
    Argument {
        method: String,
        index: usize,
        expected: String,
        found: String,
    },

    #[error("{type_name} does not have field {field}")]
    NoSuchField { type_name: String, field: String },

    #[error("index {index} out of bounds for list of length {len}")]
    IndexOutOfBounds { index: i64, len: usize },

    #[error("cannot compare {left} with {right}")]
    Incomparable { left: String, right: String },

    #[error("invalid value {value:?} for type {target}")]
    InvalidConversion { value: String, target: String },

    #[error("invalid regular expression {pattern:?}: {message}")]
    InvalidRegex { pattern: String, message: String },

    /// A conversion the front end guarantees failed anyway.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TypeError {
    /// Whether this error reports a defect rather than a user mistake.
    pub fn is_internal(&self) -> bool {
        match self {
            TypeError::Internal(_) => true,
            TypeError::Property { source, .. } | TypeError::Element { source, .. } => {
                source.is_internal()
            }
            _ => false,
        }
    }
}

/// Parsed form of a normalized type descriptor (`int`, `list:string`,
/// `Server`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    Bool,
    Int,
    Float,
    String,
    /// Whatever the node's intrinsic type is. Used for references to data
    /// that no specification types.
    Any,
    List(Box<TypeDescriptor>),
    Object(String),
}

impl TypeDescriptor {
    pub fn parse(descriptor: &str) -> Result<Self, TypeError> {
        if let Some(inner) = descriptor.strip_prefix("list:") {
            return Ok(TypeDescriptor::List(Box::new(Self::parse(inner)?)));
        }
        match descriptor {
            "bool" => Ok(TypeDescriptor::Bool),
            "int" => Ok(TypeDescriptor::Int),
            "float" => Ok(TypeDescriptor::Float),
            "string" => Ok(TypeDescriptor::String),
            "any" => Ok(TypeDescriptor::Any),
            name if is_object_name(name) => Ok(TypeDescriptor::Object(name.to_string())),
            other => Err(TypeError::UnknownType(other.to_string())),
        }
    }

    /// Descriptor matching a node's intrinsic tag, where one exists.
    pub fn of_kind(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Bool => TypeDescriptor::Bool,
            NodeKind::Int => TypeDescriptor::Int,
            NodeKind::Float => TypeDescriptor::Float,
            NodeKind::String => TypeDescriptor::String,
            NodeKind::Null | NodeKind::Array | NodeKind::Object => TypeDescriptor::Any,
        }
    }

    /// Direct tag equality between a node and a primitive descriptor.
    pub fn accepts_kind(&self, kind: NodeKind) -> bool {
        matches!(
            (self, kind),
            (TypeDescriptor::Bool, NodeKind::Bool)
                | (TypeDescriptor::Int, NodeKind::Int)
                | (TypeDescriptor::Float, NodeKind::Float)
                | (TypeDescriptor::String, NodeKind::String)
        )
    }
}

/// Names taken by built-in descriptors; an `object` cannot use them.
pub const BUILTIN_TYPE_NAMES: &[&str] = &["bool", "int", "float", "string", "any", "list"];

pub fn is_builtin_type_name(name: &str) -> bool {
    BUILTIN_TYPE_NAMES.contains(&name)
}

fn is_object_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Bool => f.write_str("bool"),
            TypeDescriptor::Int => f.write_str("int"),
            TypeDescriptor::Float => f.write_str("float"),
            TypeDescriptor::String => f.write_str("string"),
            TypeDescriptor::Any => f.write_str("any"),
            TypeDescriptor::List(inner) => write!(f, "list:{inner}"),
            TypeDescriptor::Object(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedList {
    pub element: TypeDescriptor,
    pub items: Vec<TypedValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(TypedList),
    Object(CustomObject),
}

impl TypedValue {
    /// Declared type name: `int`, `list:string`, an object type name, ...
    pub fn type_name(&self) -> String {
        match self {
            TypedValue::Null => "null".to_string(),
            TypedValue::Bool(_) => "bool".to_string(),
            TypedValue::Int(_) => "int".to_string(),
            TypedValue::Float(_) => "float".to_string(),
            TypedValue::String(_) => "string".to_string(),
            TypedValue::List(list) => format!("list:{}", list.element),
            TypedValue::Object(obj) => obj.type_name.clone(),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TypedValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Strict equality. `null` compares against anything; other variants
    /// must match exactly.
    pub fn equals(&self, other: &TypedValue) -> Result<bool, TypeError> {
        match (self, other) {
            (TypedValue::Null, TypedValue::Null) => Ok(true),
            (TypedValue::Null, _) | (_, TypedValue::Null) => Ok(false),
            (TypedValue::Bool(a), TypedValue::Bool(b)) => Ok(a == b),
            (TypedValue::Int(a), TypedValue::Int(b)) => Ok(a == b),
            (TypedValue::Float(a), TypedValue::Float(b)) => Ok(a == b),
            (TypedValue::String(a), TypedValue::String(b)) => Ok(a == b),
            (TypedValue::List(a), TypedValue::List(b)) if a.element == b.element => Ok(a == b),
            (TypedValue::Object(a), TypedValue::Object(b)) if a.type_name == b.type_name => {
                Ok(a == b)
            }
            _ => Err(self.incomparable(other)),
        }
    }

    /// Ordering for `<`, `<=`, `>`, `>=`: int/int, float/float and
    /// string/string only.
    pub fn ordering(&self, other: &TypedValue) -> Result<Ordering, TypeError> {
        match (self, other) {
            (TypedValue::Int(a), TypedValue::Int(b)) => Ok(a.cmp(b)),
            (TypedValue::Float(a), TypedValue::Float(b)) => {
                a.partial_cmp(b).ok_or_else(|| self.incomparable(other))
            }
            (TypedValue::String(a), TypedValue::String(b)) => Ok(a.cmp(b)),
            _ => Err(self.incomparable(other)),
        }
    }

    fn incomparable(&self, other: &TypedValue) -> TypeError {
        TypeError::Incomparable {
            left: self.type_name(),
            right: other.type_name(),
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Null => f.write_str("null"),
            TypedValue::Bool(b) => write!(f, "{b}"),
            TypedValue::Int(i) => write!(f, "{i}"),
            TypedValue::Float(x) => write!(f, "{x}"),
            TypedValue::String(s) => write!(f, "{s:?}"),
            TypedValue::List(list) => {
                f.write_str("[")?;
                for (idx, item) in list.items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            TypedValue::Object(obj) => write!(f, "{obj}"),
        }
    }
}

/// Named object types available to [`make_type`].
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    objects: BTreeMap<String, ObjectDef>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_spec(spec: &Specification) -> Self {
        let mut registry = Self::new();
        for def in &spec.objects {
            registry.register(def.clone());
        }
        registry
    }

    pub fn register(&mut self, def: ObjectDef) {
        self.objects.insert(def.name.clone(), def);
    }

    pub fn object(&self, name: &str) -> Option<&ObjectDef> {
        self.objects.get(name)
    }
}

/// Build a typed value from a node against a normalized descriptor.
pub fn make_type(
    registry: &TypeRegistry,
    descriptor: &str,
    node: &Node,
) -> Result<TypedValue, TypeError> {
    let descriptor = TypeDescriptor::parse(descriptor)?;
    make_typed(registry, &descriptor, node)
}

pub fn make_typed(
    registry: &TypeRegistry,
    descriptor: &TypeDescriptor,
    node: &Node,
) -> Result<TypedValue, TypeError> {
    match (descriptor, &node.value) {
        (TypeDescriptor::Any, _) => Ok(infer(node)),
        (TypeDescriptor::Bool, NodeValue::Bool(b)) => Ok(TypedValue::Bool(*b)),
        (TypeDescriptor::Int, NodeValue::Int(i)) => Ok(TypedValue::Int(*i)),
        (TypeDescriptor::Float, NodeValue::Float(x)) => Ok(TypedValue::Float(*x)),
        (TypeDescriptor::String, NodeValue::String(s)) => Ok(TypedValue::String(s.clone())),
        (TypeDescriptor::List(element), NodeValue::Array(items)) => {
            let items = items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    make_typed(registry, element, item).map_err(|e| TypeError::Element {
                        index,
                        source: Box::new(e),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(TypedValue::List(TypedList {
                element: (**element).clone(),
                items,
            }))
        }
        (TypeDescriptor::Object(name), value) => {
            let def = registry
                .object(name)
                .ok_or_else(|| TypeError::UnknownType(name.clone()))?;
            match value {
                NodeValue::Object(map) => object::custom_object(registry, def, map),
                _ => Err(mismatch(descriptor, node)),
            }
        }
        _ => Err(mismatch(descriptor, node)),
    }
}

fn mismatch(descriptor: &TypeDescriptor, node: &Node) -> TypeError {
    TypeError::Mismatch {
        expected: descriptor.to_string(),
        found: node.kind().to_string(),
    }
}

/// Type a node by its intrinsic tag alone.
pub fn infer(node: &Node) -> TypedValue {
    match &node.value {
        NodeValue::Null => TypedValue::Null,
        NodeValue::Bool(b) => TypedValue::Bool(*b),
        NodeValue::Int(i) => TypedValue::Int(*i),
        NodeValue::Float(x) => TypedValue::Float(*x),
        NodeValue::String(s) => TypedValue::String(s.clone()),
        NodeValue::Array(items) => {
            let mut kinds = items.iter().map(Node::kind);
            let element = match kinds.next() {
                Some(first) if kinds.all(|k| k == first) => TypeDescriptor::of_kind(first),
                _ => TypeDescriptor::Any,
            };
            TypedValue::List(TypedList {
                element,
                items: items.iter().map(infer).collect(),
            })
        }
        NodeValue::Object(map) => TypedValue::Object(CustomObject {
            type_name: "object".to_string(),
            fields: map.iter().map(|(k, v)| (k.clone(), infer(v))).collect(),
        }),
    }
}

/// Convert a normalized default literal to a typed value.
pub fn make_default(descriptor: &str, text: &str) -> Result<TypedValue, TypeError> {
    let descriptor = TypeDescriptor::parse(descriptor)?;
    let invalid = || TypeError::InvalidConversion {
        value: text.to_string(),
        target: descriptor.to_string(),
    };
    let numeric = text.replace('_', "");

    match &descriptor {
        TypeDescriptor::Bool => text.parse::<bool>().map(TypedValue::Bool).map_err(|_| invalid()),
        TypeDescriptor::Int => numeric.parse::<i64>().map(TypedValue::Int).map_err(|_| invalid()),
        TypeDescriptor::Float => numeric
            .parse::<f64>()
            .map(TypedValue::Float)
            .map_err(|_| invalid()),
        TypeDescriptor::String => Ok(TypedValue::String(text.to_string())),
        TypeDescriptor::Any => Ok(infer_literal(text)),
        TypeDescriptor::List(_) | TypeDescriptor::Object(_) => Err(invalid()),
    }
}

fn infer_literal(text: &str) -> TypedValue {
    if let Ok(b) = text.parse::<bool>() {
        return TypedValue::Bool(b);
    }
    let numeric = text.replace('_', "");
    if let Ok(i) = numeric.parse::<i64>() {
        return TypedValue::Int(i);
    }
    if let Ok(x) = numeric.parse::<f64>() {
        return TypedValue::Float(x);
    }
    TypedValue::String(text.to_string())
}
