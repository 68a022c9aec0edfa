#![allow(dead_code)]

use std::collections::BTreeMap;

use specmate::diagnostics::Span;
use specmate::spec::{ObjectDef, ObjectProperty};
use specmate::tree::{Node, NodeValue};
use specmate::types::TypeRegistry;

/// Shorthands for building located value trees without a front end.
pub mod node {
    use super::*;

    pub fn null() -> Node {
        Node::new(NodeValue::Null)
    }

    pub fn bool(b: bool) -> Node {
        Node::new(NodeValue::Bool(b))
    }

    pub fn int(i: i64) -> Node {
        Node::new(NodeValue::Int(i))
    }

    pub fn float(x: f64) -> Node {
        Node::new(NodeValue::Float(x))
    }

    pub fn string(s: &str) -> Node {
        Node::new(NodeValue::String(s.to_string()))
    }

    pub fn array(items: impl IntoIterator<Item = Node>) -> Node {
        Node::new(NodeValue::Array(items.into_iter().collect()))
    }

    pub fn object<'a>(entries: impl IntoIterator<Item = (&'a str, Node)>) -> Node {
        let map: BTreeMap<String, Node> = entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        Node::new(NodeValue::Object(map))
    }
}

/// Builder for `ObjectDef` to simplify type-system test setup.
pub struct ObjectDefBuilder {
    def: ObjectDef,
}

impl ObjectDefBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            def: ObjectDef {
                name: name.to_string(),
                name_location: Span::zero(),
                properties: Vec::new(),
            },
        }
    }

    fn property(mut self, name: &str, type_name: &str, optional: bool) -> Self {
        self.def.properties.push(ObjectProperty {
            name: name.to_string(),
            type_name: type_name.to_string(),
            optional,
            location: Span::zero(),
        });
        self
    }

    pub fn required(self, name: &str, type_name: &str) -> Self {
        self.property(name, type_name, false)
    }

    pub fn optional(self, name: &str, type_name: &str) -> Self {
        self.property(name, type_name, true)
    }

    pub fn build(self) -> ObjectDef {
        self.def
    }
}

/// Registry holding the given object types.
pub fn registry(defs: impl IntoIterator<Item = ObjectDef>) -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    for def in defs {
        registry.register(def);
    }
    registry
}
