// src/types/object.rs

use std::collections::BTreeMap;
use std::fmt;

use crate::spec::ObjectDef;
use crate::tree::Node;
use crate::types::{TypeDescriptor, TypeError, TypeRegistry, TypedValue, make_typed};

/// Instance of a named object type (or `object` when inferred).
#[derive(Debug, Clone, PartialEq)]
pub struct CustomObject {
    pub type_name: String,
    pub fields: BTreeMap<String, TypedValue>,
}

impl CustomObject {
    /// `get(field string)`.
    pub fn get(&self, args: &[TypedValue]) -> Result<TypedValue, TypeError> {
        let method = format!("{}.get", self.type_name);
        let [arg] = args else {
            return Err(TypeError::Arity {
                method,
                expected: "1".to_string(),
                found: args.len(),
            });
        };
        let TypedValue::String(field) = arg else {
            return Err(TypeError::Argument {
                method,
                index: 0,
                expected: "string".to_string(),
                found: arg.type_name(),
            });
        };
        self.fields
            .get(field)
            .cloned()
            .ok_or_else(|| TypeError::NoSuchField {
                type_name: self.type_name.clone(),
                field: field.clone(),
            })
    }
}

impl fmt::Display for CustomObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.type_name)?;
        for (idx, (name, value)) in self.fields.iter().enumerate() {
            let sep = if idx == 0 { " " } else { ", " };
            write!(f, "{sep}{name}: {value}")?;
        }
        if self.fields.is_empty() {
            f.write_str("}")
        } else {
            f.write_str(" }")
        }
    }
}

/// Build an instance of `def` from a mapping node.
///
/// Declared properties are typed recursively; absent required ones fail and
/// absent optional ones are left out. Undeclared keys are ignored.
pub fn custom_object(
    registry: &TypeRegistry,
    def: &ObjectDef,
    map: &BTreeMap<String, Node>,
) -> Result<TypedValue, TypeError> {
    let mut fields = BTreeMap::new();

    for prop in &def.properties {
        match map.get(&prop.name) {
            Some(node) => {
                let value = TypeDescriptor::parse(&prop.type_name)
                    .and_then(|desc| make_typed(registry, &desc, node))
                    .map_err(|e| TypeError::Property {
                        property: prop.name.clone(),
                        source: Box::new(e),
                    })?;
                fields.insert(prop.name.clone(), value);
            }
            None if prop.optional => {}
            None => return Err(TypeError::MissingProperty(prop.name.clone())),
        }
    }

    Ok(TypedValue::Object(CustomObject {
        type_name: def.name.clone(),
        fields,
    }))
}
