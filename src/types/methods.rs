// src/types/methods.rs

//! Fixed method tables for every typed-value variant.

use regex::Regex;

use crate::types::{TypeDescriptor, TypeError, TypedValue};

/// One entry of a method table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodInfo {
    pub name: &'static str,
    pub signature: &'static str,
    pub description: &'static str,
}

const fn method(
    name: &'static str,
    signature: &'static str,
    description: &'static str,
) -> MethodInfo {
    MethodInfo {
        name,
        signature,
        description,
    }
}

const BOOL_METHODS: &[MethodInfo] = &[
    method("eq", "eq(other bool)", "Whether both values are equal"),
    method("not", "not()", "Logical negation"),
    method("toString", "toString()", "The value as \"true\" or \"false\""),
];

const INT_METHODS: &[MethodInfo] = &[
    method("eq", "eq(other int)", "Whether both values are equal"),
    method("gt", "gt(other int)", "Whether the value is greater than other"),
    method("gte", "gte(other int)", "Whether the value is greater than or equal to other"),
    method("lt", "lt(other int)", "Whether the value is less than other"),
    method("lte", "lte(other int)", "Whether the value is less than or equal to other"),
    method("range", "range(min int, max int)", "Whether min <= value <= max"),
    method("toFloat", "toFloat()", "The value as a float"),
    method("toString", "toString()", "The value in decimal notation"),
];

const FLOAT_METHODS: &[MethodInfo] = &[
    method("eq", "eq(other float)", "Whether both values are equal"),
    method("gt", "gt(other float)", "Whether the value is greater than other"),
    method("gte", "gte(other float)", "Whether the value is greater than or equal to other"),
    method("lt", "lt(other float)", "Whether the value is less than other"),
    method("lte", "lte(other float)", "Whether the value is less than or equal to other"),
    method("range", "range(min float, max float)", "Whether min <= value <= max"),
    method("toInt", "toInt()", "The value truncated toward zero"),
    method("toString", "toString()", "The value in decimal notation"),
];

const STRING_METHODS: &[MethodInfo] = &[
    method("eq", "eq(other string)", "Whether both values are equal"),
    method("len", "len()", "Number of characters"),
    method("isEmpty", "isEmpty()", "Whether the string has no characters"),
    method("contains", "contains(sub string)", "Whether sub occurs in the string"),
    method("startsWith", "startsWith(prefix string)", "Whether the string starts with prefix"),
    method("endsWith", "endsWith(suffix string)", "Whether the string ends with suffix"),
    method("matches", "matches(pattern string)", "Whether the regular expression matches"),
    method("oneOf", "oneOf(options string...)", "Whether the string equals one of the options"),
    method("toInt", "toInt()", "The string parsed as an int"),
    method("toFloat", "toFloat()", "The string parsed as a float"),
    method("toUpper", "toUpper()", "The string in upper case"),
    method("toLower", "toLower()", "The string in lower case"),
];

const LIST_METHODS: &[MethodInfo] = &[
    method("len", "len()", "Number of elements"),
    method("isEmpty", "isEmpty()", "Whether the list has no elements"),
    method("at", "at(index int)", "The element at index"),
    method(
        "contains",
        "contains(value)",
        "Whether an element equals value; a value of another element type is an error",
    ),
];

const OBJECT_METHODS: &[MethodInfo] = &[method("get", "get(field string)", "Gets the specified field")];

const NULL_METHODS: &[MethodInfo] = &[method("isNull", "isNull()", "Always true")];

/// Method table for values of the given type.
pub fn methods_for(descriptor: &TypeDescriptor) -> &'static [MethodInfo] {
    match descriptor {
        TypeDescriptor::Bool => BOOL_METHODS,
        TypeDescriptor::Int => INT_METHODS,
        TypeDescriptor::Float => FLOAT_METHODS,
        TypeDescriptor::String => STRING_METHODS,
        TypeDescriptor::List(_) => LIST_METHODS,
        TypeDescriptor::Object(_) => OBJECT_METHODS,
        TypeDescriptor::Any => &[],
    }
}

/// Render a table entry as `type.signature : description`.
pub fn describe(type_name: &str, info: &MethodInfo) -> String {
    format!("{type_name}.{} : {}", info.signature, info.description)
}

impl TypedValue {
    pub fn methods(&self) -> &'static [MethodInfo] {
        match self {
            TypedValue::Null => NULL_METHODS,
            TypedValue::Bool(_) => BOOL_METHODS,
            TypedValue::Int(_) => INT_METHODS,
            TypedValue::Float(_) => FLOAT_METHODS,
            TypedValue::String(_) => STRING_METHODS,
            TypedValue::List(_) => LIST_METHODS,
            TypedValue::Object(_) => OBJECT_METHODS,
        }
    }

    pub fn method_names(&self) -> Vec<&'static str> {
        self.methods().iter().map(|m| m.name).collect()
    }

    pub fn method_description(&self, name: &str) -> Option<String> {
        self.methods()
            .iter()
            .find(|m| m.name == name)
            .map(|m| describe(&self.type_name(), m))
    }

    /// Invoke a method by name. Unknown names fail with
    /// [`TypeError::UnknownMethod`].
    pub fn call_method(&self, name: &str, args: &[TypedValue]) -> Result<TypedValue, TypeError> {
        let call = Call {
            receiver: self,
            name,
            args,
        };
        match self {
            TypedValue::Null => call.null(),
            TypedValue::Bool(b) => call.bool(*b),
            TypedValue::Int(i) => call.int(*i),
            TypedValue::Float(x) => call.float(*x),
            TypedValue::String(s) => call.string(s),
            TypedValue::List(list) => call.list(&list.items),
            TypedValue::Object(obj) => match name {
                "get" => obj.get(args),
                _ => Err(call.unknown()),
            },
        }
    }
}

struct Call<'a> {
    receiver: &'a TypedValue,
    name: &'a str,
    args: &'a [TypedValue],
}

impl Call<'_> {
    fn qualified(&self) -> String {
        format!("{}.{}", self.receiver.type_name(), self.name)
    }

    fn unknown(&self) -> TypeError {
        TypeError::UnknownMethod {
            type_name: self.receiver.type_name(),
            method: self.name.to_string(),
        }
    }

    fn arity(&self, expected: usize) -> Result<(), TypeError> {
        if self.args.len() == expected {
            Ok(())
        } else {
            Err(TypeError::Arity {
                method: self.qualified(),
                expected: expected.to_string(),
                found: self.args.len(),
            })
        }
    }

    fn argument_error(&self, index: usize, expected: &str) -> TypeError {
        TypeError::Argument {
            method: self.qualified(),
            index,
            expected: expected.to_string(),
            found: self.args[index].type_name(),
        }
    }

    fn bool_arg(&self, index: usize) -> Result<bool, TypeError> {
        match &self.args[index] {
            TypedValue::Bool(b) => Ok(*b),
            _ => Err(self.argument_error(index, "bool")),
        }
    }

    fn int_arg(&self, index: usize) -> Result<i64, TypeError> {
        match &self.args[index] {
            TypedValue::Int(i) => Ok(*i),
            _ => Err(self.argument_error(index, "int")),
        }
    }

    fn float_arg(&self, index: usize) -> Result<f64, TypeError> {
        match &self.args[index] {
            TypedValue::Float(x) => Ok(*x),
            _ => Err(self.argument_error(index, "float")),
        }
    }

    fn str_arg(&self, index: usize) -> Result<&str, TypeError> {
        match &self.args[index] {
            TypedValue::String(s) => Ok(s),
            _ => Err(self.argument_error(index, "string")),
        }
    }

    fn null(&self) -> Result<TypedValue, TypeError> {
        match self.name {
            "isNull" => {
                self.arity(0)?;
                Ok(TypedValue::Bool(true))
            }
            _ => Err(self.unknown()),
        }
    }

    fn bool(&self, value: bool) -> Result<TypedValue, TypeError> {
        match self.name {
            "eq" => {
                self.arity(1)?;
                Ok(TypedValue::Bool(value == self.bool_arg(0)?))
            }
            "not" => {
                self.arity(0)?;
                Ok(TypedValue::Bool(!value))
            }
            "toString" => {
                self.arity(0)?;
                Ok(TypedValue::String(value.to_string()))
            }
            _ => Err(self.unknown()),
        }
    }

    fn int(&self, value: i64) -> Result<TypedValue, TypeError> {
        let compare = |f: fn(&i64, &i64) -> bool| -> Result<TypedValue, TypeError> {
            self.arity(1)?;
            Ok(TypedValue::Bool(f(&value, &self.int_arg(0)?)))
        };
        match self.name {
            "eq" => compare(i64::eq),
            "gt" => compare(i64::gt),
            "gte" => compare(i64::ge),
            "lt" => compare(i64::lt),
            "lte" => compare(i64::le),
            "range" => {
                self.arity(2)?;
                let (min, max) = (self.int_arg(0)?, self.int_arg(1)?);
                Ok(TypedValue::Bool(min <= value && value <= max))
            }
            "toFloat" => {
                self.arity(0)?;
                Ok(TypedValue::Float(value as f64))
            }
            "toString" => {
                self.arity(0)?;
                Ok(TypedValue::String(value.to_string()))
            }
            _ => Err(self.unknown()),
        }
    }

    fn float(&self, value: f64) -> Result<TypedValue, TypeError> {
        let compare = |f: fn(&f64, &f64) -> bool| -> Result<TypedValue, TypeError> {
            self.arity(1)?;
            Ok(TypedValue::Bool(f(&value, &self.float_arg(0)?)))
        };
        match self.name {
            "eq" => compare(f64::eq),
            "gt" => compare(f64::gt),
            "gte" => compare(f64::ge),
            "lt" => compare(f64::lt),
            "lte" => compare(f64::le),
            "range" => {
                self.arity(2)?;
                let (min, max) = (self.float_arg(0)?, self.float_arg(1)?);
                Ok(TypedValue::Bool(min <= value && value <= max))
            }
            "toInt" => {
                self.arity(0)?;
                if !value.is_finite() || value.trunc() < i64::MIN as f64 || value.trunc() > i64::MAX as f64 {
                    return Err(TypeError::InvalidConversion {
                        value: value.to_string(),
                        target: "int".to_string(),
                    });
                }
                Ok(TypedValue::Int(value.trunc() as i64))
            }
            "toString" => {
                self.arity(0)?;
                Ok(TypedValue::String(value.to_string()))
            }
            _ => Err(self.unknown()),
        }
    }

    fn string(&self, value: &str) -> Result<TypedValue, TypeError> {
        let predicate = |f: fn(&str, &str) -> bool| -> Result<TypedValue, TypeError> {
            self.arity(1)?;
            Ok(TypedValue::Bool(f(value, self.str_arg(0)?)))
        };
        match self.name {
            "eq" => predicate(|a, b| a == b),
            "contains" => predicate(|a, b| a.contains(b)),
            "startsWith" => predicate(|a, b| a.starts_with(b)),
            "endsWith" => predicate(|a, b| a.ends_with(b)),
            "len" => {
                self.arity(0)?;
                Ok(TypedValue::Int(value.chars().count() as i64))
            }
            "isEmpty" => {
                self.arity(0)?;
                Ok(TypedValue::Bool(value.is_empty()))
            }
            "matches" => {
                self.arity(1)?;
                let pattern = self.str_arg(0)?;
                let re = Regex::new(pattern).map_err(|e| TypeError::InvalidRegex {
                    pattern: pattern.to_string(),
                    message: e.to_string(),
                })?;
                Ok(TypedValue::Bool(re.is_match(value)))
            }
            "oneOf" => {
                if self.args.is_empty() {
                    return Err(TypeError::Arity {
                        method: self.qualified(),
                        expected: "at least 1".to_string(),
                        found: 0,
                    });
                }
                for index in 0..self.args.len() {
                    if self.str_arg(index)? == value {
                        return Ok(TypedValue::Bool(true));
                    }
                }
                Ok(TypedValue::Bool(false))
            }
            "toInt" => {
                self.arity(0)?;
                value
                    .trim()
                    .parse::<i64>()
                    .map(TypedValue::Int)
                    .map_err(|_| TypeError::InvalidConversion {
                        value: value.to_string(),
                        target: "int".to_string(),
                    })
            }
            "toFloat" => {
                self.arity(0)?;
                value
                    .trim()
                    .parse::<f64>()
                    .map(TypedValue::Float)
                    .map_err(|_| TypeError::InvalidConversion {
                        value: value.to_string(),
                        target: "float".to_string(),
                    })
            }
            "toUpper" => {
                self.arity(0)?;
                Ok(TypedValue::String(value.to_uppercase()))
            }
            "toLower" => {
                self.arity(0)?;
                Ok(TypedValue::String(value.to_lowercase()))
            }
            _ => Err(self.unknown()),
        }
    }

    fn list(&self, items: &[TypedValue]) -> Result<TypedValue, TypeError> {
        match self.name {
            "len" => {
                self.arity(0)?;
                Ok(TypedValue::Int(items.len() as i64))
            }
            "isEmpty" => {
                self.arity(0)?;
                Ok(TypedValue::Bool(items.is_empty()))
            }
            "at" => {
                self.arity(1)?;
                let index = self.int_arg(0)?;
                usize::try_from(index)
                    .ok()
                    .and_then(|i| items.get(i))
                    .cloned()
                    .ok_or(TypeError::IndexOutOfBounds {
                        index,
                        len: items.len(),
                    })
            }
            "contains" => {
                self.arity(1)?;
                let needle = &self.args[0];
                for item in items {
                    if item.equals(needle)? {
                        return Ok(TypedValue::Bool(true));
                    }
                }
                Ok(TypedValue::Bool(false))
            }
            _ => Err(self.unknown()),
        }
    }
}
