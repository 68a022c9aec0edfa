// src/parsers/toml.rs

//! TOML front end built on the span-preserving `toml::de::DeTable` parser.

use std::collections::BTreeMap;
use std::ops::Range;

use ::toml::Spanned;
use ::toml::de::{DeTable, DeValue};
use tracing::{debug, trace};

use crate::diagnostics::{Diagnostic, Diagnostics, LineIndex, SourceLocation, Span};
use crate::parsers::ConfigParser;
use crate::tree::{Node, NodeValue};

#[derive(Debug, Clone, Copy, Default)]
pub struct TomlParser;

impl ConfigParser for TomlParser {
    fn format(&self) -> &'static str {
        "toml"
    }

    fn parse(&self, source: &str, file: &str) -> Result<Node, Diagnostics> {
        let index = LineIndex::new(source);

        let document = DeTable::parse(source).map_err(|err| {
            let span = err.span().map(|range| index.span(range)).unwrap_or_default();
            Diagnostic::syntax(err.message().trim().to_string(), SourceLocation::new(file, span))
        })?;

        let converter = Converter { index: &index, file };
        let root_span = index.span(0..source.len());
        let mut errors = Diagnostics::new();
        let map = converter.table(document.get_ref(), &mut errors);
        debug!(file, keys = map.len(), "parsed toml document");

        errors.into_result(Node::with_locations(
            NodeValue::Object(map),
            Span::zero(),
            root_span,
        ))
    }
}

struct Converter<'a> {
    index: &'a LineIndex<'a>,
    file: &'a str,
}

impl Converter<'_> {
    fn span(&self, range: Range<usize>) -> Span {
        self.index.span(range)
    }

    fn table(&self, table: &DeTable<'_>, errors: &mut Diagnostics) -> BTreeMap<String, Node> {
        let mut map = BTreeMap::new();
        for (key, value) in table.iter() {
            let name_location = self.span(key.span());
            let node = self.value(value, name_location, errors);
            trace!(key = %key.get_ref(), kind = %node.kind(), "converted toml entry");
            map.insert(key.get_ref().to_string(), node);
        }
        map
    }

    fn value(
        &self,
        value: &Spanned<DeValue<'_>>,
        name_location: Span,
        errors: &mut Diagnostics,
    ) -> Node {
        let mut value_location = self.span(value.span());
        // `[table]` headers have no value token of their own.
        if value_location.is_empty() {
            value_location = name_location;
        }

        let node_value = match value.get_ref() {
            DeValue::String(s) => NodeValue::String(s.to_string()),
            DeValue::Integer(int) => match i64::from_str_radix(int.as_str(), int.radix()) {
                Ok(i) => NodeValue::Int(i),
                Err(_) => {
                    errors.push(Diagnostic::syntax(
                        format!("integer {int} does not fit in 64 bits"),
                        SourceLocation::new(self.file, value_location),
                    ));
                    NodeValue::Null
                }
            },
            DeValue::Float(float) => match float.as_str().parse::<f64>() {
                Ok(x) if x.is_finite() || float.as_str().contains("inf") => NodeValue::Float(x),
                _ => {
                    errors.push(Diagnostic::syntax(
                        format!("invalid float {}", float.as_str()),
                        SourceLocation::new(self.file, value_location),
                    ));
                    NodeValue::Null
                }
            },
            DeValue::Boolean(b) => NodeValue::Bool(*b),
            DeValue::Datetime(dt) => NodeValue::String(dt.to_string()),
            DeValue::Array(items) => NodeValue::Array(
                items
                    .iter()
                    .map(|item| {
                        let location = self.span(item.span());
                        self.value(item, location, errors)
                    })
                    .collect(),
            ),
            DeValue::Table(table) => NodeValue::Object(self.table(table, errors)),
        };

        Node::with_locations(node_value, name_location, value_location)
    }
}
