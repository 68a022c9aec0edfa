// src/parsers/mod.rs

//! Configuration front ends.
//!
//! A front end turns the text of one configuration file into the located
//! value tree. Which front end handles a file is decided by the format
//! identifier in the specification's `file` declaration, looked up in a
//! [`ParserRegistry`].

pub mod toml;

use std::collections::BTreeMap;
use std::fmt::Debug;

use tracing::debug;

use crate::diagnostics::Diagnostics;
use crate::errors::{Result, SpecmateError};
use crate::tree::Node;

pub use self::toml::TomlParser;

/// Format-specific parser producing a located value tree.
pub trait ConfigParser: Send + Sync + Debug {
    /// Canonical format identifier (`toml`).
    fn format(&self) -> &'static str;

    /// Parse `source`; `file` names the file in reported locations.
    fn parse(&self, source: &str, file: &str) -> std::result::Result<Node, Diagnostics>;
}

#[derive(Debug, Default)]
pub struct ParserRegistry {
    parsers: BTreeMap<String, Box<dyn ConfigParser>>,
    aliases: BTreeMap<String, String>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in front end.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(TomlParser));
        registry
    }

    pub fn register(&mut self, parser: Box<dyn ConfigParser>) {
        self.parsers.insert(parser.format().to_string(), parser);
    }

    /// Make `alias` resolve to the parser registered for `canonical`.
    pub fn add_alias(&mut self, alias: impl Into<String>, canonical: impl Into<String>) -> Result<()> {
        let alias = alias.into().to_ascii_lowercase();
        let canonical = canonical.into().to_ascii_lowercase();
        if !self.parsers.contains_key(&canonical) {
            return Err(SpecmateError::UnknownFormat(canonical));
        }
        debug!(%alias, %canonical, "registered format alias");
        self.aliases.insert(alias, canonical);
        Ok(())
    }

    pub fn formats(&self) -> impl Iterator<Item = &str> {
        self.parsers.keys().map(String::as_str)
    }

    pub fn is_known(&self, format: &str) -> bool {
        self.parsers.contains_key(format)
    }

    /// Look a format up, case-insensitively, through the alias table.
    pub fn resolve(&self, format: &str) -> Result<&dyn ConfigParser> {
        let key = format.to_ascii_lowercase();
        let canonical = self.aliases.get(&key).unwrap_or(&key);
        self.parsers
            .get(canonical)
            .map(|parser| parser.as_ref())
            .ok_or_else(|| SpecmateError::UnknownFormat(format.to_string()))
    }
}
