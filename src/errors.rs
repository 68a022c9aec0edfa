// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

use crate::diagnostics::Diagnostics;

#[derive(Error, Debug)]
pub enum SpecmateError {
    #[error("Settings error: {0}")]
    SettingsError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("{path} not found (referenced at {referenced_at})")]
    MissingFile { path: String, referenced_at: String },

    #[error("Unknown configuration format: {0}")]
    UnknownFormat(String),

    #[error("Unknown type: {0}")]
    UnknownType(String),

    #[error("Specification errors:\n{0}")]
    Compile(Diagnostics),

    #[error("Configuration parse errors:\n{0}")]
    ConfigParse(Diagnostics),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, SpecmateError>;
