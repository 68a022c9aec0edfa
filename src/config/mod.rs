// src/config/mod.rs

//! Settings loading and validation.
//!
//! Responsibilities:
//! - Define the TOML-backed settings model (`model.rs`).
//! - Load a settings file from disk (`loader.rs`).
//! - Validate format aliases (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, load_settings};
pub use model::{AnalysisSection, OutputFormat, OutputSection, RawSettings, Settings};
pub use validate::validate_settings;
