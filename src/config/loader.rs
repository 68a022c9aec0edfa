// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{RawSettings, Settings};
use crate::errors::Result;

/// Load a settings file and return the raw `RawSettings`.
///
/// This only performs TOML deserialization. Use [`load_and_validate`] to
/// also check format aliases.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawSettings> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let settings: RawSettings = toml::from_str(&contents)?;

    Ok(settings)
}

/// Load a settings file from path and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<Settings> {
    let raw = load_from_path(&path)?;
    let settings = Settings::try_from(raw)?;
    Ok(settings)
}

/// Resolve the settings for a run.
///
/// An explicit path must exist. Without one, `Specmate.toml` in the current
/// directory is used when present and defaults otherwise.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings> {
    if let Some(path) = explicit {
        debug!(path = %path.display(), "loading settings");
        return load_and_validate(path);
    }

    let path = default_settings_path();
    if path.is_file() {
        debug!(path = %path.display(), "loading default settings file");
        load_and_validate(path)
    } else {
        debug!("no settings file; using defaults");
        Ok(Settings::default())
    }
}

pub fn default_settings_path() -> PathBuf {
    PathBuf::from("Specmate.toml")
}
