// src/config/validate.rs

use crate::config::model::{RawSettings, Settings};
use crate::errors::{Result, SpecmateError};
use crate::parsers::ParserRegistry;

impl TryFrom<RawSettings> for Settings {
    type Error = SpecmateError;

    fn try_from(raw: RawSettings) -> std::result::Result<Self, Self::Error> {
        validate_settings(&raw)?;
        let formats = raw
            .formats
            .into_iter()
            .map(|(alias, canonical)| (alias.to_ascii_lowercase(), canonical.to_ascii_lowercase()))
            .collect();
        Ok(Settings::new_unchecked(raw.output, raw.analysis, formats))
    }
}

pub fn validate_settings(settings: &RawSettings) -> Result<()> {
    validate_format_aliases(settings, &ParserRegistry::with_builtin())
}

fn validate_format_aliases(settings: &RawSettings, registry: &ParserRegistry) -> Result<()> {
    for (alias, canonical) in settings.formats.iter() {
        if alias.trim().is_empty() {
            return Err(SpecmateError::SettingsError(
                "[formats] keys must not be empty".to_string(),
            ));
        }
        if !registry.is_known(&canonical.to_ascii_lowercase()) {
            let known: Vec<&str> = registry.formats().collect();
            return Err(SpecmateError::SettingsError(format!(
                "[formats].{alias} maps to unknown format '{canonical}' (known: {})",
                known.join(", ")
            )));
        }
    }
    Ok(())
}
