// src/config/model.rs

use std::collections::BTreeMap;
use std::str::FromStr;

use clap::ValueEnum;
use serde::Deserialize;

/// Settings as read from a `Specmate.toml` file.
///
/// ```toml
/// [output]
/// format = "text"
/// show_passing = false
/// show_notes = true
///
/// [analysis]
/// parallel = true
///
/// [formats]
/// tml = "toml"
/// ```
///
/// All sections are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSettings {
    #[serde(default)]
    pub output: OutputSection,

    #[serde(default)]
    pub analysis: AnalysisSection,

    /// Extra format identifiers, each mapped to a built-in format.
    #[serde(default)]
    pub formats: BTreeMap<String, String>,
}

/// Validated settings. Only built through `TryFrom<RawSettings>` or
/// [`Settings::default`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub output: OutputSection,
    pub analysis: AnalysisSection,
    pub formats: BTreeMap<String, String>,
}

impl Settings {
    pub(crate) fn new_unchecked(
        output: OutputSection,
        analysis: AnalysisSection,
        formats: BTreeMap<String, String>,
    ) -> Self {
        Self {
            output,
            analysis,
            formats,
        }
    }
}

/// `[output]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutputSection {
    #[serde(default)]
    pub format: OutputFormat,

    /// Also list checks that passed.
    #[serde(default)]
    pub show_passing: bool,

    /// Print field notes next to failing fields.
    #[serde(default = "default_true")]
    pub show_notes: bool,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            show_passing: false,
            show_notes: true,
        }
    }
}

/// `[analysis]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnalysisSection {
    /// Evaluate fields on the rayon thread pool.
    #[serde(default = "default_true")]
    pub parallel: bool,
}

impl Default for AnalysisSection {
    fn default() -> Self {
        Self { parallel: true }
    }
}

fn default_true() -> bool {
    true
}

/// Report format, from `[output].format` or `--format`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!(
                "invalid output format: {other} (expected \"text\" or \"json\")"
            )),
        }
    }
}
