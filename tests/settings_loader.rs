use std::io::Write;

use specmate::config::{OutputFormat, Settings, load_and_validate, load_from_path, load_settings};
use specmate::errors::SpecmateError;
use tempfile::NamedTempFile;

fn write_settings(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write settings");
    file
}

#[test]
fn full_settings_file_is_loaded() {
    let file = write_settings(
        r#"
[output]
format = "json"
show_passing = true
show_notes = false

[analysis]
parallel = false

[formats]
TML = "TOML"
"#,
    );

    let settings = load_and_validate(file.path()).expect("valid settings");
    assert_eq!(settings.output.format, OutputFormat::Json);
    assert!(settings.output.show_passing);
    assert!(!settings.output.show_notes);
    assert!(!settings.analysis.parallel);
    assert_eq!(
        settings.formats.get("tml").map(String::as_str),
        Some("toml")
    );
}

#[test]
fn missing_sections_use_defaults() {
    let file = write_settings("[output]\nshow_passing = true\n");

    let settings = load_and_validate(file.path()).expect("valid settings");
    assert_eq!(settings.output.format, OutputFormat::Text);
    assert!(settings.output.show_passing);
    assert!(settings.output.show_notes);
    assert!(settings.analysis.parallel);
    assert!(settings.formats.is_empty());

    let empty = write_settings("");
    assert_eq!(
        load_and_validate(empty.path()).expect("empty file is valid"),
        Settings::default()
    );
}

#[test]
fn aliases_to_unknown_formats_are_rejected() {
    let file = write_settings("[formats]\nyml = \"yaml\"\n");

    // Deserialization alone accepts it.
    assert!(load_from_path(file.path()).is_ok());

    match load_and_validate(file.path()) {
        Err(SpecmateError::SettingsError(msg)) => {
            assert!(msg.contains("unknown format 'yaml'"), "{msg}");
            assert!(msg.contains("known: toml"), "{msg}");
        }
        other => panic!("expected settings error, got {other:?}"),
    }
}

#[test]
fn invalid_output_format_fails_to_deserialize() {
    let file = write_settings("[output]\nformat = \"xml\"\n");
    assert!(matches!(
        load_from_path(file.path()),
        Err(SpecmateError::TomlError(_))
    ));
}

#[test]
fn explicit_missing_path_is_an_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("nope.toml");
    assert!(matches!(
        load_settings(Some(&missing)),
        Err(SpecmateError::IoError(_))
    ));
}

#[test]
fn output_format_parses_from_strings() {
    assert_eq!(" JSON ".parse::<OutputFormat>(), Ok(OutputFormat::Json));
    assert_eq!("text".parse::<OutputFormat>(), Ok(OutputFormat::Text));
    assert!("yaml".parse::<OutputFormat>().is_err());
}
