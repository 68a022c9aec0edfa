// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::config::OutputFormat;

/// Command-line arguments for `specmate`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "specmate",
    version,
    about = "Validate configuration files against a specification.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the specification file.
    #[arg(long, value_name = "PATH", required_unless_present = "methods")]
    pub spec: Option<String>,

    /// Path to the settings file (TOML).
    ///
    /// Default: `Specmate.toml` in the current working directory, if present.
    #[arg(long, value_name = "PATH")]
    pub settings: Option<String>,

    /// Report format; overrides `[output].format`.
    #[arg(long, value_enum, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SPECMATE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Compile the specification and print its fields, but don't check
    /// anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Print the methods available on a type (e.g. `int`, `list<string>`)
    /// and exit.
    #[arg(long, value_name = "TYPE")]
    pub methods: Option<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
