// src/logging.rs

//! Logging setup for `specmate` using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the filter:
//! 1. `--log-level` CLI flag (if provided), applied to every target
//! 2. `SPECMATE_LOG`, in `EnvFilter` syntax (`debug`,
//!    `specmate::check=trace,info`, ...)
//! 3. `info`
//!
//! Logs are sent to STDERR so that stdout carries only the report.

use anyhow::{Context, Result, anyhow};
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

pub const LOG_ENV: &str = "SPECMATE_LOG";

/// Initialise the global subscriber. Call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let filter = build_filter(cli_level, std::env::var(LOG_ENV).ok().as_deref())?;

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("installing tracing subscriber: {e}"))?;

    Ok(())
}

/// Filter for the given CLI level and `SPECMATE_LOG` value.
pub fn build_filter(cli_level: Option<LogLevel>, env_value: Option<&str>) -> Result<EnvFilter> {
    if let Some(level) = cli_level {
        return Ok(EnvFilter::new(level_from_log_level(level).as_str()));
    }
    match env_value.map(str::trim).filter(|s| !s.is_empty()) {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid {LOG_ENV} value {directives:?}")),
        None => Ok(EnvFilter::new(Level::INFO.as_str())),
    }
}

pub fn level_from_log_level(lvl: LogLevel) -> Level {
    match lvl {
        LogLevel::Error => Level::ERROR,
        LogLevel::Warn => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_level_wins_over_environment() {
        let filter = build_filter(Some(LogLevel::Debug), Some("error")).unwrap();
        assert_eq!(filter.to_string().to_lowercase(), "debug");
    }

    #[test]
    fn environment_accepts_directives() {
        let filter = build_filter(None, Some("specmate::check=trace,info")).unwrap();
        let rendered = filter.to_string();
        assert!(rendered.to_lowercase().contains("specmate::check=trace"), "{rendered}");
    }

    #[test]
    fn blank_environment_falls_back_to_info() {
        assert_eq!(build_filter(None, Some("  ")).unwrap().to_string().to_lowercase(), "info");
        assert_eq!(build_filter(None, None).unwrap().to_string().to_lowercase(), "info");
    }

    #[test]
    fn malformed_environment_is_rejected() {
        assert!(build_filter(None, Some("specmate=loud")).is_err());
    }
}
