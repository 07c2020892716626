//! Logging initialization for the loggen CLI.
//!
//! Diagnostics always go to stderr: stdout carries the generated lines (or
//! the `check --passthrough` echo) and must stay byte-for-byte clean.

use std::str::FromStr;

use anyhow::{Context, Result, bail};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use loggen_core::config::GeneralConfig;

/// Diagnostic output format, from `[general] log_format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per record
    Json,
    /// Multi-line human-readable records
    Pretty,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            other => bail!("unknown log format '{other}', expected 'json' or 'pretty'"),
        }
    }
}

/// Build the level filter. `RUST_LOG` wins over `[general] log_level`.
pub fn build_filter(config: &GeneralConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.log_level)
        .with_context(|| format!("invalid log level '{}'", config.log_level))
}

/// Install the global tracing subscriber. Call once, before any tracing macro.
pub fn init_tracing(config: &GeneralConfig) -> Result<()> {
    let format: LogFormat = config.log_format.parse()?;
    let filter = build_filter(config)?;

    let json = (format == LogFormat::Json)
        .then(|| fmt::layer().json().with_writer(std::io::stderr));
    let pretty = (format == LogFormat::Pretty)
        .then(|| fmt::layer().pretty().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(pretty)
        .try_init()
        .with_context(|| format!("failed to initialize {format:?} tracing subscriber"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn general(level: &str, format: &str) -> GeneralConfig {
        GeneralConfig {
            log_level: level.to_owned(),
            log_format: format.to_owned(),
        }
    }

    #[test]
    fn parses_known_formats() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
    }

    #[test]
    fn unknown_format_is_rejected() {
        let err = init_tracing(&general("info", "xml")).unwrap_err();
        assert!(err.to_string().contains("unknown log format"));
    }

    #[test]
    fn filter_accepts_configured_level() {
        // RUST_LOG may be set in the test environment; either source must parse
        assert!(build_filter(&general("debug", "pretty")).is_ok());
    }
}
