//! Command handlers -- one module per subcommand

pub mod check;
pub mod config;
pub mod generate;

use std::path::Path;

use tracing::debug;

use loggen_core::config::LoggenConfig;

use crate::error::CliError;

/// Load the configuration used by `generate` and `check`.
///
/// A missing file falls back to defaults; environment overrides and
/// validation apply either way.
pub async fn load_config(path: &Path) -> Result<LoggenConfig, CliError> {
    if tokio::fs::try_exists(path).await.unwrap_or(false) {
        return Ok(LoggenConfig::load(path).await?);
    }

    debug!(path = %path.display(), "configuration file not found, using defaults");
    let mut config = LoggenConfig::default();
    config.apply_env_overrides();
    config.validate()?;
    Ok(config)
}
