//! Effective configuration for a CLI invocation.

use anyhow::{Context, Result};
use radiocat_core::Config;

use crate::cli::Cli;

/// Load the config file named by `--config`/`RADIOCAT_CONFIG` (or the
/// platform default) and apply `--output`.
pub fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load().context("Failed to load configuration")?,
    };

    if let Some(output) = &cli.output {
        config.paths.output.clone_from(output);
    }
    Ok(config)
}
