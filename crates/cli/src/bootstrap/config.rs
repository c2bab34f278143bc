use anyhow::Context;
use zonealias_domain::{CliOverrides, Config};

/// Loads the configuration file, applies CLI overrides and validates the result.
pub fn load_config(path: Option<&str>, overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(path, overrides).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}
