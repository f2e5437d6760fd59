//! Command implementations.

pub mod publish;
pub mod upload;
pub mod watch;

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use pressmark_core::Config;

/// Load the site configuration: the explicit file if given, otherwise
/// `pressmark.toml` in the source directory, otherwise defaults.
/// `PRESSMARK__*` environment variables apply on top.
pub fn load_config(explicit: Option<&Path>, source: &Path) -> Result<Config> {
    let config = match explicit {
        Some(path) => Config::load_with_env(Some(path))
            .wrap_err_with(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::discover(source).wrap_err("Failed to load configuration")?,
    };

    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}
