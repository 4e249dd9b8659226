//! Subcommand implementations.

pub mod batch;
pub mod config;
pub mod extract;

use std::path::Path;

use visura_core::VisuraConfig;

/// Load the configuration from an explicit path, the default location, or defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<VisuraConfig> {
    if let Some(path) = config_path {
        return Ok(VisuraConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        Ok(VisuraConfig::from_file(&default_path)?)
    } else {
        Ok(VisuraConfig::default())
    }
}
