//! Client configuration loading.

use crate::models::config::ClientConfig;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Load the config file, or defaults when it does not exist.
pub fn load(path: &Path) -> Result<ClientConfig> {
    if !path.exists() {
        return Ok(ClientConfig::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let config: ClientConfig =
        toml::from_str(&content).with_context(|| format!("parse config {}", path.display()))?;
    Ok(config)
}
