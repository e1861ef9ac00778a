//! ConfigStore - Local Configuration Storage

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Serialize, de::DeserializeOwned};

use crate::error::Result;
use crate::helpers::get_or_create_config_dir;

/// Default configuration file name inside the config directory
pub const CONFIG_FILE_NAME: &str = "dashboard.toml";

/// Path of the default configuration file
pub fn default_config_path() -> Result<PathBuf> {
    Ok(get_or_create_config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load a TOML config file; a missing or blank file yields defaults
pub fn load_config<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.exists() {
        tracing::info!(path = ?path, "Config file not found, using defaults");
        return Ok(T::default());
    }

    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(T::default());
    }

    let config: T = toml::from_str(&content).map_err(|e| {
        tracing::error!(error = %e, path = ?path, "Failed to parse config file");
        e
    })?;
    Ok(config)
}

/// Save a TOML config file, creating parent directories as needed
pub fn save_config<T: Serialize>(path: &Path, config: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
