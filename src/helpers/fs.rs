//! File System Utilities
//!
//! Configuration and log directory management.

use crate::error::{Error, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "farmdash", "farm-dashboard").ok_or_else(|| Error::Invalid {
        message: "Could not determine project directories".to_string(),
    })
}

/// Get or create the application's configuration directory
///
/// Platform-specific locations:
/// - **Linux**: `~/.config/farm-dashboard/` or `$XDG_CONFIG_HOME/farm-dashboard/`
/// - **macOS**: `~/Library/Application Support/com.farmdash.farm-dashboard/`
/// - **Windows**: `C:\Users\<User>\AppData\Roaming\farmdash\farm-dashboard\config\`
pub fn get_or_create_config_dir() -> Result<PathBuf> {
    let dirs = project_dirs()?;
    let config_dir = dirs.config_dir();
    if !config_dir.exists() {
        fs::create_dir_all(config_dir)?;
    }
    Ok(config_dir.to_path_buf())
}

/// Get or create the directory for rolling log files
pub fn get_or_create_log_dir() -> Result<PathBuf> {
    let dirs = project_dirs()?;
    let log_dir = dirs.data_local_dir().join("logs");
    if !log_dir.exists() {
        fs::create_dir_all(&log_dir)?;
    }
    Ok(log_dir)
}
