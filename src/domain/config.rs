//! Config - Dashboard Configuration

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{DEBUG_LOG_CAPACITY, DEFAULT_REFRESH_INTERVAL_MS};
use crate::domain::unit::VolumeUnit;
use crate::error::{Error, Result};

/// Main dashboard configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    /// Data server connection
    pub server: ServerConfig,
    /// Auto-refresh settings
    pub refresh: RefreshSettings,
    /// Page the client renders
    pub page: PageConfig,
    /// Presentation options
    pub display: DisplayConfig,
    /// Log output
    pub logging: LoggingConfig,
}

impl DashboardConfig {
    /// Check values that cannot be expressed in the type system
    pub fn validate(&self) -> Result<()> {
        if self.refresh.interval_ms == 0 {
            return Err(Error::Invalid {
                message: "refresh.interval_ms must be greater than zero".to_string(),
            });
        }
        if self.server.base_url.trim().is_empty() {
            return Err(Error::Invalid {
                message: "server.base_url must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Data server configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL, e.g. "http://localhost:5000"
    pub base_url: String,
    /// Request timeout; `None` keeps the HTTP client default
    pub request_timeout_secs: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            request_timeout_secs: None,
        }
    }
}

/// Auto-refresh configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RefreshSettings {
    /// Interval between refresh cycles
    pub interval_ms: u64,
}

impl RefreshSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
        }
    }
}

/// Page the headless client stands in for
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PageConfig {
    /// URL path used for page classification
    pub path: String,
    /// Active company id
    pub company_id: Option<String>,
    /// Company display name (used by the report endpoint)
    pub company_name: Option<String>,
    /// Fixed date; defaults to today
    pub date: Option<NaiveDate>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            path: "/production/daily".to_string(),
            company_id: None,
            company_name: None,
            date: None,
        }
    }
}

/// Presentation options
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub unit: VolumeUnit,
    pub debug_log_capacity: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            unit: VolumeUnit::default(),
            debug_log_capacity: DEBUG_LOG_CAPACITY,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory for daily rolling log files; stdout only when unset
    pub directory: Option<PathBuf>,
    /// `EnvFilter` directive
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: None,
            filter: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: DashboardConfig = toml::from_str(
            r#"
            [page]
            company_id = "7"

            [display]
            unit = "liters"
            "#,
        )
        .expect("parse");

        assert_eq!(config.refresh.interval_ms, DEFAULT_REFRESH_INTERVAL_MS);
        assert_eq!(config.page.company_id.as_deref(), Some("7"));
        assert_eq!(config.page.path, "/production/daily");
        assert_eq!(config.display.unit, VolumeUnit::Liters);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let mut config = DashboardConfig::default();
        config.refresh.interval_ms = 0;
        assert!(config.validate().is_err());
    }
}
