//! Farm Dashboard - Main Entry Point
//!
//! Loads the configured production page, keeps its chart refreshed and
//! exits on Ctrl-C.

use std::path::PathBuf;

use anyhow::Context;
use farm_dashboard::app::{DashboardApp, spawn_event_logger};
use farm_dashboard::domain::config::{DashboardConfig, LoggingConfig};
use farm_dashboard::eventing::event_channel;
use farm_dashboard::helpers::get_or_create_log_dir;
use farm_dashboard::utils::config_store::{default_config_path, load_config, save_config};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable overriding the config file location
const CONFIG_ENV: &str = "FARM_DASHBOARD_CONFIG";

fn init_tracing(logging: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.filter.as_str()));

    let log_dir = logging
        .directory
        .clone()
        .or_else(|| get_or_create_log_dir().ok());
    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "farm-dashboard.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .init();
    guard
}

fn config_path() -> anyhow::Result<PathBuf> {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) => Ok(PathBuf::from(path)),
        None => default_config_path().context("Failed to locate config directory"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let path = config_path()?;
    let config: DashboardConfig = load_config(&path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;

    let _guard = init_tracing(&config.logging);
    tracing::info!(config = %path.display(), "Starting farm dashboard...");

    if !path.exists() {
        match save_config(&path, &config) {
            Ok(()) => tracing::info!(path = %path.display(), "Wrote default config"),
            Err(e) => tracing::warn!(error = %e, "Failed to write default config"),
        }
    }

    let (events_tx, events_rx) = event_channel();
    let _logger = spawn_event_logger(events_rx).context("Failed to start event logger")?;

    let app = DashboardApp::build(&config, events_tx).context("Failed to build dashboard")?;
    app.start().await;

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;

    app.shutdown();
    Ok(())
}
