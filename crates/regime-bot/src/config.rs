//! Application configuration.

use crate::error::{AppError, AppResult};
use regime_core::TradingMode;
use regime_feed::FeedConfig;
use regime_monitor::{MonitorConfig, Thresholds};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "REGIME_CONFIG";

/// Config file used when neither the CLI nor the environment names one.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Main application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Seconds between mode evaluations in `run`. Default: 60.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Mode the switcher starts in. Default: conservative.
    #[serde(default)]
    pub initial_mode: TradingMode,

    /// Log the Prometheus text exposition after each tick.
    #[serde(default)]
    pub metrics_dump: bool,

    /// Upstream endpoints and timeouts.
    #[serde(default)]
    pub feed: FeedConfig,

    /// Cache, history and decision policy.
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Thresholds for switching into bull.
    #[serde(default = "Thresholds::bull_default")]
    pub bull: Thresholds,

    /// Thresholds for switching into conservative.
    #[serde(default = "Thresholds::conservative_default")]
    pub conservative: Thresholds,
}

fn default_poll_interval_secs() -> u64 {
    60
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            initial_mode: TradingMode::default(),
            metrics_dump: false,
            feed: FeedConfig::default(),
            monitor: MonitorConfig::default(),
            bull: Thresholds::bull_default(),
            conservative: Thresholds::conservative_default(),
        }
    }
}

impl AppConfig {
    /// Load configuration, resolving the path from `path`, then
    /// `REGIME_CONFIG`, then `config/default.toml`.
    ///
    /// A missing file yields defaults.
    pub fn load(path: Option<&str>) -> AppResult<Self> {
        let config_path = path
            .map(str::to_string)
            .or_else(|| std::env::var(CONFIG_ENV).ok())
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

        let config = if Path::new(&config_path).exists() {
            tracing::info!(path = %config_path, "Loading configuration");
            Self::from_file(&config_path)?
        } else {
            tracing::warn!(path = %config_path, "Config file not found, using defaults");
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;
        Self::from_toml(&content)
    }

    /// Parse from TOML text.
    pub fn from_toml(content: &str) -> AppResult<Self> {
        toml::from_str(content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> AppResult<()> {
        if self.poll_interval_secs == 0 {
            return Err(AppError::Config(
                "poll_interval_secs must be positive".to_string(),
            ));
        }
        self.monitor.validate().map_err(AppError::Config)?;
        self.bull
            .validate()
            .map_err(|e| AppError::Config(format!("bull: {e}")))?;
        self.conservative
            .validate()
            .map_err(|e| AppError::Config(format!("conservative: {e}")))?;
        if self.conservative.rsi > self.bull.rsi {
            return Err(AppError::Config(format!(
                "conservative rsi threshold ({}) must not exceed bull rsi threshold ({})",
                self.conservative.rsi, self.bull.rsi
            )));
        }
        Ok(())
    }
}
