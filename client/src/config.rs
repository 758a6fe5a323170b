//! Dashboard configuration

use anyhow::{Result, ensure};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Dashboard configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardConfig {
    /// Control API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Status polling configuration
    #[serde(default)]
    pub polling: PollingConfig,

    /// Session timer configuration
    #[serde(default)]
    pub session: SessionConfig,

    /// Log feed configuration
    #[serde(default)]
    pub log: LogConfig,
}

impl DashboardConfig {
    /// Load configuration from file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: DashboardConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from file if it exists, otherwise fall back to defaults
    pub async fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if tokio::fs::try_exists(path).await? {
            Self::load(path).await
        } else {
            tracing::info!("No configuration at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Reject values that would stall the timers
    pub fn validate(&self) -> Result<()> {
        ensure!(!self.api.base_url.is_empty(), "api.base_url must not be empty");
        ensure!(
            self.api.request_timeout > 0,
            "api.request_timeout must be positive"
        );
        ensure!(
            self.polling.status_interval > 0,
            "polling.status_interval must be positive"
        );
        ensure!(
            self.session.tick_interval_ms > 0,
            "session.tick_interval_ms must be positive"
        );
        ensure!(
            self.session.keep_alive_every > 0,
            "session.keep_alive_every must be positive"
        );
        if let Some(max) = self.log.max_entries {
            ensure!(max > 0, "log.max_entries must be positive when set");
        }
        Ok(())
    }
}

/// Control API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Server root, e.g. `http://127.0.0.1:5000`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (seconds)
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout: default_request_timeout(),
        }
    }
}

/// Status polling configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    /// Interval between scheduled status polls (seconds)
    #[serde(default = "default_status_interval")]
    pub status_interval: u64,
}

fn default_status_interval() -> u64 {
    10
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.status_interval)
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            status_interval: default_status_interval(),
        }
    }
}

/// Session timer configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Length of one session timer tick (milliseconds)
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Send a keep-alive every N ticks
    #[serde(default = "default_keep_alive_every")]
    pub keep_alive_every: u64,

    /// How long to wait for the farewell keep-alive on shutdown (milliseconds)
    #[serde(default = "default_unload_grace_ms")]
    pub unload_grace_ms: u64,
}

fn default_tick_interval_ms() -> u64 {
    1000
}

fn default_keep_alive_every() -> u64 {
    5
}

fn default_unload_grace_ms() -> u64 {
    2000
}

impl SessionConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn unload_grace(&self) -> Duration {
        Duration::from_millis(self.unload_grace_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            keep_alive_every: default_keep_alive_every(),
            unload_grace_ms: default_unload_grace_ms(),
        }
    }
}

/// Log feed configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogConfig {
    /// Oldest entries are dropped past this many (unbounded when absent)
    #[serde(default)]
    pub max_entries: Option<usize>,
}
