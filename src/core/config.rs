use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::core::pace::DEFAULT_QUOTA_PER_DAY;
use crate::core::poller::PollSettings;

/// Environment variable that overrides the configured daily quota.
pub const QUOTA_PER_DAY_ENV: &str = "QPACE_QUOTA_PER_DAY";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
    #[error("Invalid QPACE_QUOTA_PER_DAY value: '{0}'")]
    InvalidEnv(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_format")]
    pub default_format: String,
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_format() -> String {
    "text".to_string()
}
fn default_color() -> String {
    "auto".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_format: default_format(),
            color: default_color(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuotaConfig {
    /// Standard daily allotment in percent; unset means 100/7
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_day: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_interval_ms() -> u64 {
    200
}
fn default_timeout_ms() -> u64 {
    5000
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl PollConfig {
    pub fn settings(&self) -> PollSettings {
        PollSettings::from_millis(self.interval_ms, self.timeout_ms)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub quota: QuotaConfig,
    #[serde(default)]
    pub poll: PollConfig,
}

impl AppConfig {
    /// Get the config file path, respecting XDG_CONFIG_HOME
    pub fn config_path() -> PathBuf {
        Self::config_path_in(std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from))
    }

    /// Config file path under `xdg_config_home`, or `~/.config` when unset.
    pub fn config_path_in(xdg_config_home: Option<PathBuf>) -> PathBuf {
        let config_dir = xdg_config_home.unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("~"))
                .join(".config")
        });
        config_dir.join("qpace").join("config.toml")
    }

    /// Load config from the default path, falling back to defaults if not found
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Serialize and write this config to the config file path.
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, self.to_toml()?)?;
        Ok(path)
    }

    /// Daily quota in effect: explicit override, then environment, then file, then 100/7.
    pub fn resolve_quota_per_day(&self, cli_override: Option<f64>) -> Result<f64, ConfigError> {
        self.resolve_quota_per_day_with(cli_override, std::env::var(QUOTA_PER_DAY_ENV).ok())
    }

    /// Same as [`resolve_quota_per_day`](Self::resolve_quota_per_day) with the
    /// environment value passed in.
    pub fn resolve_quota_per_day_with(
        &self,
        cli_override: Option<f64>,
        env_value: Option<String>,
    ) -> Result<f64, ConfigError> {
        if let Some(value) = cli_override {
            return Ok(value);
        }
        if let Some(raw) = env_value {
            return match raw.trim().parse::<f64>() {
                Ok(value) => Ok(value),
                Err(_) => Err(ConfigError::InvalidEnv(raw)),
            };
        }
        Ok(self.quota.per_day.unwrap_or(DEFAULT_QUOTA_PER_DAY))
    }

    /// Validate the config
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if !["text", "json"].contains(&self.settings.default_format.as_str()) {
            issues.push(format!(
                "Invalid default_format: '{}' (must be 'text' or 'json')",
                self.settings.default_format
            ));
        }
        if !["auto", "always", "never"].contains(&self.settings.color.as_str()) {
            issues.push(format!(
                "Invalid color: '{}' (must be 'auto', 'always', or 'never')",
                self.settings.color
            ));
        }
        if let Some(per_day) = self.quota.per_day {
            if !per_day.is_finite() || per_day <= 0.0 {
                issues.push(format!(
                    "Invalid quota.per_day: {} (must be a positive number)",
                    per_day
                ));
            }
        }
        if self.poll.interval_ms == 0 {
            issues.push("Invalid poll.interval_ms: 0 (must be at least 1)".to_string());
        }
        if self.poll.timeout_ms < self.poll.interval_ms {
            issues.push(format!(
                "poll.timeout_ms ({}) is shorter than poll.interval_ms ({})",
                self.poll.timeout_ms, self.poll.interval_ms
            ));
        }
        issues
    }
}
