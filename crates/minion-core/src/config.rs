//! Configuration system for the minion control layer.
//!
//! Resolution order: environment variables → config file → defaults.
//!
//! Config file location:
//!   1. $MINION_CONFIG (explicit override)
//!   2. $XDG_CONFIG_HOME/minion/config.toml
//!   3. ~/.config/minion/config.toml

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::endpoint::ApiUrl;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MinionConfig {
    pub server: ServerConfig,
    pub polling: PollIntervals,
    pub notifications: NotificationSettings,
    pub script: ScriptSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL every API path is resolved against.
    pub base_url: String,
}

/// Fixed waits between job status polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollIntervals {
    /// Wait after a poll that found the job `inactive`.
    pub inactive_interval_ms: u64,
    /// Wait after a poll that found the job `active`.
    pub active_interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    /// Auto-hide delay of request success toasts.
    pub success_hide_after_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptSettings {
    /// Form saved before a script is queued.
    pub form_selector: String,
    /// Page the form is POSTed to.
    pub page_path: String,
}

// ── Defaults ──────────────────────────────────────────────────────────────────

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: ApiUrl::default().base().to_string(),
        }
    }
}

impl Default for PollIntervals {
    fn default() -> Self {
        Self {
            inactive_interval_ms: 5000,
            active_interval_ms: 1000,
        }
    }
}

impl PollIntervals {
    pub fn inactive(&self) -> Duration {
        Duration::from_millis(self.inactive_interval_ms)
    }

    pub fn active(&self) -> Duration {
        Duration::from_millis(self.active_interval_ms)
    }
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            success_hide_after_ms: 7000,
        }
    }
}

impl Default for ScriptSettings {
    fn default() -> Self {
        Self {
            form_selector: "#editPluginForm".to_string(),
            page_path: "/config/plugins".to_string(),
        }
    }
}

// ── Path helpers ──────────────────────────────────────────────────────────────

fn config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
        .join("minion")
}

fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {0}: {1}")]
    ReadFailed(PathBuf, std::io::Error),
    #[error("failed to parse {0}: {1}")]
    ParseFailed(PathBuf, toml::de::Error),
    #[error("failed to write {0}: {1}")]
    WriteFailed(PathBuf, std::io::Error),
    #[error("failed to serialize: {0}")]
    SerializeFailed(toml::ser::Error),
}

// ── Loading ───────────────────────────────────────────────────────────────────

impl MinionConfig {
    /// Load config: env vars → file → defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::file_path();
        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            MinionConfig::default()
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadFailed(path.to_path_buf(), e))?;
        toml::from_str(&text).map_err(|e| ConfigError::ParseFailed(path.to_path_buf(), e))
    }

    /// Config file path.
    pub fn file_path() -> PathBuf {
        std::env::var("MINION_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| config_dir().join("config.toml"))
    }

    /// Write default config if none exists. Returns the path.
    pub fn write_default_if_missing() -> Result<PathBuf, ConfigError> {
        let path = Self::file_path();
        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| ConfigError::WriteFailed(path.clone(), e))?;
            }
            let text = toml::to_string_pretty(&MinionConfig::default())
                .map_err(ConfigError::SerializeFailed)?;
            std::fs::write(&path, text).map_err(|e| ConfigError::WriteFailed(path.clone(), e))?;
        }
        Ok(path)
    }

    pub fn api_url(&self) -> ApiUrl {
        ApiUrl::new(self.server.base_url.clone())
    }

    /// Apply MINION_* overrides. `lookup` is `std::env::var` outside tests.
    fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("MINION_SERVER__BASE_URL") {
            self.server.base_url = v;
        }
        if let Some(v) = lookup("MINION_POLLING__INACTIVE_INTERVAL_MS") {
            if let Ok(ms) = v.parse() {
                self.polling.inactive_interval_ms = ms;
            }
        }
        if let Some(v) = lookup("MINION_POLLING__ACTIVE_INTERVAL_MS") {
            if let Ok(ms) = v.parse() {
                self.polling.active_interval_ms = ms;
            }
        }
        if let Some(v) = lookup("MINION_SCRIPT__PAGE_PATH") {
            self.script.page_path = v;
        }
    }
}
