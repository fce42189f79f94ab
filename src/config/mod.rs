//! Configuration management for stylus.
//!
//! Handles the service endpoint, TUI theme, and event-loop tick rate.
//! Configuration is read once at startup and passed explicitly into the
//! layers that need it; nothing here is mutated after load.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::api::DEFAULT_ENDPOINT;
use crate::error::{Result, StylusError};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// GraphQL endpoint of the notebooks service.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// TUI theme name.
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Event-loop tick interval in milliseconds.
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_theme() -> String {
    "dark".to_string()
}

const fn default_tick_rate_ms() -> u64 {
    100
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            theme: default_theme(),
            tick_rate_ms: default_tick_rate_ms(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, falling back to
    /// defaults when no config file exists.
    pub fn load() -> Result<Self> {
        match default_config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            StylusError::io(format!("Failed to read config file: {}", path.display()), e)
        })?;

        toml::from_str(&content).map_err(|e| StylusError::Config {
            message: e.to_string(),
        })
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| StylusError::Config {
            message: e.to_string(),
        })?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StylusError::io(format!("Failed to create {}", parent.display()), e)
            })?;
        }

        std::fs::write(path, content)
            .map_err(|e| StylusError::io(format!("Failed to write {}", path.display()), e))
    }
}

/// Default configuration file path (`<config dir>/stylus/config.toml`).
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "stylus")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}
