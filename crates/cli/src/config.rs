// CLI configuration at `~/.devbuilder/config.toml`.
//
// The `DEVBUILDER_URL` environment variable overrides the configured
// server URL without touching the file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use devbuilder_client::{DevstateClient, DevstateError};

pub const URL_ENV_VAR: &str = "DEVBUILDER_URL";
const DEFAULT_URL: &str = "http://127.0.0.1:8080";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Path to the config file: `~/.devbuilder/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".devbuilder").join("config.toml"))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CliConfig {
    /// Devstate server base URL.
    pub url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self { url: DEFAULT_URL.into(), timeout_secs: DEFAULT_TIMEOUT_SECS }
    }
}

impl CliConfig {
    /// Load from `~/.devbuilder/config.toml`. Returns defaults if the
    /// file doesn't exist or can't be parsed, then applies the
    /// `DEVBUILDER_URL` override.
    pub fn load() -> Self {
        let mut config =
            config_path().and_then(|p| Self::load_from(&p).ok()).unwrap_or_default();
        if let Ok(url) = std::env::var(URL_ENV_VAR) {
            if !url.is_empty() {
                config.url = url;
            }
        }
        config
    }

    /// Load from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        toml::from_str(&contents).map_err(ConfigError::Parse)
    }

    /// Save to a specific path (creates parent directories).
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        let contents = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        std::fs::write(path, contents).map_err(ConfigError::Io)
    }

    /// Build a gateway client for the configured server.
    pub fn client(&self) -> Result<DevstateClient, DevstateError> {
        DevstateClient::with_timeout(&self.url, Duration::from_secs(self.timeout_secs))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(std::io::Error),
    #[error("config parse error: {0}")]
    Parse(toml::de::Error),
    #[error("config serialize error: {0}")]
    Serialize(toml::ser::Error),
}
