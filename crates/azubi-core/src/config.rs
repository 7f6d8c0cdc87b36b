//! Client configuration.
//!
//! Resolution order: built-in defaults, then `~/.config/azubiheft/config.toml`
//! when present, then environment variables. Credentials are never read from
//! or written to this file.
//!
//! ```toml
//! base_url = "https://www.azubiheft.de"
//! user_agent = "Mozilla/5.0 (X11; Linux x86_64)"
//! ```

use crate::error::{AzubiError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "https://www.azubiheft.de";

pub const ENV_BASE_URL: &str = "AZUBIHEFT_BASE_URL";
pub const ENV_USER_AGENT: &str = "AZUBIHEFT_USER_AGENT";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Scheme and host of the site, without trailing slash.
    pub base_url: String,
    /// Overrides the HTTP client's default user agent.
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: None,
        }
    }
}

impl ClientConfig {
    /// Path of the per-user config file (e.g. `~/.config/azubiheft/config.toml`).
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("azubiheft").join("config.toml"))
            .ok_or_else(|| AzubiError::config("Cannot find config directory"))
    }

    /// Loads the per-user file if it exists and applies environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        let config = if path.exists() {
            Self::load_from_path(&path)?
        } else {
            tracing::debug!("No config file at {:?}, using defaults", path);
            Self::default()
        };
        Ok(config.with_env_overrides())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = toml::from_str(content)?;
        config.validated()
    }

    /// Applies `AZUBIHEFT_BASE_URL` and `AZUBIHEFT_USER_AGENT`.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(base_url) = std::env::var(ENV_BASE_URL) {
            if !base_url.trim().is_empty() {
                self.base_url = base_url;
            }
        }
        if let Ok(user_agent) = std::env::var(ENV_USER_AGENT) {
            if !user_agent.trim().is_empty() {
                self.user_agent = Some(user_agent);
            }
        }
        self.normalized()
    }

    fn validated(self) -> Result<Self> {
        let config = self.normalized();
        if !(config.base_url.starts_with("http://") || config.base_url.starts_with("https://")) {
            return Err(AzubiError::config(format!(
                "base_url must start with http:// or https://, got '{}'",
                config.base_url
            )));
        }
        Ok(config)
    }

    fn normalized(mut self) -> Self {
        let trimmed = self.base_url.trim().trim_end_matches('/').to_string();
        self.base_url = trimmed;
        self
    }
}
