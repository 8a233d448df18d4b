use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_URL: &str = "http://127.0.0.1:8081";
pub const DEFAULT_USERNAME: &str = "admin";
pub const DEFAULT_PASSWORD: &str = "admin123";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Get the config directory path
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("nexusctl"))
}

/// Server connection settings.
///
/// Resolution order: CLI flags (and their `NEXUSCTL_*` environment
/// variables, handled by the flag parser) override the config file, which
/// overrides the stock-server defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default = "default_password")]
    pub password: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_url() -> String {
    DEFAULT_URL.to_string()
}

fn default_username() -> String {
    DEFAULT_USERNAME.to_string()
}

fn default_password() -> String {
    DEFAULT_PASSWORD.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            url: default_url(),
            username: default_username(),
            password: default_password(),
            timeout_secs: default_timeout(),
        }
    }
}

impl ServerConfig {
    /// Load config.json, falling back to defaults when it does not exist.
    pub fn load() -> Result<Self> {
        let path = config_dir()?.join("config.json");
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(ServerConfig::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid config format in {}", path.display()))
    }

    /// Save config.json
    pub fn save(&self) -> Result<()> {
        let dir = config_dir()?;
        fs::create_dir_all(&dir)?;
        let path = dir.join("config.json");
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Apply flag/environment overrides on top of the loaded values.
    pub fn with_overrides(
        mut self,
        url: Option<String>,
        username: Option<String>,
        password: Option<String>,
        timeout_secs: Option<u64>,
    ) -> Self {
        if let Some(url) = url {
            self.url = url;
        }
        if let Some(username) = username {
            self.username = username;
        }
        if let Some(password) = password {
            self.password = password;
        }
        if let Some(timeout) = timeout_secs {
            self.timeout_secs = timeout;
        }
        self
    }
}
