//! Client configuration
//!
//! Config file: $WEBTRDP_CONFIG, ~/.config/webtrdp/config.toml or
//! /etc/webtrdp/config.toml. Environment variables override the file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default backend address (the backend listens on 8080 unless told otherwise)
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8080";

/// Default host identity sent with config loads
pub const DEFAULT_HOST_NAME: &str = "localhost";

/// Default transport connect timeout
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5000;

pub const ENV_CONFIG_FILE: &str = "WEBTRDP_CONFIG";
pub const ENV_BACKEND_URL: &str = "WEBTRDP_BACKEND_URL";
pub const ENV_HOST_NAME: &str = "TRDP_HOST_NAME";
pub const ENV_XML_PATH: &str = "TRDP_XML_PATH";

/// Where the backend lives and how to reach it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_backend_url")]
    pub url: String,

    /// Transport-level connect bound; operations have no timeout of their own
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
        }
    }
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

fn default_connect_timeout_ms() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_MS
}

fn default_host_name() -> String {
    DEFAULT_HOST_NAME.to_string()
}

/// Initial session values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_host_name")]
    pub host_name: String,

    /// Pre-selected configuration path; empty lets the catalog pick
    #[serde(default)]
    pub config_path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            host_name: default_host_name(),
            config_path: String::new(),
        }
    }
}

/// Interactive monitor settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Poll telemetry on a timer in addition to manual refresh
    #[serde(default)]
    pub auto_refresh_secs: Option<u64>,

    /// Drop telemetry responses that were overtaken by a newer request
    #[serde(default)]
    pub discard_stale_snapshots: bool,
}

/// Main webTRDP client configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub monitor: MonitorConfig,
}

impl ClientConfig {
    /// User config path: ~/.config/webtrdp/config.toml
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("webtrdp").join("config.toml"))
    }

    /// System config path: /etc/webtrdp/config.toml
    pub fn system_config_path() -> PathBuf {
        PathBuf::from("/etc/webtrdp/config.toml")
    }

    /// Load configuration, then apply environment overrides.
    ///
    /// Priority:
    /// 1. $WEBTRDP_CONFIG (must exist when set)
    /// 2. User config
    /// 3. System config
    /// 4. Defaults
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var(ENV_CONFIG_FILE) {
            Ok(path) if !path.is_empty() => Self::from_file(Path::new(&path))?,
            _ => Self::load_first_existing()?,
        };
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    fn load_first_existing() -> Result<Self> {
        if let Some(user_path) = Self::user_config_path() {
            if user_path.exists() {
                return Self::from_file(&user_path);
            }
        }

        let system_path = Self::system_config_path();
        if system_path.exists() {
            return Self::from_file(&system_path);
        }

        Ok(Self::default())
    }

    /// Parse one config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: ClientConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::debug!("Loaded client config from {}", path.display());
        Ok(config)
    }

    /// Apply overrides from a variable lookup (std::env in production)
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty(ENV_BACKEND_URL) {
            self.backend.url = url;
        }
        if let Some(host) = non_empty(ENV_HOST_NAME) {
            self.session.host_name = host;
        }
        if let Some(path) = non_empty(ENV_XML_PATH) {
            self.session.config_path = path;
        }
    }
}
