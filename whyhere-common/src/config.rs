//! Bootstrap configuration
//!
//! Settings sources, highest priority first:
//! 1. Command-line arguments (applied by the binaries)
//! 2. Environment variables (`WHYHERE_CONFIG`, `WHYHERE_API_BASE`)
//! 3. TOML configuration file
//! 4. Built-in defaults
//!
//! A missing configuration file is not an error: a warning is logged and
//! the built-in defaults apply. A file that exists but does not parse is.

use crate::profile::UserProfile;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable naming the TOML file
pub const CONFIG_ENV: &str = "WHYHERE_CONFIG";

/// Environment variable overriding `backend_url`
pub const API_BASE_ENV: &str = "WHYHERE_API_BASE";

/// Where entity records come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Built-in Atlanta streets
    Mock,
    /// `POST {backend_url}/data/pois`
    #[default]
    Backend,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Mock => f.write_str("mock"),
            DataSource::Backend => f.write_str("backend"),
        }
    }
}

impl FromStr for DataSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(DataSource::Mock),
            "backend" => Ok(DataSource::Backend),
            other => Err(Error::Config(format!(
                "unknown data source '{}' (expected mock or backend)",
                other
            ))),
        }
    }
}

/// Configuration loaded from `whyhere.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Base URL of the service answering `/data/pois`
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub data_source: DataSource,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Profile used until the client sends one
    #[serde(default)]
    pub profile: UserProfile,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_port() -> u16 {
    5730
}

fn default_backend_url() -> String {
    "http://localhost:5050".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            backend_url: default_backend_url(),
            request_timeout_secs: default_request_timeout_secs(),
            data_source: DataSource::default(),
            logging: LoggingConfig::default(),
            profile: UserProfile::default(),
        }
    }
}

impl TomlConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Resolve, read and apply environment overrides
    pub fn load(cli_path: Option<&Path>) -> Result<Self> {
        let mut config = match resolve_config_path(cli_path) {
            Some(path) if path.exists() => {
                let config = load_toml_config(&path)?;
                info!("Loaded configuration from {}", path.display());
                config
            }
            Some(path) => {
                warn!("Config file {} not found, using defaults", path.display());
                TomlConfig::default()
            }
            None => {
                warn!("No config file found, using defaults");
                TomlConfig::default()
            }
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(API_BASE_ENV) {
            if !url.trim().is_empty() {
                info!("Backend URL from {}: {}", API_BASE_ENV, url);
                self.backend_url = url;
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.request_timeout_secs == 0 {
            return Err(Error::Config("request_timeout_secs must be > 0".to_string()));
        }
        if self.backend_url.trim().is_empty() {
            return Err(Error::Config("backend_url must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Default per-user config file, `~/.config/whyhere/whyhere.toml` on Linux
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("whyhere").join("whyhere.toml"))
}

/// Pick the config file: CLI path, then `WHYHERE_CONFIG`, then the default
/// location if it exists
pub fn resolve_config_path(cli_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_path {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    default_config_path().filter(|path| path.exists())
}

/// Read and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
}
