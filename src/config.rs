//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::{ClientConfig, DEFAULT_API_BASE};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout; unset waits indefinitely
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_API_BASE.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: None,
        }
    }
}

impl ApiConfig {
    /// Client settings for this backend
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            request_timeout: self
                .request_timeout_secs
                .filter(|s| *s > 0)
                .map(Duration::from_secs),
        }
    }
}

/// Dashboard behaviour and layout
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// History window used until the user picks another
    #[serde(default = "default_days")]
    pub default_days: u32,

    /// Windows offered by the period selector
    #[serde(default = "default_period_options")]
    pub period_options: Vec<u32>,

    #[serde(default = "default_chart_width")]
    pub chart_width: usize,

    #[serde(default = "default_chart_height")]
    pub chart_height: usize,
}

fn default_days() -> u32 {
    30
}

fn default_period_options() -> Vec<u32> {
    vec![7, 30, 90, 180, 365]
}

fn default_chart_width() -> usize {
    72
}

fn default_chart_height() -> usize {
    14
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_days: default_days(),
            period_options: default_period_options(),
            chart_width: default_chart_width(),
            chart_height: default_chart_height(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    ///
    /// Runs before logging is set up, so nothing is logged here; call
    /// [`LoadedConfig::report`] once a subscriber is installed.
    pub fn load_default() -> LoadedConfig {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("econdash").join("config.toml")),
            Some(PathBuf::from("/etc/econdash/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths, |key| std::env::var(key).ok())
    }

    /// First readable config among `paths`, with every failure on the way
    fn load_first(paths: &[PathBuf], var: impl Fn(&str) -> Option<String>) -> LoadedConfig {
        let mut errors = Vec::new();

        for path in paths.iter().filter(|p| p.exists()) {
            match Self::load(path) {
                Ok(mut config) => {
                    config.apply_overrides(&var);
                    return LoadedConfig {
                        config,
                        source: Some(path.clone()),
                        errors,
                    };
                }
                Err(e) => errors.push(e),
            }
        }

        let mut config = Config::default();
        config.apply_overrides(&var);
        LoadedConfig {
            config,
            source: None,
            errors,
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // API overrides
        if let Some(url) = var("ECONDASH_API_URL") {
            self.api.base_url = url;
        }
        if let Some(secs) = var("ECONDASH_TIMEOUT_SECS") {
            if let Ok(s) = secs.parse() {
                self.api.request_timeout_secs = Some(s);
            }
        }

        // Dashboard overrides
        if let Some(days) = var("ECONDASH_DEFAULT_DAYS") {
            match days.parse() {
                Ok(d) if d > 0 => self.dashboard.default_days = d,
                _ => tracing::warn!("Ignoring invalid ECONDASH_DEFAULT_DAYS: {}", days),
            }
        }

        // Logging overrides
        if let Some(level) = var("ECONDASH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("ECONDASH_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Result of searching the default config locations
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: Config,
    /// File the config came from; `None` means defaults plus environment
    pub source: Option<PathBuf>,
    /// Config files that exist but could not be loaded
    pub errors: Vec<ConfigError>,
}

impl LoadedConfig {
    /// Log where the config came from and every file that was skipped
    pub fn report(&self) {
        for e in &self.errors {
            tracing::warn!("{}; skipping", e);
        }
        match &self.source {
            Some(path) => tracing::info!("Loaded config from {:?}", path),
            None => tracing::info!("Using default config with environment overrides"),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# econdash Configuration
#
# Environment variables override these settings:
# - ECONDASH_API_URL
# - ECONDASH_TIMEOUT_SECS
# - ECONDASH_DEFAULT_DAYS
# - ECONDASH_LOG_LEVEL
# - ECONDASH_LOG_FORMAT

[api]
# Indicators backend, including the /api prefix
base_url = "http://localhost:5000/api"

# Request timeout in seconds (unset = no timeout)
# request_timeout_secs = 30

[dashboard]
# History window shown until another period is picked
default_days = 30

# Periods offered by the selector (days)
period_options = [7, 30, 90, 180, 365]

# Chart plot area in characters
chart_width = 72
chart_height = 14

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
