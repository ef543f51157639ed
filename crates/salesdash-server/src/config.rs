//! Configuration system for the dashboard server
//!
//! Loads configuration from:
//! 1. config.yaml - operational settings (port, data files, default dates, logging)
//! 2. .env file - local overrides
//!
//! Environment variables always override config.yaml values.

use chrono::NaiveDate;
use salesdash_data::{DataSources, DateRange};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::logging::{LogFormat, LogOutput};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid value for {var}: {value}")]
    InvalidEnvVar { var: String, value: String },
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Sidebar defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub default_start: NaiveDate,
    pub default_end: NaiveDate,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let range = DateRange::default();
        Self {
            default_start: range.start,
            default_end: range.end,
        }
    }
}

impl DashboardConfig {
    pub fn default_range(&self) -> DateRange {
        DateRange::new(self.default_start, self.default_end)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error) or module-specific
    pub level: String,

    /// Output format: pretty, json, compact
    pub format: LogFormat,

    /// Output destination: stdout, file, both
    pub output: LogOutput,

    /// Directory for log files
    pub directory: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            output: LogOutput::Stdout,
            directory: "./logs".to_string(),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub data: DataSources,
    pub dashboard: DashboardConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from YAML file with environment variable overrides
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&contents)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Like [`Config::load`], but a missing file falls back to defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            return Self::load(path);
        }

        tracing::debug!(path = %path.as_ref().display(), "Config file not found, using defaults");
        let mut config = Config::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(host) = std::env::var("SALESDASH_SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("SALESDASH_SERVER_PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::InvalidEnvVar {
                var: "SALESDASH_SERVER_PORT".to_string(),
                value: port.clone(),
            })?;
        }

        if let Ok(dir) = std::env::var("SALESDASH_DATA_DIR") {
            self.data.directory = PathBuf::from(dir);
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("LOG_FORMAT") {
            self.logging.format = LogFormat::parse(&format);
        }
        if let Ok(output) = std::env::var("LOG_OUTPUT") {
            self.logging.output = LogOutput::parse(&output);
        }
        if let Ok(dir) = std::env::var("LOG_DIR") {
            self.logging.directory = dir;
        }

        Ok(())
    }
}
