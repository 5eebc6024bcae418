//! Configuration management
//!
//! This module handles loading and managing configuration from:
//! - Command-line arguments
//! - Configuration files (TOML)
//! - Defaults

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub layout: LayoutConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Layout hints handed to the consuming layout engine.
///
/// Rule start and stop nodes are anchored at these coordinates; every other
/// node shares the default pair and is left for the engine to refine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_start_x")]
    pub start_x: f64,

    #[serde(default = "default_start_y")]
    pub start_y: f64,

    #[serde(default = "default_stop_x")]
    pub stop_x: f64,

    #[serde(default = "default_stop_y")]
    pub stop_y: f64,

    #[serde(default = "default_free_x")]
    pub default_x: f64,

    #[serde(default = "default_free_y")]
    pub default_y: f64,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Pretty-print JSON output
    #[serde(default = "default_pretty")]
    pub pretty: bool,

    /// Directory for exported files
    pub directory: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path
    pub file: Option<PathBuf>,
}

// Default value functions

fn default_start_x() -> f64 {
    0.0
}

fn default_start_y() -> f64 {
    700.0
}

fn default_stop_x() -> f64 {
    1000.0
}

fn default_stop_y() -> f64 {
    700.0
}

fn default_free_x() -> f64 {
    500.0
}

fn default_free_y() -> f64 {
    600.0
}

fn default_pretty() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

// Default implementations

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            start_x: default_start_x(),
            start_y: default_start_y(),
            stop_x: default_stop_x(),
            stop_y: default_stop_y(),
            default_x: default_free_x(),
            default_y: default_free_y(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: default_pretty(),
            directory: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let contents = std::fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("Failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config file {:?}: {}", path, e)))?;

        Ok(config)
    }

    /// Load configuration from default locations
    ///
    /// Searches in order:
    /// 1. ./config.toml
    /// 2. ~/.atn-viz/config.toml
    /// 3. /etc/atn-viz/config.toml
    pub fn load() -> Result<Self> {
        let paths = vec![
            PathBuf::from("config.toml"),
            dirs::home_dir()
                .map(|h| h.join(".atn-viz").join("config.toml"))
                .unwrap_or_else(|| PathBuf::from("/dev/null")),
            PathBuf::from("/etc/atn-viz/config.toml"),
        ];

        for path in paths {
            if path.exists() {
                tracing::info!("Loading config from {:?}", path);
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.layout.start_x, 0.0);
        assert_eq!(config.layout.stop_x, 1000.0);
        assert_eq!(config.layout.default_y, 600.0);
        assert!(config.output.pretty);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_toml_config() {
        let toml = r#"
[layout]
start_x = 50.0
stop_x = 900.0

[output]
pretty = false

[logging]
level = "debug"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.layout.start_x, 50.0);
        assert_eq!(config.layout.stop_x, 900.0);
        // unset keys keep their defaults
        assert_eq!(config.layout.start_y, 700.0);
        assert!(!config.output.pretty);
        assert_eq!(config.logging.level, "debug");
    }
}
