//! Configuration loading and validation for the correlation server

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use structured_logger::config::LOG_LEVEL_ENV;
use structured_logger::{Level, LoggerConfig, SinkConfig};
use thiserror::Error;
use validator::{Validate, ValidationError};

/// Header carrying the correlation id when none is configured.
pub const DEFAULT_CORRELATION_HEADER: &str = "x-correlation-id";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(#[from] validator::ValidationErrors),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Validate for Config {
    fn validate(&self) -> Result<(), validator::ValidationErrors> {
        self.server.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerSettings {
    #[serde(default = "default_listen_addr")]
    #[validate(custom = "validate_listen_addr")]
    pub listen_addr: String,

    /// Inbound and outbound header holding the correlation id
    #[serde(default = "default_correlation_header")]
    #[validate(length(min = 1, max = 64), custom = "validate_header_name")]
    pub correlation_header: String,
}

/// Structured logging settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct LoggingSettings {
    /// error, warn, info, verbose or debug; `LOG_LEVEL` takes precedence
    pub level: Option<String>,

    #[validate(length(min = 1))]
    pub default_context: Option<String>,

    /// `stdout`, `stderr` or `file: <path>`
    #[serde(default, with = "serde_yaml::with::singleton_map")]
    pub sink: SinkConfig,
}

fn default_listen_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_correlation_header() -> String {
    DEFAULT_CORRELATION_HEADER.to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            correlation_header: default_correlation_header(),
        }
    }
}

// Custom validators

fn validate_listen_addr(addr: &str) -> Result<(), ValidationError> {
    addr.trim()
        .parse::<SocketAddr>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("listen_addr_invalid"))
}

fn validate_header_name(name: &str) -> Result<(), ValidationError> {
    let valid = !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    if !valid {
        return Err(ValidationError::new("header_name_invalid"));
    }
    Ok(())
}

// Configuration loading implementation

impl Config {
    /// Load configuration from default search paths
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_source().map(|(config, _)| config)
    }

    /// Load configuration, also returning the file it came from
    pub fn load_with_source() -> Result<(Self, Option<PathBuf>), ConfigError> {
        match Self::find_config_file() {
            Some(path) => Ok((Self::load_from_file(&path)?, Some(path))),
            None => Ok((Self::default(), None)),
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&contents)
    }

    /// Parse and validate configuration text
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut paths = vec![PathBuf::from("/etc/correlation-server/config.yaml")];

        if let Some(home_path) = Self::home_config_path() {
            paths.push(home_path);
        }

        paths.push(PathBuf::from("./correlation-server.yaml"));

        paths.into_iter().find(|p: &PathBuf| p.exists() && p.is_file())
    }

    /// Get home directory config path
    fn home_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config/correlation-server/config.yaml"))
    }

    /// Logger settings with `LOG_LEVEL` applied on top of the file
    ///
    /// An unrecognized `LOG_LEVEL` keeps the file's level and is handed back
    /// alongside the settings.
    pub fn to_logger_config(&self) -> (LoggerConfig, Option<common::Error>) {
        let raw = std::env::var(LOG_LEVEL_ENV).ok();
        self.resolve_logger_config(raw.as_deref())
    }

    /// Logger settings with an explicit level override
    pub fn resolve_logger_config(
        &self,
        level_override: Option<&str>,
    ) -> (LoggerConfig, Option<common::Error>) {
        let base = self.file_logger_config();
        match base.clone().try_with_level_override(level_override) {
            Ok(config) => (config, None),
            Err(e) => (base, Some(e)),
        }
    }

    /// Logger settings with an explicit level override, ignoring bad names
    pub fn logger_config_with(&self, level_override: Option<&str>) -> LoggerConfig {
        self.resolve_logger_config(level_override).0
    }

    fn file_logger_config(&self) -> LoggerConfig {
        let level = self
            .logging
            .level
            .as_deref()
            .map(Level::parse_or_default)
            .unwrap_or_default();

        let mut config = LoggerConfig::default()
            .with_level(level)
            .with_sink(self.logging.sink.clone());
        config.default_context = self.logging.default_context.clone();
        config
    }
}
