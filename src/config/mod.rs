//! Configuration management
//!
//! This module handles loading and parsing configuration for the Jadwal service.
//! Configuration can be loaded from:
//! - config.yml file
//! - Environment variables (override file settings)
//!
//! Missing optional values are filled with sensible defaults.

use serde::{Deserialize, Serialize};

use crate::services::report::ReportColumns;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Wall-clock configuration
    #[serde(default)]
    pub clock: ClockConfig,
    /// Status evaluation configuration
    #[serde(default)]
    pub status: StatusConfig,
    /// Report export configuration
    #[serde(default)]
    pub report: ReportConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origin (the dashboard front end)
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "http://localhost:3000".to_string()
}

/// Where "now" comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClockMode {
    /// Host local time (default)
    #[default]
    Local,
    /// UTC shifted by `clock.utc_offset`
    Offset,
}

/// Wall-clock configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClockConfig {
    #[serde(default)]
    pub mode: ClockMode,
    /// Fixed UTC offset such as `+07:00`, used when mode is `offset`
    #[serde(default)]
    pub utc_offset: Option<String>,
}

/// What to do with a row whose date cannot be parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InvalidDatePolicy {
    /// Report the row as an error (default)
    #[default]
    Reject,
    /// Report the row as pending, with a warning
    Pending,
}

/// Status evaluation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusConfig {
    #[serde(default)]
    pub invalid_date_policy: InvalidDatePolicy,
    /// Maximum rows accepted by one batch or report request
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,
    /// Upper bound for the re-evaluation hint sent to the dashboard
    #[serde(default = "default_max_refresh_seconds")]
    pub max_refresh_seconds: i64,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            invalid_date_policy: InvalidDatePolicy::default(),
            max_batch_size: default_max_batch_size(),
            max_refresh_seconds: default_max_refresh_seconds(),
        }
    }
}

fn default_max_batch_size() -> usize {
    1000
}

fn default_max_refresh_seconds() -> i64 {
    3600
}

/// Report export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Prefix of the downloaded file name
    #[serde(default = "default_filename_prefix")]
    pub filename_prefix: String,
    /// Optional columns included when a request does not choose its own
    #[serde(default)]
    pub default_columns: ReportColumns,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            filename_prefix: default_filename_prefix(),
            default_columns: ReportColumns::default(),
        }
    }
}

fn default_filename_prefix() -> String {
    "laporan-sesi".to_string()
}

/// Error type for configuration parsing
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    ParseError {
        path: String,
        message: String,
    },
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

impl Config {
    /// Load configuration from file
    ///
    /// If the file doesn't exist, returns default configuration.
    /// If the file exists but is invalid YAML, returns an error with details.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::ParseError {
                path: path.display().to_string(),
                message: format_yaml_error(&e),
            }
        })?;

        Ok(config)
    }

    /// Load configuration from file with environment variable overrides
    ///
    /// Environment variables follow the pattern:
    /// - JADWAL_SERVER_HOST
    /// - JADWAL_SERVER_PORT
    /// - JADWAL_SERVER_CORS_ORIGIN
    /// - JADWAL_CLOCK_MODE
    /// - JADWAL_CLOCK_UTC_OFFSET
    /// - JADWAL_STATUS_INVALID_DATE_POLICY
    /// - JADWAL_STATUS_MAX_BATCH_SIZE
    /// - JADWAL_STATUS_MAX_REFRESH_SECONDS
    /// - JADWAL_REPORT_FILENAME_PREFIX
    pub fn load_with_env(path: &std::path::Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Check values that serde cannot check on its own
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.status.max_batch_size == 0 {
            return Err(ConfigError::ValidationError(
                "status.max_batch_size must be greater than zero".to_string(),
            ));
        }
        if self.status.max_refresh_seconds <= 0 {
            return Err(ConfigError::ValidationError(
                "status.max_refresh_seconds must be greater than zero".to_string(),
            ));
        }
        if self.report.filename_prefix.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "report.filename_prefix must not be empty".to_string(),
            ));
        }
        crate::services::clock::clock_from_config(&self.clock)?;
        Ok(())
    }

    /// Apply environment variable overrides to the configuration
    fn apply_env_overrides(&mut self) {
        // Server configuration
        if let Ok(host) = std::env::var("JADWAL_SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("JADWAL_SERVER_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                self.server.port = port;
            }
        }
        if let Ok(cors_origin) = std::env::var("JADWAL_SERVER_CORS_ORIGIN") {
            self.server.cors_origin = cors_origin;
        }

        // Clock configuration
        if let Ok(mode) = std::env::var("JADWAL_CLOCK_MODE") {
            match mode.to_lowercase().as_str() {
                "local" => self.clock.mode = ClockMode::Local,
                "offset" => self.clock.mode = ClockMode::Offset,
                _ => {} // Ignore invalid values
            }
        }
        if let Ok(offset) = std::env::var("JADWAL_CLOCK_UTC_OFFSET") {
            self.clock.utc_offset = Some(offset);
        }

        // Status configuration
        if let Ok(policy) = std::env::var("JADWAL_STATUS_INVALID_DATE_POLICY") {
            match policy.to_lowercase().as_str() {
                "reject" => self.status.invalid_date_policy = InvalidDatePolicy::Reject,
                "pending" => self.status.invalid_date_policy = InvalidDatePolicy::Pending,
                _ => {} // Ignore invalid values
            }
        }
        if let Ok(size) = std::env::var("JADWAL_STATUS_MAX_BATCH_SIZE") {
            if let Ok(size) = size.parse::<usize>() {
                self.status.max_batch_size = size;
            }
        }
        if let Ok(secs) = std::env::var("JADWAL_STATUS_MAX_REFRESH_SECONDS") {
            if let Ok(secs) = secs.parse::<i64>() {
                self.status.max_refresh_seconds = secs;
            }
        }

        // Report configuration
        if let Ok(prefix) = std::env::var("JADWAL_REPORT_FILENAME_PREFIX") {
            self.report.filename_prefix = prefix;
        }
    }
}

/// Format YAML parsing error with location and context
fn format_yaml_error(e: &serde_yaml::Error) -> String {
    if let Some(location) = e.location() {
        format!(
            "at line {}, column {}: {}",
            location.line(),
            location.column(),
            e
        )
    } else {
        e.to_string()
    }
}

// Shared mutex for all config tests that modify environment variables.
#[cfg(test)]
static CONFIG_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
const ENV_KEYS: &[&str] = &[
    "JADWAL_SERVER_HOST",
    "JADWAL_SERVER_PORT",
    "JADWAL_SERVER_CORS_ORIGIN",
    "JADWAL_CLOCK_MODE",
    "JADWAL_CLOCK_UTC_OFFSET",
    "JADWAL_STATUS_INVALID_DATE_POLICY",
    "JADWAL_STATUS_MAX_BATCH_SIZE",
    "JADWAL_STATUS_MAX_REFRESH_SECONDS",
    "JADWAL_REPORT_FILENAME_PREFIX",
];

#[cfg(test)]
fn clear_env() {
    for key in ENV_KEYS {
        std::env::remove_var(key);
    }
}
