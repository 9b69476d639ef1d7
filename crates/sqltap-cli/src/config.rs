//! CLI configuration loading from file and environment variables.

use serde::Deserialize;
use sqltap::{ErrorMode, OpenSettings};
use thiserror::Error;

/// Top-level CLI configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file, or `:memory:`.
    #[serde(default = "default_db_path")]
    pub path: String,

    /// How SQL failures are reported: `raise` or `silent`.
    #[serde(default)]
    pub error_mode: ErrorMode,

    /// Busy timeout for the connection, in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    /// Whether foreign key constraints are enforced.
    #[serde(default = "default_foreign_keys")]
    pub foreign_keys: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "sqltap=trace,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_db_path() -> String {
    ":memory:".to_string()
}

fn default_busy_timeout_ms() -> u64 {
    5_000
}

fn default_foreign_keys() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            error_mode: ErrorMode::default(),
            busy_timeout_ms: default_busy_timeout_ms(),
            foreign_keys: default_foreign_keys(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl DatabaseConfig {
    /// Connection settings derived from this section.
    pub fn open_settings(&self) -> OpenSettings {
        OpenSettings {
            error_mode: self.error_mode,
            busy_timeout_ms: self.busy_timeout_ms,
            foreign_keys: self.foreign_keys,
            ..OpenSettings::default()
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `SQLTAP_DB_PATH` overrides `database.path`
/// - `SQLTAP_ERROR_MODE` overrides `database.error_mode` (`raise` or `silent`)
/// - `SQLTAP_LOG_LEVEL` overrides `logging.level`
/// - `SQLTAP_LOG_JSON` overrides `logging.json` (set to "true" to enable)
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    apply_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

fn apply_overrides(config: &mut Config, var: impl Fn(&str) -> Option<String>) {
    if let Some(db_path) = var("SQLTAP_DB_PATH") {
        config.database.path = db_path;
    }
    if let Some(mode) = var("SQLTAP_ERROR_MODE") {
        match mode.parse() {
            Ok(parsed) => config.database.error_mode = parsed,
            Err(err) => tracing::warn!(%err, "ignoring SQLTAP_ERROR_MODE"),
        }
    }
    if let Some(level) = var("SQLTAP_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = var("SQLTAP_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }
}
