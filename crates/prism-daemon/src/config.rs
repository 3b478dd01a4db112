//! Daemon configuration loading from file and environment variables.

use std::time::Duration;

use prism_db::DbRuntimeSettings;
use prism_filter::{FilterConfig, FilterConfigError};
use prism_queue::QueueSettings;
use serde::Deserialize;
use thiserror::Error;

/// Top-level daemon configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Recording queue settings.
    #[serde(default)]
    pub queue: QueueConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Source and block filters applied before records are queued.
    #[serde(default)]
    pub filters: FilterConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,

    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    #[serde(default = "default_pool_max_size")]
    pub pool_max_size: u32,
}

/// Recording queue configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct QueueConfig {
    /// Largest number of records written per transaction.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// How often a partial batch is flushed.
    #[serde(default = "default_flush_interval_ms")]
    pub flush_interval_ms: u64,

    /// Undrained records allowed before new ones are dropped (0 = unlimited).
    #[serde(default = "default_max_pending")]
    pub max_pending: usize,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "prism_queue=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_db_path() -> String {
    "prism.db".to_string()
}

fn default_busy_timeout_ms() -> u64 {
    DbRuntimeSettings::default().busy_timeout_ms
}

fn default_pool_max_size() -> u32 {
    DbRuntimeSettings::default().pool_max_size
}

fn default_batch_size() -> usize {
    QueueSettings::default().batch_size
}

fn default_flush_interval_ms() -> u64 {
    QueueSettings::default().flush_interval.as_millis() as u64
}

fn default_max_pending() -> usize {
    QueueSettings::default().max_pending
}

fn default_max_retries() -> u32 {
    QueueSettings::default().max_retries
}

fn default_retry_backoff_ms() -> u64 {
    QueueSettings::default().retry_backoff.as_millis() as u64
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
            pool_max_size: default_pool_max_size(),
        }
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            flush_interval_ms: default_flush_interval_ms(),
            max_pending: default_max_pending(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
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
    pub fn runtime_settings(&self) -> DbRuntimeSettings {
        DbRuntimeSettings {
            busy_timeout_ms: self.busy_timeout_ms,
            pool_max_size: self.pool_max_size,
        }
    }
}

impl QueueConfig {
    pub fn settings(&self) -> QueueSettings {
        QueueSettings {
            batch_size: self.batch_size,
            flush_interval: Duration::from_millis(self.flush_interval_ms),
            max_pending: self.max_pending,
            max_retries: self.max_retries,
            retry_backoff: Duration::from_millis(self.retry_backoff_ms),
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

    /// The `[filters]` table is malformed.
    #[error("invalid filter configuration: {0}")]
    Filters(#[from] FilterConfigError),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `PRISM_DB_PATH` overrides `database.path`
/// - `PRISM_LOG_LEVEL` overrides `logging.level`
/// - `PRISM_LOG_JSON` overrides `logging.json` (set to "true" to enable)
/// - `PRISM_QUEUE_BATCH_SIZE` overrides `queue.batch_size`
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

    apply_overrides(&mut config, |name| std::env::var(name).ok());
    Ok(config)
}

/// Applies `PRISM_*` overrides read through `var`.
pub(crate) fn apply_overrides(config: &mut Config, var: impl Fn(&str) -> Option<String>) {
    if let Some(db_path) = var("PRISM_DB_PATH") {
        config.database.path = db_path;
    }
    if let Some(level) = var("PRISM_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = var("PRISM_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }
    if let Some(batch_size) = var("PRISM_QUEUE_BATCH_SIZE") {
        match batch_size.parse() {
            Ok(parsed) => config.queue.batch_size = parsed,
            Err(_) => tracing::warn!(
                value = %batch_size,
                "ignoring invalid PRISM_QUEUE_BATCH_SIZE"
            ),
        }
    }
}
