//! Configuration loader
//!
//! Builds a [`Config`] for the availability engine and reminder scheduler.
//! `SLOTWISE_*` variables win when the required availability limits are
//! set; otherwise the first config file found is read, JSON or TOML by
//! extension.
//!
//! ## Environment Variables
//! - `SLOTWISE_MAX_ENTITIES`: Most entities a single query may name (required)
//! - `SLOTWISE_MAX_RANGE_DAYS`: Longest query range in days (required)
//! - `SLOTWISE_LOOKUP_TIMEOUT_MS`: Repository deadline; `off` disables it
//! - `SLOTWISE_REMINDERS_ENABLED`: Whether reminders are scheduled (true/false)
//! - `SLOTWISE_REMINDER_JOB_TIMEOUT_SECS`: Deadline for one reminder dispatch
//! - `SLOTWISE_SCHEDULER_START_TIMEOUT_SECS`: Deadline for scheduler start
//! - `SLOTWISE_SCHEDULER_STOP_TIMEOUT_SECS`: Deadline for scheduler shutdown
//! - `SLOTWISE_LOG_LEVEL`: Default log filter
//! - `SLOTWISE_LOG_JSON`: Emit JSON log lines (true/false)
//!
//! ## File Locations
//! `config.{json,toml}` then `slotwise.{json,toml}` in each of the working
//! directory, its parent and grandparent, then the same three levels around
//! the executable.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use slotwise_domain::{
    AvailabilityConfig, Config, LoggingConfig, ReminderConfig, Result, SlotwiseError,
};

const CONFIG_FILE_NAMES: [&str; 4] =
    ["config.json", "config.toml", "slotwise.json", "slotwise.toml"];

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `SlotwiseError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Like [`load`], but falls back to built-in defaults when neither the
/// environment nor any probed file provides a configuration.
///
/// A config file that exists but cannot be parsed is still an error.
pub fn load_or_default() -> Result<Config> {
    if let Ok(config) = load_from_env() {
        tracing::info!("Configuration loaded from environment variables");
        return Ok(config);
    }

    match probe_config_paths() {
        Some(path) => load_from_file(Some(path)),
        None => {
            tracing::warn!("No configuration found, using defaults");
            Ok(Config::default())
        }
    }
}

/// Load configuration from environment variables
///
/// The two availability limits are required; everything else falls back to
/// its default when unset.
///
/// # Errors
/// Returns `SlotwiseError::Config` if required variables are missing
/// or any variable has an invalid value.
pub fn load_from_env() -> Result<Config> {
    let max_entities = parse_var::<usize>(&env_var("SLOTWISE_MAX_ENTITIES")?, "max entities")?;
    let max_range_days =
        parse_var::<i64>(&env_var("SLOTWISE_MAX_RANGE_DAYS")?, "max range days")?;

    let defaults = Config::default();

    let lookup_timeout_ms = match std::env::var("SLOTWISE_LOOKUP_TIMEOUT_MS").ok() {
        None => defaults.availability.lookup_timeout_ms,
        Some(value) if is_off(&value) => None,
        Some(value) => Some(parse_var::<u64>(&value, "lookup timeout")?),
    };

    let reminders = ReminderConfig {
        enabled: env_bool("SLOTWISE_REMINDERS_ENABLED", defaults.reminders.enabled),
        job_timeout_secs: env_parse(
            "SLOTWISE_REMINDER_JOB_TIMEOUT_SECS",
            "reminder job timeout",
            defaults.reminders.job_timeout_secs,
        )?,
        start_timeout_secs: env_parse(
            "SLOTWISE_SCHEDULER_START_TIMEOUT_SECS",
            "scheduler start timeout",
            defaults.reminders.start_timeout_secs,
        )?,
        stop_timeout_secs: env_parse(
            "SLOTWISE_SCHEDULER_STOP_TIMEOUT_SECS",
            "scheduler stop timeout",
            defaults.reminders.stop_timeout_secs,
        )?,
    };

    let logging = LoggingConfig {
        level: std::env::var("SLOTWISE_LOG_LEVEL").unwrap_or(defaults.logging.level),
        json: env_bool("SLOTWISE_LOG_JSON", defaults.logging.json),
    };

    let config = Config {
        availability: AvailabilityConfig { lookup_timeout_ms, max_entities, max_range_days },
        reminders,
        logging,
    };
    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `SlotwiseError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(SlotwiseError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            SlotwiseError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| SlotwiseError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    let config: Config = match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| SlotwiseError::Config(format!("Invalid TOML format: {}", e)))?,
        "json" => serde_json::from_str(contents)
            .map_err(|e| SlotwiseError::Config(format!("Invalid JSON format: {}", e)))?,
        _ => {
            return Err(SlotwiseError::Config(format!(
                "Unsupported config format: {}",
                extension
            )))
        }
    };
    config.validate()?;
    Ok(config)
}

/// Probe multiple paths for configuration files
///
/// Searches the current working directory, its two parents, and the same
/// three levels around the executable. Returns the first file that exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }
    if let Some(exe_dir) = std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf))
    {
        roots.push(exe_dir);
    }

    roots
        .iter()
        .flat_map(|root| [root.clone(), root.join(".."), root.join("../..")])
        .flat_map(|dir| CONFIG_FILE_NAMES.map(|name| dir.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        SlotwiseError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Parse an optional environment variable, using `default` when unset.
fn env_parse<T: FromStr>(key: &str, what: &str, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(value) => parse_var(&value, what),
        Err(_) => Ok(default),
    }
}

fn parse_var<T: FromStr>(value: &str, what: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse::<T>().map_err(|e| SlotwiseError::Config(format!("Invalid {}: {}", what, e)))
}

fn is_off(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "off" | "none" | "disabled")
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
