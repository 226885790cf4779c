//! Configuration management

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_LOG_LEVEL, DEFAULT_LOOKUP_TIMEOUT_MS, DEFAULT_MAX_ENTITIES, DEFAULT_MAX_RANGE_DAYS,
    DEFAULT_REMINDER_JOB_TIMEOUT_SECS, DEFAULT_SCHEDULER_START_TIMEOUT_SECS,
    DEFAULT_SCHEDULER_STOP_TIMEOUT_SECS, MAX_RANGE_DAYS_LIMIT,
};
use crate::errors::{Result, SlotwiseError};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub availability: AvailabilityConfig,
    #[serde(default)]
    pub reminders: ReminderConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Reject values no query could be resolved with.
    ///
    /// # Errors
    /// `SlotwiseError::Config` naming the offending setting.
    pub fn validate(&self) -> Result<()> {
        self.availability.validate()
    }
}

/// Availability resolver limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvailabilityConfig {
    /// Deadline for repository lookups; `None` disables it
    pub lookup_timeout_ms: Option<u64>,
    /// Most entities one query may name
    pub max_entities: usize,
    /// Longest query range, in days
    pub max_range_days: i64,
}

impl AvailabilityConfig {
    /// Lookup deadline as a std duration
    pub fn lookup_timeout(&self) -> Option<Duration> {
        self.lookup_timeout_ms.map(Duration::from_millis)
    }

    /// Longest accepted query range. `None` when the day count does not fit
    /// a `TimeDelta`, which leaves the range unlimited.
    pub fn max_range(&self) -> Option<chrono::Duration> {
        chrono::TimeDelta::try_days(self.max_range_days)
    }

    /// # Errors
    /// `SlotwiseError::Config` when `max_entities` is zero or
    /// `max_range_days` is outside `1..=MAX_RANGE_DAYS_LIMIT`.
    pub fn validate(&self) -> Result<()> {
        if self.max_entities == 0 {
            return Err(SlotwiseError::Config("max_entities must be at least 1".to_string()));
        }
        if !(1..=MAX_RANGE_DAYS_LIMIT).contains(&self.max_range_days) {
            return Err(SlotwiseError::Config(format!(
                "max_range_days must be between 1 and {}, got {}",
                MAX_RANGE_DAYS_LIMIT, self.max_range_days
            )));
        }
        Ok(())
    }
}

impl Default for AvailabilityConfig {
    fn default() -> Self {
        Self {
            lookup_timeout_ms: Some(DEFAULT_LOOKUP_TIMEOUT_MS),
            max_entities: DEFAULT_MAX_ENTITIES,
            max_range_days: DEFAULT_MAX_RANGE_DAYS,
        }
    }
}

/// Reminder scheduler configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReminderConfig {
    /// Whether the scheduler may start
    pub enabled: bool,
    /// Deadline for one dispatch
    pub job_timeout_secs: u64,
    /// Deadline for scheduler start
    pub start_timeout_secs: u64,
    /// Deadline for scheduler shutdown
    pub stop_timeout_secs: u64,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            job_timeout_secs: DEFAULT_REMINDER_JOB_TIMEOUT_SECS,
            start_timeout_secs: DEFAULT_SCHEDULER_START_TIMEOUT_SECS,
            stop_timeout_secs: DEFAULT_SCHEDULER_STOP_TIMEOUT_SECS,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: DEFAULT_LOG_LEVEL.to_string(), json: false }
    }
}
