//! Error types used throughout the application

use chrono::{DateTime, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Slotwise configuration and infrastructure code
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum SlotwiseError {
    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Input rejected at ingestion
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unexpected failure in a collaborator
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Slotwise operations
pub type Result<T> = std::result::Result<T, SlotwiseError>;

/// Rejected interval bounds (`start >= end`)
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Interval must satisfy start < end (start: {start}, end: {end})")]
pub struct IntervalError {
    /// Rejected start
    pub start: DateTime<Utc>,
    /// Rejected end
    pub end: DateTime<Utc>,
}

/// Invalid operating-hours data, rejected when a schedule is ingested
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// `open` is not before `close`
    #[error("Opening time {open} must be before closing time {close} on {weekday}")]
    InvalidHours { weekday: Weekday, open: NaiveTime, close: NaiveTime },

    /// Two entries for the same weekday
    #[error("More than one schedule entry for {0}")]
    DuplicateWeekday(Weekday),
}

/// Appointment rejected at ingestion
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppointmentError {
    /// `in_time` is not before `out_time`
    #[error("Appointment {id} has in_time {in_time} not before out_time {out_time}")]
    InvalidTimes { id: String, in_time: DateTime<Utc>, out_time: DateTime<Utc> },
}

/// Failure reported by a repository collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The identifier does not resolve to anything
    #[error("No record found for {0}")]
    NotFound(String),

    /// The entity exists but has no calendar source configured
    #[error("Entity {0} has no calendar configured")]
    NoCalendar(String),

    /// The backing store failed (network, database, ...)
    #[error("Lookup backend unavailable: {0}")]
    Unavailable(String),
}

/// Repeat kind that cannot be turned into a recurrence
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unsupported repeat kind: {0}")]
pub struct UnsupportedRepeatKind(pub String);

impl From<IntervalError> for SlotwiseError {
    fn from(err: IntervalError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl From<ScheduleError> for SlotwiseError {
    fn from(err: ScheduleError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl From<AppointmentError> for SlotwiseError {
    fn from(err: AppointmentError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl From<LookupError> for SlotwiseError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::NotFound(id) => Self::NotFound(id),
            other => Self::Internal(other.to_string()),
        }
    }
}
