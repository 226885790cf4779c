//! Application constants
//!
//! Centralized location for all domain-level defaults used throughout the
//! application.

// Availability query limits
/// Entities per availability query
pub const DEFAULT_MAX_ENTITIES: usize = 32;
/// Longest availability range, in days
pub const DEFAULT_MAX_RANGE_DAYS: i64 = 92;
/// Repository lookup deadline
pub const DEFAULT_LOOKUP_TIMEOUT_MS: u64 = 5_000;
/// Upper bound accepted for `max_range_days` (about 100 years)
pub const MAX_RANGE_DAYS_LIMIT: i64 = 36_600;

// Reminder scheduler timeouts
/// Deadline for one reminder dispatch
pub const DEFAULT_REMINDER_JOB_TIMEOUT_SECS: u64 = 30;
/// Deadline for starting the reminder scheduler
pub const DEFAULT_SCHEDULER_START_TIMEOUT_SECS: u64 = 5;
/// Deadline for stopping the reminder scheduler
pub const DEFAULT_SCHEDULER_STOP_TIMEOUT_SECS: u64 = 5;

// Logging
/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_LOG_LEVEL: &str = "info";
