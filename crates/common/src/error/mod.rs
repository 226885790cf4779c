//! Error classification shared by every Slotwise error type
//!
//! Module-specific errors stay module-specific (`AvailabilityError`,
//! `SchedulerError`, ...) but all of them implement [`ErrorClassification`]
//! so callers can make retry and alerting decisions without matching on
//! concrete variants.
//!
//! | Level | Use Case | Examples |
//! |-------|----------|----------|
//! | **Info** | Expected business outcomes | Entity not found, no availability |
//! | **Warning** | Degraded but operational | Lookup timeouts, transient backend failures |
//! | **Error** | Failure requiring attention | Invalid queries, bad schedules, config errors |
//! | **Critical** | System integrity at risk | Internal invariant violations |
//!
//! ## Using ErrorClassification for retry logic
//!
//! ```rust,ignore
//! use slotwise_common::error::ErrorClassification;
//!
//! match resolver.find_common_free_slots(&query).await {
//!     Err(err) if err.is_retryable() => schedule_retry(err.retry_after()),
//!     other => other,
//! }
//! ```

use std::fmt;
use std::time::Duration;

/// Standard interface for classifying errors by their characteristics
pub trait ErrorClassification {
    /// Check if this error is retryable
    ///
    /// Retryable errors are transient issues that may succeed if attempted
    /// again, such as collaborator timeouts or temporary unavailability.
    fn is_retryable(&self) -> bool;

    /// Get the error severity level
    ///
    /// Used for monitoring, alerting, and logging decisions.
    fn severity(&self) -> ErrorSeverity;

    /// Check if this is a critical error requiring immediate attention
    fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }

    /// Get the suggested retry delay if applicable
    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

/// Error severity levels for monitoring and alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    /// Informational, typically an expected outcome
    Info,
    /// Warning, should be monitored but not critical
    Warning,
    /// Error, requires attention and action
    Error,
    /// Critical, immediate action required
    Critical,
}

impl ErrorSeverity {
    /// Stable lowercase label for structured log fields
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}
