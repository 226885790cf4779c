//! Scheduler error types

use std::time::Duration;

use slotwise_common::{ErrorClassification, ErrorSeverity};
use slotwise_core::RecurrenceError;
use slotwise_domain::SlotwiseError;
use thiserror::Error;
use uuid::Uuid;

/// Scheduler-specific errors
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Scheduler is already running
    #[error("Scheduler already running")]
    AlreadyRunning,

    /// Scheduler is not running
    #[error("Scheduler not running")]
    NotRunning,

    /// Reminders are switched off in configuration
    #[error("Reminder scheduling is disabled")]
    Disabled,

    /// Failed to create scheduler
    #[error("Failed to create scheduler: {0}")]
    CreationFailed(String),

    /// Failed to start scheduler
    #[error("Failed to start scheduler: {0}")]
    StartFailed(String),

    /// Failed to stop scheduler
    #[error("Failed to stop scheduler: {0}")]
    StopFailed(String),

    /// Failed to register job
    #[error("Failed to register job: {0}")]
    JobRegistrationFailed(String),

    /// Failed to remove job
    #[error("Failed to remove job: {0}")]
    JobRemovalFailed(String),

    /// No reminder with this id is scheduled
    #[error("Unknown reminder: {0}")]
    UnknownReminder(Uuid),

    /// The reminder cannot be turned into a firing plan
    #[error("Cannot plan reminder: {0}")]
    Recurrence(#[from] RecurrenceError),

    /// Operation timed out
    #[error("Operation timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// Task join failed
    #[error("Task join failed: {0}")]
    TaskJoinFailed(String),
}

impl ErrorClassification for SchedulerError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::StartFailed(_) | Self::StopFailed(_))
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::AlreadyRunning | Self::NotRunning | Self::Disabled | Self::UnknownReminder(_) => {
                ErrorSeverity::Info
            }
            Self::Timeout { .. } => ErrorSeverity::Warning,
            Self::Recurrence(_) | Self::JobRegistrationFailed(_) | Self::JobRemovalFailed(_) => {
                ErrorSeverity::Error
            }
            Self::CreationFailed(_)
            | Self::StartFailed(_)
            | Self::StopFailed(_)
            | Self::TaskJoinFailed(_) => ErrorSeverity::Critical,
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Timeout { seconds } => Some(Duration::from_secs(*seconds)),
            _ => None,
        }
    }
}

impl From<SchedulerError> for SlotwiseError {
    fn from(err: SchedulerError) -> Self {
        match err {
            SchedulerError::AlreadyRunning
            | SchedulerError::NotRunning
            | SchedulerError::Recurrence(_) => Self::InvalidInput(err.to_string()),
            SchedulerError::UnknownReminder(id) => Self::NotFound(format!("reminder {id}")),
            SchedulerError::Disabled => Self::Config(err.to_string()),
            _ => Self::Internal(err.to_string()),
        }
    }
}

/// Convenience type alias for scheduler operations
pub type SchedulerResult<T> = Result<T, SchedulerError>;
