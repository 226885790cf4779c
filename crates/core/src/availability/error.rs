//! Availability resolver errors

use std::time::Duration;

use slotwise_common::{ErrorClassification, ErrorSeverity};
use slotwise_domain::{EntityId, LocationId, LookupError, SlotwiseError};
use thiserror::Error;

/// Errors returned by [`AvailabilityResolver`](super::AvailabilityResolver)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AvailabilityError {
    /// Rejected before any repository call
    #[error("Invalid availability query: {0}")]
    InvalidQuery(String),

    #[error("Entity not found: {0}")]
    EntityNotFound(EntityId),

    #[error("Entity {0} has no calendar configured")]
    NoCalendar(EntityId),

    #[error("Location not found: {0}")]
    LocationNotFound(LocationId),

    /// The location exists but has no usable operating hours
    #[error("Location {0} has no operating schedule")]
    InvalidSchedule(LocationId),

    #[error("Repository lookup failed: {0}")]
    Lookup(#[source] LookupError),

    /// Only produced by `require_common_free_slots`
    #[error("No common availability in the requested range")]
    NoAvailability,

    #[error("Repository lookups did not complete within {duration:?}")]
    Timeout { duration: Duration },
}

/// Result type for availability operations
pub type AvailabilityResult<T> = Result<T, AvailabilityError>;

impl AvailabilityError {
    /// Map a calendar lookup failure for `entity_id`.
    pub(crate) fn from_calendar_lookup(entity_id: &EntityId, err: LookupError) -> Self {
        match err {
            LookupError::NotFound(_) => Self::EntityNotFound(entity_id.clone()),
            LookupError::NoCalendar(_) => Self::NoCalendar(entity_id.clone()),
            other @ LookupError::Unavailable(_) => Self::Lookup(other),
        }
    }

    /// Map a schedule lookup failure for `location_id`.
    pub(crate) fn from_schedule_lookup(location_id: &LocationId, err: LookupError) -> Self {
        match err {
            LookupError::NotFound(_) => Self::LocationNotFound(location_id.clone()),
            LookupError::NoCalendar(_) => Self::InvalidSchedule(location_id.clone()),
            other @ LookupError::Unavailable(_) => Self::Lookup(other),
        }
    }
}

impl ErrorClassification for AvailabilityError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Lookup(LookupError::Unavailable(_)))
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NoAvailability
            | Self::EntityNotFound(_)
            | Self::NoCalendar(_)
            | Self::LocationNotFound(_) => ErrorSeverity::Info,
            Self::Timeout { .. } | Self::Lookup(_) => ErrorSeverity::Warning,
            Self::InvalidQuery(_) | Self::InvalidSchedule(_) => ErrorSeverity::Error,
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Timeout { duration } => Some(*duration),
            _ => None,
        }
    }
}

impl From<AvailabilityError> for SlotwiseError {
    fn from(err: AvailabilityError) -> Self {
        match err {
            AvailabilityError::InvalidQuery(msg) => Self::InvalidInput(msg),
            AvailabilityError::EntityNotFound(id) => Self::NotFound(id.to_string()),
            AvailabilityError::LocationNotFound(id) => Self::NotFound(id.to_string()),
            other => Self::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calendar_lookup_mapping() {
        let id = EntityId::new("worker-1");
        assert_eq!(
            AvailabilityError::from_calendar_lookup(&id, LookupError::NotFound("x".into())),
            AvailabilityError::EntityNotFound(id.clone())
        );
        assert_eq!(
            AvailabilityError::from_calendar_lookup(&id, LookupError::NoCalendar("x".into())),
            AvailabilityError::NoCalendar(id.clone())
        );
        assert!(matches!(
            AvailabilityError::from_calendar_lookup(&id, LookupError::Unavailable("db".into())),
            AvailabilityError::Lookup(LookupError::Unavailable(_))
        ));
    }

    #[test]
    fn test_classification() {
        let timeout = AvailabilityError::Timeout { duration: Duration::from_millis(50) };
        assert!(timeout.is_retryable());
        assert_eq!(timeout.retry_after(), Some(Duration::from_millis(50)));

        assert!(!AvailabilityError::NoAvailability.is_retryable());
        assert_eq!(AvailabilityError::NoAvailability.severity(), ErrorSeverity::Info);
        assert!(!AvailabilityError::InvalidQuery("empty".into()).is_critical());
    }
}
