//! Port interfaces for availability lookups
//!
//! These traits define the boundaries between the availability resolver
//! and whatever stores appointments and operating hours.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use slotwise_domain::{EntityId, Interval, LocationId, LookupError, WeeklySchedule};

/// Source of the time each entity is already booked
#[async_trait]
pub trait CalendarRepository: Send + Sync {
    /// Busy intervals of `entity_id` overlapping `[range_start, range_end)`.
    ///
    /// Intervals may be unordered, overlapping, or extend past the range.
    async fn get_busy_intervals(
        &self,
        entity_id: &EntityId,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> Result<Vec<Interval>, LookupError>;
}

/// Source of location operating hours
#[async_trait]
pub trait LocationRepository: Send + Sync {
    /// Weekly schedule of a location
    async fn get_schedule(&self, location_id: &LocationId) -> Result<WeeklySchedule, LookupError>;
}
