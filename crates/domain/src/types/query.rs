//! Availability query input

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{EntityId, LocationId};
use super::interval::Interval;
use crate::errors::IntervalError;

/// Who must be free, over which range, optionally at which location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityQuery {
    /// Entities that must all be free
    pub entity_ids: Vec<EntityId>,
    /// Start of the searched range
    pub range_start: DateTime<Utc>,
    /// End of the searched range, exclusive
    pub range_end: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<LocationId>,
}

impl AvailabilityQuery {
    /// Query over `[range_start, range_end)` without a location
    pub fn new(
        entity_ids: impl IntoIterator<Item = EntityId>,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> Self {
        Self {
            entity_ids: entity_ids.into_iter().collect(),
            range_start,
            range_end,
            location_id: None,
        }
    }

    /// Restrict the query to a location's operating hours
    pub fn at_location(mut self, location_id: impl Into<LocationId>) -> Self {
        self.location_id = Some(location_id.into());
        self
    }

    /// The query range as an interval; fails when `range_start >= range_end`.
    pub fn range(&self) -> Result<Interval, IntervalError> {
        Interval::new(self.range_start, self.range_end)
    }
}
