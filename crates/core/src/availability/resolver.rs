//! Common free-slot resolution across several calendars

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::try_join_all;
use slotwise_domain::{
    AvailabilityConfig, AvailabilityQuery, EntityId, Interval, IntervalSet, LocationId,
    WeeklySchedule,
};
use tracing::{debug, info, instrument, warn};

use super::clipper::ScheduleClipper;
use super::error::{AvailabilityError, AvailabilityResult};
use super::ports::{CalendarRepository, LocationRepository};

/// Pipeline stages, reported in log fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Validating,
    ResolvingEntities,
    ComputingFree,
    Clipping,
    Intersecting,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Validating => "validating",
            Self::ResolvingEntities => "resolving_entities",
            Self::ComputingFree => "computing_free",
            Self::Clipping => "clipping",
            Self::Intersecting => "intersecting",
            Self::Done => "done",
        })
    }
}

/// Everything fetched from the repositories for one query
struct Inputs {
    free_sets: Vec<IntervalSet>,
    schedule: Option<WeeklySchedule>,
}

/// Computes the time during which every queried entity is free
///
/// Busy intervals are fetched concurrently, each entity's free time is the
/// query range minus its bookings, and the result is the intersection of
/// all of them, optionally restricted to a location's operating hours.
pub struct AvailabilityResolver {
    calendars: Arc<dyn CalendarRepository>,
    locations: Arc<dyn LocationRepository>,
    config: AvailabilityConfig,
}

impl AvailabilityResolver {
    /// Create a resolver with default limits
    pub fn new(
        calendars: Arc<dyn CalendarRepository>,
        locations: Arc<dyn LocationRepository>,
    ) -> Self {
        Self { calendars, locations, config: AvailabilityConfig::default() }
    }

    /// Replace the query limits and lookup deadline
    pub fn with_config(mut self, config: AvailabilityConfig) -> Self {
        self.config = config;
        self
    }

    /// Override only the lookup deadline; `None` waits indefinitely.
    pub fn with_lookup_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.lookup_timeout_ms =
            timeout.map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Active configuration
    pub fn config(&self) -> &AvailabilityConfig {
        &self.config
    }

    /// Intervals inside the query range during which every entity is free.
    ///
    /// An empty set is a successful answer. Hard failures (unknown entity,
    /// missing calendar, backend errors, deadline expiry) are returned as
    /// soon as the first one is observed.
    #[instrument(
        skip(self, query),
        fields(entities = query.entity_ids.len(), location = ?query.location_id)
    )]
    pub async fn find_common_free_slots(
        &self,
        query: &AvailabilityQuery,
    ) -> AvailabilityResult<IntervalSet> {
        let range = self.validate(query).map_err(|err| failed(Stage::Validating, err))?;

        let Some(inputs) = self.with_deadline(self.gather(query, range)).await? else {
            info!(stage = %Stage::Done, "An entity has no free time in range");
            return Ok(IntervalSet::empty());
        };

        let common = match inputs.schedule {
            Some(schedule) => {
                debug!(stage = %Stage::Clipping, timezone = %schedule.timezone(), "Clipping to operating hours");
                let hours = ScheduleClipper::new(&schedule).operating_hours(range);
                if hours.is_empty() {
                    info!(stage = %Stage::Done, "Location closed for the whole range");
                    return Ok(IntervalSet::empty());
                }

                debug!(stage = %Stage::Intersecting, sets = inputs.free_sets.len(), "Intersecting free sets");
                IntervalSet::intersect_all(
                    inputs.free_sets.into_iter().map(|free| free.intersect(&hours)),
                )
            }
            None => {
                debug!(stage = %Stage::Intersecting, sets = inputs.free_sets.len(), "Intersecting free sets");
                IntervalSet::intersect_all(inputs.free_sets)
            }
        };

        info!(
            stage = %Stage::Done,
            intervals = common.len(),
            free_minutes = common.total_duration().num_minutes(),
            "Resolved common availability"
        );
        Ok(common)
    }

    /// Like [`find_common_free_slots`](Self::find_common_free_slots) but
    /// reports an empty result as [`AvailabilityError::NoAvailability`].
    pub async fn require_common_free_slots(
        &self,
        query: &AvailabilityQuery,
    ) -> AvailabilityResult<IntervalSet> {
        let common = self.find_common_free_slots(query).await?;
        if common.is_empty() {
            return Err(AvailabilityError::NoAvailability);
        }
        Ok(common)
    }

    /// Common free time cut into consecutive slots of `slot_length`.
    pub async fn find_bookable_slots(
        &self,
        query: &AvailabilityQuery,
        slot_length: chrono::Duration,
    ) -> AvailabilityResult<Vec<Interval>> {
        if slot_length <= chrono::Duration::zero() {
            return Err(failed(
                Stage::Validating,
                AvailabilityError::InvalidQuery(format!(
                    "slot length must be positive, got {} minutes",
                    slot_length.num_minutes()
                )),
            ));
        }

        let common = self.find_common_free_slots(query).await?;
        Ok(common.split_into_slots(slot_length))
    }

    fn validate(&self, query: &AvailabilityQuery) -> AvailabilityResult<Interval> {
        debug!(stage = %Stage::Validating, "Validating availability query");

        if query.entity_ids.is_empty() {
            return Err(AvailabilityError::InvalidQuery(
                "at least one entity is required".to_string(),
            ));
        }
        if query.entity_ids.len() > self.config.max_entities {
            return Err(AvailabilityError::InvalidQuery(format!(
                "{} entities requested, at most {} allowed",
                query.entity_ids.len(),
                self.config.max_entities
            )));
        }

        let range = query.range().map_err(|err| AvailabilityError::InvalidQuery(err.to_string()))?;
        let too_long = self.config.max_range().is_some_and(|max| range.duration() > max);
        if too_long {
            return Err(AvailabilityError::InvalidQuery(format!(
                "range spans {} days, at most {} allowed",
                range.duration().num_days(),
                self.config.max_range_days
            )));
        }

        Ok(range)
    }

    /// Fetch busy time and, when needed, the location schedule. Returns
    /// `None` as soon as some entity is known to have no free time.
    async fn gather(
        &self,
        query: &AvailabilityQuery,
        range: Interval,
    ) -> AvailabilityResult<Option<Inputs>> {
        debug!(stage = %Stage::ResolvingEntities, "Fetching busy intervals");
        let free_sets = try_join_all(
            query.entity_ids.iter().map(|entity_id| self.free_set_for(entity_id, range)),
        )
        .await
        .map_err(|err| failed(Stage::ResolvingEntities, err))?;

        if free_sets.iter().any(IntervalSet::is_empty) {
            return Ok(None);
        }

        let schedule = match &query.location_id {
            Some(location_id) => Some(
                self.fetch_schedule(location_id)
                    .await
                    .map_err(|err| failed(Stage::Clipping, err))?,
            ),
            None => None,
        };

        Ok(Some(Inputs { free_sets, schedule }))
    }

    async fn free_set_for(
        &self,
        entity_id: &EntityId,
        range: Interval,
    ) -> AvailabilityResult<IntervalSet> {
        let busy = self
            .calendars
            .get_busy_intervals(entity_id, range.start(), range.end())
            .await
            .map_err(|err| AvailabilityError::from_calendar_lookup(entity_id, err))?;

        let free = IntervalSet::from_intervals(busy).complement(range);
        debug!(
            stage = %Stage::ComputingFree,
            entity_id = %entity_id,
            free_intervals = free.len(),
            "Computed free set"
        );
        Ok(free)
    }

    async fn fetch_schedule(&self, location_id: &LocationId) -> AvailabilityResult<WeeklySchedule> {
        self.locations
            .get_schedule(location_id)
            .await
            .map_err(|err| AvailabilityError::from_schedule_lookup(location_id, err))
    }

    async fn with_deadline<T, F>(&self, fut: F) -> AvailabilityResult<T>
    where
        F: Future<Output = AvailabilityResult<T>>,
    {
        match self.config.lookup_timeout() {
            Some(duration) => tokio::time::timeout(duration, fut)
                .await
                .map_err(|_| failed(Stage::ResolvingEntities, AvailabilityError::Timeout { duration }))?,
            None => fut.await,
        }
    }
}

fn failed(stage: Stage, err: AvailabilityError) -> AvailabilityError {
    warn!(stage = %stage, error = %err, "Availability resolution failed");
    err
}
