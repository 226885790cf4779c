//! In-memory calendar and location stores
//!
//! Both repositories validate data on the way in, so the resolver only ever
//! sees well-formed intervals and schedules.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use slotwise_core::{CalendarRepository, LocationRepository};
use slotwise_domain::{
    Appointment, BusyInterval, EntityId, Interval, LocationId, LookupError, Result,
    SlotwiseError, WeeklySchedule,
};
use tracing::debug;

#[derive(Debug, Clone)]
struct Booking {
    appointment_id: String,
    interval: Interval,
}

/// Entity registry with per-entity appointment books
///
/// An entity is either registered with a calendar (possibly empty) or
/// registered without one; unregistered entities are unknown.
#[derive(Debug, Default)]
pub struct InMemoryCalendarRepository {
    calendars: RwLock<HashMap<EntityId, Option<Vec<Booking>>>>,
}

impl InMemoryCalendarRepository {
    /// Empty repository with no entities
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity with an empty calendar. Existing bookings are kept.
    pub fn register_entity(&self, entity_id: EntityId) {
        let mut calendars = self.calendars.write();
        let calendar = calendars.entry(entity_id).or_insert(None);
        calendar.get_or_insert_with(Vec::new);
    }

    /// Register an entity that has no calendar source configured.
    pub fn register_without_calendar(&self, entity_id: EntityId) {
        self.calendars.write().insert(entity_id, None);
    }

    /// Book an appointment, registering its entity if needed.
    ///
    /// # Errors
    /// `SlotwiseError::InvalidInput` when `in_time >= out_time` or the entity
    /// was registered without a calendar.
    pub fn add_appointment(&self, appointment: &Appointment) -> Result<()> {
        let busy = BusyInterval::try_from(appointment)?;

        let mut calendars = self.calendars.write();
        let calendar = calendars.entry(busy.entity_id().clone()).or_insert_with(|| Some(Vec::new()));
        let Some(bookings) = calendar.as_mut() else {
            return Err(SlotwiseError::InvalidInput(format!(
                "Entity {} has no calendar configured",
                busy.entity_id()
            )));
        };

        bookings.push(Booking { appointment_id: appointment.id.clone(), interval: busy.interval() });
        debug!(entity_id = %busy.entity_id(), appointment_id = %appointment.id, "Appointment added");
        Ok(())
    }

    /// Remove an appointment by id. Returns whether anything was removed.
    pub fn remove_appointment(&self, entity_id: &EntityId, appointment_id: &str) -> bool {
        let mut calendars = self.calendars.write();
        let Some(Some(bookings)) = calendars.get_mut(entity_id) else {
            return false;
        };
        let before = bookings.len();
        bookings.retain(|booking| booking.appointment_id != appointment_id);
        bookings.len() != before
    }
}

#[async_trait]
impl CalendarRepository for InMemoryCalendarRepository {
    async fn get_busy_intervals(
        &self,
        entity_id: &EntityId,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> std::result::Result<Vec<Interval>, LookupError> {
        let calendars = self.calendars.read();
        match calendars.get(entity_id) {
            None => Err(LookupError::NotFound(entity_id.to_string())),
            Some(None) => Err(LookupError::NoCalendar(entity_id.to_string())),
            Some(Some(bookings)) => Ok(bookings
                .iter()
                .map(|booking| booking.interval)
                .filter(|interval| interval.start() < range_end && range_start < interval.end())
                .collect()),
        }
    }
}

/// Location schedules keyed by location id
#[derive(Debug, Default)]
pub struct InMemoryLocationRepository {
    schedules: RwLock<HashMap<LocationId, WeeklySchedule>>,
}

impl InMemoryLocationRepository {
    /// Empty repository with no locations
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a location's schedule.
    pub fn upsert_schedule(&self, location_id: LocationId, schedule: WeeklySchedule) {
        debug!(location_id = %location_id, timezone = %schedule.timezone(), "Schedule stored");
        self.schedules.write().insert(location_id, schedule);
    }

    /// Parse and store a schedule from its JSON form.
    ///
    /// # Errors
    /// `SlotwiseError::InvalidInput` for malformed JSON, inverted hours or a
    /// repeated weekday.
    pub fn upsert_schedule_json(&self, location_id: LocationId, json: &str) -> Result<()> {
        let schedule: WeeklySchedule = serde_json::from_str(json)
            .map_err(|e| SlotwiseError::InvalidInput(format!("Invalid schedule: {e}")))?;
        self.upsert_schedule(location_id, schedule);
        Ok(())
    }

    /// Drop a location's schedule, returning it if present.
    pub fn remove_schedule(&self, location_id: &LocationId) -> Option<WeeklySchedule> {
        self.schedules.write().remove(location_id)
    }
}

#[async_trait]
impl LocationRepository for InMemoryLocationRepository {
    async fn get_schedule(
        &self,
        location_id: &LocationId,
    ) -> std::result::Result<WeeklySchedule, LookupError> {
        self.schedules
            .read()
            .get(location_id)
            .cloned()
            .ok_or_else(|| LookupError::NotFound(location_id.to_string()))
    }
}
