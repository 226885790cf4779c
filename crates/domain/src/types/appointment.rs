//! Appointments and the busy intervals derived from them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::EntityId;
use super::interval::Interval;
use crate::errors::AppointmentError;

/// An appointment record as stored by the booking application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    /// Booking identifier from the source calendar
    pub id: String,
    /// Entity the appointment blocks
    pub entity_id: EntityId,
    /// Start of the booking
    pub in_time: DateTime<Utc>,
    /// End of the booking, exclusive
    pub out_time: DateTime<Utc>,
}

/// Time an entity is unavailable, tagged with its owner
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BusyInterval {
    entity_id: EntityId,
    interval: Interval,
}

impl BusyInterval {
    /// Tag `interval` as busy time of `entity_id`
    pub fn new(entity_id: EntityId, interval: Interval) -> Self {
        Self { entity_id, interval }
    }

    /// Owning entity
    pub fn entity_id(&self) -> &EntityId {
        &self.entity_id
    }

    /// Busy time span
    pub fn interval(&self) -> Interval {
        self.interval
    }
}

impl TryFrom<&Appointment> for BusyInterval {
    type Error = AppointmentError;

    /// Rejects appointments whose `in_time` is not before `out_time`.
    fn try_from(appointment: &Appointment) -> Result<Self, Self::Error> {
        let interval = Interval::new(appointment.in_time, appointment.out_time).map_err(|_| {
            AppointmentError::InvalidTimes {
                id: appointment.id.clone(),
                in_time: appointment.in_time,
                out_time: appointment.out_time,
            }
        })?;
        Ok(Self::new(appointment.entity_id.clone(), interval))
    }
}
