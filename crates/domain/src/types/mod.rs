//! Domain types and models

pub mod appointment;
pub mod ids;
pub mod interval;
pub mod interval_set;
pub mod query;
pub mod reminder;
pub mod schedule;

pub use appointment::{Appointment, BusyInterval};
pub use ids::{EntityId, LocationId};
pub use interval::Interval;
pub use interval_set::IntervalSet;
pub use query::AvailabilityQuery;
pub use reminder::{Reminder, RepeatKind};
pub use schedule::{ScheduleEntry, WeeklySchedule};
