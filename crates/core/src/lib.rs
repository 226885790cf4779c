//! # Slotwise Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits) for calendars, locations and reminder
//!   delivery
//! - Schedule clipping and the availability resolver
//! - Reminder recurrence planning
//!
//! ## Architecture Principles
//! - Only depends on `slotwise-common` and `slotwise-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod availability;
pub mod reminders;

// Re-export specific items to avoid ambiguity
pub use availability::{
    AvailabilityError, AvailabilityResolver, AvailabilityResult, CalendarRepository,
    LocationRepository, ScheduleClipper,
};
pub use reminders::{from_date_and_repeat, RecurrenceError, RecurrencePlan, ReminderDispatcher};
