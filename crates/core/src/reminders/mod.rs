//! Reminder recurrence planning and dispatch port

pub mod ports;
pub mod recurrence;

pub use ports::ReminderDispatcher;
pub use recurrence::{from_date_and_repeat, RecurrenceError, RecurrencePlan};
