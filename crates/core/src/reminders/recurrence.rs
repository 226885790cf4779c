//! Translation of reminder repeat kinds into firing plans
//!
//! Recurring reminders become five-field cron expressions built from the
//! reminder's wall-clock time; one-off reminders become a delay from now.

use std::time::Duration;

use chrono::{DateTime, Datelike, NaiveDateTime, Timelike, Utc};
use slotwise_common::{CronExpression, CronField, CronParseError};
use slotwise_domain::{Reminder, RepeatKind, UnsupportedRepeatKind};
use thiserror::Error;

/// Errors produced while planning a reminder
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecurrenceError {
    #[error(transparent)]
    Unsupported(#[from] UnsupportedRepeatKind),

    #[error("Failed to build cron pattern: {0}")]
    Pattern(#[from] CronParseError),
}

/// When a reminder fires
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecurrencePlan {
    /// Fire on every match of the expression (UTC)
    Recurring(CronExpression),
    /// Fire once after the delay
    OneShot(Duration),
}

impl RecurrencePlan {
    /// Plan for `reminder` as seen at `now`.
    ///
    /// A one-off reminder whose time has already passed gets a zero delay.
    pub fn for_reminder(reminder: &Reminder, now: DateTime<Utc>) -> Result<Self, RecurrenceError> {
        match reminder.repeat {
            RepeatKind::Once => {
                Ok(Self::OneShot((reminder.fire_at - now).to_std().unwrap_or(Duration::ZERO)))
            }
            repeat => Ok(Self::Recurring(from_date_and_repeat(reminder.fire_at.naive_utc(), repeat)?)),
        }
    }

    /// True for cron-driven plans
    pub fn is_recurring(&self) -> bool {
        matches!(self, Self::Recurring(_))
    }

    /// First firing strictly after `now`, when one exists.
    pub fn next_fire_after(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::Recurring(cron) => cron.next_after(&now),
            Self::OneShot(delay) => {
                chrono::Duration::from_std(*delay).ok().and_then(|d| now.checked_add_signed(d))
            }
        }
    }
}

/// Cron expression repeating `date`'s time of day at the given cadence.
///
/// | Repeat  | Pattern             |
/// |---------|---------------------|
/// | DAILY   | `m h * * *`         |
/// | WEEKLY  | `m h * * dow`       |
/// | MONTHLY | `m h dom * *`       |
/// | YEARLY  | `m h dom month *`   |
///
/// `ONCE` has no cron form and is rejected.
pub fn from_date_and_repeat(
    date: NaiveDateTime,
    repeat: RepeatKind,
) -> Result<CronExpression, RecurrenceError> {
    let minute = CronField::Single(date.minute());
    let hour = CronField::Single(date.hour());

    let (day, month, weekday) = match repeat {
        RepeatKind::Daily => (CronField::Any, CronField::Any, CronField::Any),
        RepeatKind::Weekly => (
            CronField::Any,
            CronField::Any,
            CronField::Single(date.weekday().num_days_from_sunday()),
        ),
        RepeatKind::Monthly => (CronField::Single(date.day()), CronField::Any, CronField::Any),
        RepeatKind::Yearly => {
            (CronField::Single(date.day()), CronField::Single(date.month()), CronField::Any)
        }
        RepeatKind::Once => return Err(UnsupportedRepeatKind(repeat.to_string()).into()),
    };

    Ok(CronExpression::new(minute, hour, day, month, weekday)?)
}
