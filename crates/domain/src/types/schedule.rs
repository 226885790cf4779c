//! Weekly operating hours of a location

use chrono::{NaiveTime, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::errors::ScheduleError;

/// Opening window for one weekday, `open < close` within the same local day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawScheduleEntry")]
pub struct ScheduleEntry {
    weekday: Weekday,
    open: NaiveTime,
    close: NaiveTime,
}

#[derive(Deserialize)]
struct RawScheduleEntry {
    weekday: Weekday,
    open: NaiveTime,
    close: NaiveTime,
}

impl TryFrom<RawScheduleEntry> for ScheduleEntry {
    type Error = ScheduleError;

    fn try_from(raw: RawScheduleEntry) -> Result<Self, Self::Error> {
        Self::new(raw.weekday, raw.open, raw.close)
    }
}

impl ScheduleEntry {
    /// Opening hours for one weekday.
    /// 
    /// # Errors
    /// `ScheduleError::InvalidHours` unless `open < close`.
    pub fn new(weekday: Weekday, open: NaiveTime, close: NaiveTime) -> Result<Self, ScheduleError> {
        if open < close {
            Ok(Self { weekday, open, close })
        } else {
            Err(ScheduleError::InvalidHours { weekday, open, close })
        }
    }

    /// Day these hours apply to
    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    /// Local opening time
    pub fn open(&self) -> NaiveTime {
        self.open
    }

    /// Local closing time
    pub fn close(&self) -> NaiveTime {
        self.close
    }
}

/// A location's weekly schedule: at most one entry per weekday, interpreted
/// in the location's time zone. Weekdays without an entry are closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWeeklySchedule", into = "RawWeeklySchedule")]
pub struct WeeklySchedule {
    timezone: Tz,
    days: [Option<ScheduleEntry>; 7],
}

#[derive(Serialize, Deserialize)]
struct RawWeeklySchedule {
    #[serde(default = "default_timezone")]
    timezone: Tz,
    entries: Vec<ScheduleEntry>,
}

fn default_timezone() -> Tz {
    Tz::UTC
}

impl TryFrom<RawWeeklySchedule> for WeeklySchedule {
    type Error = ScheduleError;

    fn try_from(raw: RawWeeklySchedule) -> Result<Self, Self::Error> {
        Self::new(raw.timezone, raw.entries)
    }
}

impl From<WeeklySchedule> for RawWeeklySchedule {
    fn from(schedule: WeeklySchedule) -> Self {
        Self { timezone: schedule.timezone, entries: schedule.entries().copied().collect() }
    }
}

impl WeeklySchedule {
    /// Build a schedule, rejecting a second entry for the same weekday.
    pub fn new(
        timezone: Tz,
        entries: impl IntoIterator<Item = ScheduleEntry>,
    ) -> Result<Self, ScheduleError> {
        let mut days = [None; 7];
        for entry in entries {
            let slot = &mut days[entry.weekday.num_days_from_monday() as usize];
            if slot.is_some() {
                return Err(ScheduleError::DuplicateWeekday(entry.weekday));
            }
            *slot = Some(entry);
        }
        Ok(Self { timezone, days })
    }

    /// Schedule whose local days are UTC days.
    pub fn utc(entries: impl IntoIterator<Item = ScheduleEntry>) -> Result<Self, ScheduleError> {
        Self::new(Tz::UTC, entries)
    }

    /// A schedule with no opening hours at all.
    pub fn closed(timezone: Tz) -> Self {
        Self { timezone, days: [None; 7] }
    }

    /// IANA zone the opening hours are expressed in
    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Opening hours of `weekday`, `None` when closed
    pub fn entry_for(&self, weekday: Weekday) -> Option<&ScheduleEntry> {
        self.days[weekday.num_days_from_monday() as usize].as_ref()
    }

    /// Entries in Monday-to-Sunday order.
    pub fn entries(&self) -> impl Iterator<Item = &ScheduleEntry> {
        self.days.iter().flatten()
    }

    /// True when no weekday has opening hours
    pub fn is_always_closed(&self) -> bool {
        self.days.iter().all(Option::is_none)
    }
}
