//! Schedule clipping
//!
//! Turns a location's weekly opening hours into concrete UTC intervals and
//! restricts arbitrary ranges to them. Ranges are walked one local calendar
//! day at a time, so a request crossing midnight picks up each day's own
//! window.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use slotwise_domain::{Interval, IntervalSet, WeeklySchedule};

/// Longest DST gap we step across when a local time does not exist
const MAX_GAP_MINUTES: i64 = 24 * 60;

/// Restricts intervals to the operating hours of a [`WeeklySchedule`]
#[derive(Debug, Clone, Copy)]
pub struct ScheduleClipper<'a> {
    schedule: &'a WeeklySchedule,
}

impl<'a> ScheduleClipper<'a> {
    /// Clipper over `schedule`
    pub fn new(schedule: &'a WeeklySchedule) -> Self {
        Self { schedule }
    }

    /// Opening window of the local calendar day `date`, converted to UTC.
    ///
    /// Returns `None` when the location is closed that weekday.
    pub fn free_window_for(&self, date: NaiveDate) -> Option<Interval> {
        let entry = self.schedule.entry_for(date.weekday())?;
        let tz = self.schedule.timezone();
        let open = resolve_local(tz, date.and_time(entry.open()))?;
        let close = resolve_local(tz, date.and_time(entry.close()))?;
        Interval::new(open, close).ok()
    }

    /// Part of `interval` that falls inside operating hours, or `None` when
    /// nothing survives.
    pub fn clip_to_schedule(&self, interval: Interval) -> Option<IntervalSet> {
        let clipped = self.operating_hours(interval);
        (!clipped.is_empty()).then_some(clipped)
    }

    /// Operating hours inside `range`, possibly empty.
    pub fn operating_hours(&self, range: Interval) -> IntervalSet {
        let tz = self.schedule.timezone();
        let last = range.end().with_timezone(&tz).date_naive();

        let mut windows = Vec::new();
        let mut day = Some(range.start().with_timezone(&tz).date_naive());
        while let Some(date) = day.filter(|date| *date <= last) {
            if let Some(window) = self.free_window_for(date).and_then(|w| w.intersect(&range)) {
                windows.push(window);
            }
            day = date.succ_opt();
        }

        IntervalSet::from_intervals(windows)
    }
}

/// Map a wall-clock time to an instant. Ambiguous times take the earlier
/// instant; times inside a DST gap move forward to the first valid minute.
fn resolve_local(tz: Tz, local: NaiveDateTime) -> Option<DateTime<Utc>> {
    if let Some(instant) = tz.from_local_datetime(&local).earliest() {
        return Some(instant.with_timezone(&Utc));
    }

    (1..=MAX_GAP_MINUTES).find_map(|minutes| {
        let shifted = local.checked_add_signed(Duration::minutes(minutes))?;
        tz.from_local_datetime(&shifted).earliest().map(|dt| dt.with_timezone(&Utc))
    })
}
