//! Half-open time range `[start, end)`

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::IntervalError;

/// A non-empty, half-open time range `[start, end)`.
///
/// Intervals order by `start`, then by `end`. Zero-length and inverted
/// ranges cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct Interval {
    pub(crate) start: DateTime<Utc>,
    pub(crate) end: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawInterval> for Interval {
    type Error = IntervalError;

    fn try_from(raw: RawInterval) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl Interval {
    /// Create an interval, rejecting `start >= end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, IntervalError> {
        if start < end {
            Ok(Self { start, end })
        } else {
            Err(IntervalError { start, end })
        }
    }

    /// Bounds already known to satisfy `start < end`.
    pub(crate) fn from_ordered(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        debug_assert!(start < end, "interval bounds out of order");
        Self { start, end }
    }

    /// Inclusive lower bound
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Exclusive upper bound
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Length of the interval, always positive
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// True when the two ranges share at least one instant. Touching
    /// intervals do not overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// True when the ranges overlap or meet end-to-start.
    pub fn touches(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// The common part of both ranges, if it is non-empty.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start < end).then(|| Self::from_ordered(start, end))
    }

    /// Whether `start <= point < end`
    pub fn contains(&self, point: DateTime<Utc>) -> bool {
        self.start <= point && point < self.end
    }

    /// True when `other` lies entirely inside `self`.
    pub fn contains_interval(&self, other: &Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 1, hour, 0, 0).unwrap()
    }

    fn iv(start: u32, end: u32) -> Interval {
        Interval::new(at(start), at(end)).unwrap()
    }

    #[test]
    fn test_rejects_empty_and_inverted() {
        assert_eq!(Interval::new(at(9), at(9)), Err(IntervalError { start: at(9), end: at(9) }));
        assert!(Interval::new(at(10), at(9)).is_err());
    }

    #[test]
    fn test_overlap_is_strict() {
        assert!(iv(9, 11).overlaps(&iv(10, 12)));
        assert!(!iv(9, 10).overlaps(&iv(10, 11)));
        assert!(iv(9, 10).touches(&iv(10, 11)));
        assert!(!iv(9, 10).touches(&iv(11, 12)));
    }

    #[test]
    fn test_intersect() {
        assert_eq!(iv(9, 12).intersect(&iv(10, 14)), Some(iv(10, 12)));
        assert_eq!(iv(9, 10).intersect(&iv(10, 11)), None);
        assert_eq!(iv(8, 18).intersect(&iv(9, 10)), Some(iv(9, 10)));
    }

    #[test]
    fn test_contains_is_half_open() {
        let interval = iv(9, 10);
        assert!(interval.contains(at(9)));
        assert!(!interval.contains(at(10)));
        assert!(iv(8, 12).contains_interval(&interval));
        assert!(!interval.contains_interval(&iv(8, 12)));
    }

    #[test]
    fn test_ordering_by_start_then_end() {
        let mut intervals = vec![iv(10, 12), iv(9, 11), iv(9, 10)];
        intervals.sort();
        assert_eq!(intervals, vec![iv(9, 10), iv(9, 11), iv(10, 12)]);
    }

    #[test]
    fn test_deserialize_validates_bounds() {
        let ok: Interval = serde_json::from_str(
            r#"{ "start": "2025-07-01T09:00:00Z", "end": "2025-07-01T10:00:00Z" }"#,
        )
        .unwrap();
        assert_eq!(ok, iv(9, 10));

        let bad = serde_json::from_str::<Interval>(
            r#"{ "start": "2025-07-01T10:00:00Z", "end": "2025-07-01T10:00:00Z" }"#,
        );
        assert!(bad.is_err());
    }
}
