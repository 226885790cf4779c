//! Canonical set of disjoint intervals with boolean set algebra
//!
//! An [`IntervalSet`] always holds its intervals sorted ascending with a
//! strictly positive gap between neighbours (`a.end < b.start`). Touching or
//! overlapping input is merged on construction, and every algebra operation
//! returns a new set in the same canonical form. The empty set is a valid
//! value: it is the identity of [`IntervalSet::union`] and absorbs
//! [`IntervalSet::intersect`].

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::interval::Interval;

/// Sorted, non-overlapping, non-adjacent intervals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct IntervalSet {
    intervals: Vec<Interval>,
}

impl IntervalSet {
    /// The empty set
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a set from intervals in any order, merging overlaps and
    /// adjacency.
    pub fn from_intervals(raw: impl IntoIterator<Item = Interval>) -> Self {
        Self { intervals: normalize(raw.into_iter().collect()) }
    }

    /// Wraps output that is canonical by construction.
    fn from_canonical(intervals: Vec<Interval>) -> Self {
        debug_assert!(is_canonical(&intervals), "interval set is not canonical");
        Self { intervals }
    }

    /// Whether the set holds no time at all
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Number of disjoint intervals
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Intervals in ascending order
    pub fn iter(&self) -> std::slice::Iter<'_, Interval> {
        self.intervals.iter()
    }

    /// Intervals in ascending order, as a slice
    pub fn as_slice(&self) -> &[Interval] {
        &self.intervals
    }

    /// Consume the set into its sorted intervals
    pub fn into_vec(self) -> Vec<Interval> {
        self.intervals
    }

    /// Earliest start and latest end, if the set is non-empty.
    pub fn span(&self) -> Option<Interval> {
        match (self.intervals.first(), self.intervals.last()) {
            (Some(first), Some(last)) => Some(Interval::from_ordered(first.start, last.end)),
            _ => None,
        }
    }

    /// Sum of all interval lengths
    pub fn total_duration(&self) -> Duration {
        self.intervals.iter().fold(Duration::zero(), |total, interval| total + interval.duration())
    }

    /// True when `point` falls inside one of the intervals.
    pub fn contains(&self, point: DateTime<Utc>) -> bool {
        let idx = self.intervals.partition_point(|interval| interval.end <= point);
        self.intervals.get(idx).is_some_and(|interval| interval.contains(point))
    }

    /// True when `candidate` lies entirely inside a single member interval.
    pub fn covers(&self, candidate: &Interval) -> bool {
        let idx = self.intervals.partition_point(|interval| interval.end <= candidate.start);
        self.intervals.get(idx).is_some_and(|interval| interval.contains_interval(candidate))
    }

    /// Time covered by either set
    pub fn union(&self, other: &Self) -> Self {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        Self::from_intervals(self.intervals.iter().chain(other.intervals.iter()).copied())
    }

    /// Points of `self` not covered by `other`.
    pub fn subtract(&self, other: &Self) -> Self {
        if self.is_empty() || other.is_empty() {
            return self.clone();
        }

        let mut result = Vec::with_capacity(self.intervals.len());
        let mut cursor = 0;

        for interval in &self.intervals {
            // Anything ending at or before this interval's start also ends
            // before every later one, so the cursor never moves back.
            while cursor < other.intervals.len() && other.intervals[cursor].end <= interval.start
            {
                cursor += 1;
            }

            let mut remaining_start = interval.start;
            for cut in other.intervals[cursor..].iter().take_while(|cut| cut.start < interval.end)
            {
                if cut.start > remaining_start {
                    result.push(Interval::from_ordered(remaining_start, cut.start));
                }
                remaining_start = remaining_start.max(cut.end);
                if remaining_start >= interval.end {
                    break;
                }
            }

            if remaining_start < interval.end {
                result.push(Interval::from_ordered(remaining_start, interval.end));
            }
        }

        Self::from_canonical(result)
    }

    /// Points present in both sets.
    pub fn intersect(&self, other: &Self) -> Self {
        if self.is_empty() || other.is_empty() {
            return Self::empty();
        }

        let mut result = Vec::new();
        let mut cursor = 0;

        for interval in &self.intervals {
            while cursor < other.intervals.len() && other.intervals[cursor].end <= interval.start
            {
                cursor += 1;
            }

            result.extend(
                other.intervals[cursor..]
                    .iter()
                    .take_while(|candidate| candidate.start < interval.end)
                    .filter_map(|candidate| interval.intersect(candidate)),
            );
        }

        Self::from_canonical(result)
    }

    /// Free time inside `range` not covered by `self`.
    pub fn complement(&self, range: Interval) -> Self {
        Self::from(range).subtract(self)
    }

    /// Left fold of [`IntervalSet::intersect`] over `sets`.
    ///
    /// Operands are pulled lazily: once the running result is empty no
    /// further set is consumed. An empty input yields the empty set.
    pub fn intersect_all<I>(sets: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        let mut sets = sets.into_iter();
        let Some(mut acc) = sets.next() else {
            return Self::empty();
        };

        while !acc.is_empty() {
            match sets.next() {
                Some(set) => acc = acc.intersect(&set),
                None => break,
            }
        }

        acc
    }

    /// Cut every member interval into consecutive slots of exactly `length`,
    /// dropping any remainder shorter than `length`.
    pub fn split_into_slots(&self, length: Duration) -> Vec<Interval> {
        if length <= Duration::zero() {
            return Vec::new();
        }

        let mut slots = Vec::new();
        for interval in &self.intervals {
            let mut slot_start = interval.start;
            while let Some(slot_end) = slot_start.checked_add_signed(length) {
                if slot_end > interval.end {
                    break;
                }
                slots.push(Interval::from_ordered(slot_start, slot_end));
                slot_start = slot_end;
            }
        }
        slots
    }
}

fn normalize(mut raw: Vec<Interval>) -> Vec<Interval> {
    raw.sort_unstable();

    let mut merged: Vec<Interval> = Vec::with_capacity(raw.len());
    for next in raw {
        match merged.last_mut() {
            Some(running) if next.start <= running.end => {
                running.end = running.end.max(next.end);
            }
            _ => merged.push(next),
        }
    }
    merged
}

fn is_canonical(intervals: &[Interval]) -> bool {
    intervals.windows(2).all(|pair| pair[0].end < pair[1].start)
}

impl From<Interval> for IntervalSet {
    fn from(interval: Interval) -> Self {
        Self { intervals: vec![interval] }
    }
}

impl FromIterator<Interval> for IntervalSet {
    fn from_iter<I: IntoIterator<Item = Interval>>(iter: I) -> Self {
        Self::from_intervals(iter)
    }
}

impl IntoIterator for IntervalSet {
    type Item = Interval;
    type IntoIter = std::vec::IntoIter<Interval>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.into_iter()
    }
}

impl<'a> IntoIterator for &'a IntervalSet {
    type Item = &'a Interval;
    type IntoIter = std::slice::Iter<'a, Interval>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.iter()
    }
}

impl<'de> Deserialize<'de> for IntervalSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<Interval>::deserialize(deserializer).map(Self::from_intervals)
    }
}
