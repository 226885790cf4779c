//! Shared test helpers for `slotwise-core` integration tests.
//!
//! These helpers provide reusable fixtures and lightweight mocks so that
//! resolver tests can focus on behaviour instead of boilerplate. Every mock
//! counts its calls so tests can assert what was (not) fetched.

#![allow(dead_code)]

pub mod calendar;
pub mod location;

use chrono::{DateTime, TimeZone, Utc};
use slotwise_domain::Interval;

/// `2025-07-01T{hour}:{minute}Z` (a Tuesday)
pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 7, 1, hour, minute, 0).unwrap()
}

/// Whole-hour interval on 2025-07-01
pub fn hours(start: u32, end: u32) -> Interval {
    Interval::new(at(start, 0), at(end, 0)).unwrap()
}
