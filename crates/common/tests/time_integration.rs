//! Integration tests for the `time` module.
//!
//! These tests drive cron evaluation from the mock clock to make sure the
//! public `slotwise_common::time` APIs work together as expected.

#![cfg(feature = "runtime")]

use chrono::{Datelike, Duration, TimeZone, Timelike, Utc};
use proptest::prelude::*;
use slotwise_common::time::{Clock, CronExpression, MockClock};

/// Next occurrences computed from a mock clock follow the clock as it moves.
#[test]
fn test_cron_next_occurrence_follows_mock_clock() {
    let cron = CronExpression::parse("0 9 1 * *").expect("monthly expression parses");
    let clock = MockClock::at(Utc.with_ymd_and_hms(2025, 1, 15, 8, 0, 0).unwrap());

    let first = cron.next_after(&clock.now()).expect("occurrence within horizon");
    assert_eq!(first, Utc.with_ymd_and_hms(2025, 2, 1, 9, 0, 0).unwrap());

    clock.set(first);
    let second = cron.next_after(&clock.now()).expect("occurrence within horizon");
    assert_eq!(second, Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap());
}

/// A yearly expression on a leap day still resolves within the search horizon.
#[test]
fn test_cron_leap_day_resolves() {
    let cron = CronExpression::parse("0 12 29 2 *").expect("leap-day expression parses");
    let from = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();

    let next = cron.next_after(&from).expect("leap day within four years");
    assert_eq!((next.year(), next.month(), next.day()), (2028, 2, 29));
}

proptest! {
    /// `next_after` always lands strictly later, on a matching minute boundary.
    #[test]
    fn next_after_is_later_and_matching(
        minute in 0u32..60,
        hour in 0u32..24,
        offset_minutes in 0i64..(60 * 24 * 14),
    ) {
        let cron = CronExpression::parse(&format!("{minute} {hour} * * *")).unwrap();
        let from = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
            + Duration::minutes(offset_minutes);

        let next = cron.next_after(&from).unwrap();
        prop_assert!(next > from);
        prop_assert!(cron.matches(&next));
        prop_assert_eq!(next.second(), 0);
        prop_assert!(next - from <= Duration::days(1));
    }
}
