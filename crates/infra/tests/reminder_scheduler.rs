//! Integration tests for `ReminderScheduler` lifecycle and delivery.

mod support;

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use slotwise_common::{Clock, MockClock};
use slotwise_core::RecurrencePlan;
use slotwise_domain::{EntityId, Reminder, RepeatKind};
use slotwise_infra::scheduling::{ReminderScheduler, ReminderSchedulerConfig, SchedulerError};
use support::RecordingDispatcher;
use uuid::Uuid;

fn scheduler_with(dispatcher: &RecordingDispatcher, clock: &MockClock) -> ReminderScheduler {
    ReminderScheduler::new(Arc::new(dispatcher.clone()), Arc::new(clock.clone()))
}

fn weekly_standup() -> Reminder {
    // Tuesday 14:30 UTC
    let fire_at = Utc.with_ymd_and_hms(2025, 7, 1, 14, 30, 0).unwrap();
    Reminder::new(EntityId::new("worker-7"), fire_at, RepeatKind::Weekly, "Stand-up")
}

/// Validates start/stop transitions and their guard errors.
#[tokio::test(flavor = "multi_thread")]
async fn test_lifecycle_guards() {
    let dispatcher = RecordingDispatcher::new();
    let mut scheduler = scheduler_with(&dispatcher, &MockClock::new());

    assert!(!scheduler.is_running());
    assert!(matches!(scheduler.stop().await, Err(SchedulerError::NotRunning)));

    scheduler.start().await.unwrap();
    assert!(scheduler.is_running());
    assert!(matches!(scheduler.start().await, Err(SchedulerError::AlreadyRunning)));

    scheduler.stop().await.unwrap();
    assert!(!scheduler.is_running());

    // Restart after a clean stop
    scheduler.start().await.unwrap();
    scheduler.stop().await.unwrap();
}

/// Validates a disabled scheduler refuses to start but still accepts reminders.
#[tokio::test(flavor = "multi_thread")]
async fn test_disabled_scheduler_refuses_start() {
    let dispatcher = RecordingDispatcher::new();
    let config = ReminderSchedulerConfig { enabled: false, ..Default::default() };
    let mut scheduler = ReminderScheduler::with_config(
        config,
        Arc::new(dispatcher.clone()),
        Arc::new(MockClock::new()),
    );

    assert!(matches!(scheduler.start().await, Err(SchedulerError::Disabled)));
    assert!(!scheduler.is_running());

    scheduler.schedule(weekly_standup()).await.unwrap();
    assert_eq!(scheduler.scheduled_count(), 1);
}

/// Validates a weekly reminder gets its cron plan and next firing time.
#[tokio::test(flavor = "multi_thread")]
async fn test_recurring_reminder_plan() {
    let dispatcher = RecordingDispatcher::new();
    let clock = MockClock::at(Utc.with_ymd_and_hms(2025, 7, 2, 9, 0, 0).unwrap());
    let mut scheduler = scheduler_with(&dispatcher, &clock);
    scheduler.start().await.unwrap();

    let reminder = weekly_standup();
    let plan = scheduler.schedule(reminder.clone()).await.unwrap();

    match &plan {
        RecurrencePlan::Recurring(cron) => assert_eq!(cron.to_string(), "30 14 * * 2"),
        RecurrencePlan::OneShot(_) => panic!("weekly reminder must recur"),
    }
    assert!(scheduler.is_scheduled(reminder.id));
    assert_eq!(
        scheduler.next_fire(reminder.id),
        Some(Utc.with_ymd_and_hms(2025, 7, 8, 14, 30, 0).unwrap())
    );

    scheduler.stop().await.unwrap();
    // Reminders survive a stop
    assert_eq!(scheduler.scheduled_count(), 1);
}

/// Validates a due one-off reminder is dispatched once and then forgotten.
#[tokio::test(flavor = "multi_thread")]
async fn test_due_one_off_reminder_fires_and_leaves_registry() {
    let dispatcher = RecordingDispatcher::new();
    let clock = MockClock::new();
    let mut scheduler = scheduler_with(&dispatcher, &clock);
    scheduler.start().await.unwrap();

    let reminder = Reminder::new(
        EntityId::new("worker-7"),
        clock.now() - chrono::Duration::minutes(5),
        RepeatKind::Once,
        "Pick up keys",
    );
    let reminder_id = reminder.id;
    let plan = scheduler.schedule(reminder).await.unwrap();
    assert_eq!(plan, RecurrencePlan::OneShot(Duration::ZERO));

    assert!(dispatcher.wait_for_calls(1, Duration::from_secs(5)).await);
    assert_eq!(dispatcher.delivered_ids(), vec![reminder_id]);

    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while scheduler.is_scheduled(reminder_id) && tokio::time::Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(!scheduler.is_scheduled(reminder_id));

    scheduler.stop().await.unwrap();
}

/// Validates reminders scheduled before start are registered on start.
#[tokio::test(flavor = "multi_thread")]
async fn test_pending_reminders_registered_on_start() {
    let dispatcher = RecordingDispatcher::failing();
    let clock = MockClock::new();
    let mut scheduler = scheduler_with(&dispatcher, &clock);

    let reminder =
        Reminder::new(EntityId::new("room-3"), clock.now(), RepeatKind::Once, "Close room");
    scheduler.schedule(reminder).await.unwrap();
    assert_eq!(dispatcher.call_count(), 0);

    scheduler.start().await.unwrap();
    // Dispatch failures are logged, not propagated
    assert!(dispatcher.wait_for_calls(1, Duration::from_secs(5)).await);
    scheduler.stop().await.unwrap();
}

/// Validates cancellation of known and unknown reminders.
#[tokio::test(flavor = "multi_thread")]
async fn test_cancel() {
    let dispatcher = RecordingDispatcher::new();
    let mut scheduler = scheduler_with(&dispatcher, &MockClock::new());
    scheduler.start().await.unwrap();

    let unknown = Uuid::now_v7();
    assert!(matches!(
        scheduler.cancel(unknown).await,
        Err(SchedulerError::UnknownReminder(id)) if id == unknown
    ));

    let reminder = weekly_standup();
    scheduler.schedule(reminder.clone()).await.unwrap();
    scheduler.cancel(reminder.id).await.unwrap();
    assert!(!scheduler.is_scheduled(reminder.id));
    assert_eq!(scheduler.next_fire(reminder.id), None);

    scheduler.stop().await.unwrap();
}

/// Validates rescheduling the same id replaces the earlier reminder.
#[tokio::test(flavor = "multi_thread")]
async fn test_reschedule_replaces_existing() {
    let dispatcher = RecordingDispatcher::new();
    let clock = MockClock::at(Utc.with_ymd_and_hms(2025, 7, 2, 9, 0, 0).unwrap());
    let mut scheduler = scheduler_with(&dispatcher, &clock);
    scheduler.start().await.unwrap();

    let mut reminder = weekly_standup();
    scheduler.schedule(reminder.clone()).await.unwrap();

    reminder.repeat = RepeatKind::Daily;
    let plan = scheduler.schedule(reminder.clone()).await.unwrap();

    assert!(plan.is_recurring());
    assert_eq!(scheduler.scheduled_count(), 1);
    assert_eq!(
        scheduler.next_fire(reminder.id),
        Some(Utc.with_ymd_and_hms(2025, 7, 2, 14, 30, 0).unwrap())
    );

    scheduler.stop().await.unwrap();
}

/// Validates the monitor keeps the earliest upcoming firing current.
#[tokio::test(flavor = "multi_thread")]
async fn test_monitor_tracks_next_due() {
    let dispatcher = RecordingDispatcher::new();
    let clock = MockClock::at(Utc.with_ymd_and_hms(2025, 7, 2, 9, 0, 0).unwrap());
    let config = ReminderSchedulerConfig {
        monitor_interval: Duration::from_millis(20),
        ..Default::default()
    };
    let mut scheduler = ReminderScheduler::with_config(
        config,
        Arc::new(dispatcher.clone()),
        Arc::new(clock.clone()),
    );
    scheduler.start().await.unwrap();
    scheduler.schedule(weekly_standup()).await.unwrap();

    let expected = Utc.with_ymd_and_hms(2025, 7, 8, 14, 30, 0).unwrap();
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while scheduler.next_due() != Some(expected) && tokio::time::Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(scheduler.next_due(), Some(expected));

    scheduler.stop().await.unwrap();
    assert_eq!(scheduler.next_due(), None);
}
