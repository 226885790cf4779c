//! Shared test doubles for infra integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use slotwise_core::ReminderDispatcher;
use slotwise_domain::{Reminder, Result, SlotwiseError};
use uuid::Uuid;

/// Dispatcher that records every reminder it is asked to deliver
#[derive(Clone, Default)]
pub struct RecordingDispatcher {
    delivered: Arc<Mutex<Vec<Reminder>>>,
    calls: Arc<AtomicUsize>,
    fail: bool,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every dispatch returns an error after being recorded
    pub fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn delivered_ids(&self) -> Vec<Uuid> {
        self.delivered.lock().iter().map(|r| r.id).collect()
    }

    /// Poll until `count` dispatches were seen or `within` elapses
    pub async fn wait_for_calls(&self, count: usize, within: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + within;
        while tokio::time::Instant::now() < deadline {
            if self.call_count() >= count {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        self.call_count() >= count
    }
}

#[async_trait]
impl ReminderDispatcher for RecordingDispatcher {
    async fn dispatch(&self, reminder: &Reminder) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.delivered.lock().push(reminder.clone());
        if self.fail {
            return Err(SlotwiseError::Internal("push gateway offline".to_string()));
        }
        Ok(())
    }
}
