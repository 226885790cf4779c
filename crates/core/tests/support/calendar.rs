use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use slotwise_core::CalendarRepository;
use slotwise_domain::{EntityId, Interval, LookupError};

#[derive(Clone)]
enum Entry {
    Busy(Vec<Interval>),
    Fails(LookupError),
}

/// In-memory mock for `CalendarRepository`.
///
/// Entities are registered with either their busy intervals or the lookup
/// error to return. Unknown entities answer `LookupError::NotFound`. Every
/// call is counted and recorded; an optional delay simulates slow backends.
#[derive(Default, Clone)]
pub struct MockCalendarRepository {
    entries: Arc<Mutex<HashMap<EntityId, Entry>>>,
    delays: Arc<Mutex<HashMap<EntityId, Duration>>>,
    calls: Arc<AtomicUsize>,
    requested: Arc<Mutex<Vec<EntityId>>>,
}

impl MockCalendarRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity with its busy intervals.
    pub fn with_busy(self, entity_id: &str, busy: Vec<Interval>) -> Self {
        self.entries.lock().unwrap().insert(EntityId::new(entity_id), Entry::Busy(busy));
        self
    }

    /// Register an entity whose lookup fails with `error`.
    pub fn with_failure(self, entity_id: &str, error: LookupError) -> Self {
        self.entries.lock().unwrap().insert(EntityId::new(entity_id), Entry::Fails(error));
        self
    }

    /// Delay every answer for `entity_id`.
    pub fn with_delay(self, entity_id: &str, delay: Duration) -> Self {
        self.delays.lock().unwrap().insert(EntityId::new(entity_id), delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requested(&self) -> Vec<EntityId> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl CalendarRepository for MockCalendarRepository {
    async fn get_busy_intervals(
        &self,
        entity_id: &EntityId,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> Result<Vec<Interval>, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(entity_id.clone());

        let delay = self.delays.lock().unwrap().get(entity_id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let entry = self.entries.lock().unwrap().get(entity_id).cloned();
        match entry {
            Some(Entry::Busy(busy)) => Ok(busy
                .into_iter()
                .filter(|interval| interval.start() < range_end && range_start < interval.end())
                .collect()),
            Some(Entry::Fails(error)) => Err(error),
            None => Err(LookupError::NotFound(entity_id.to_string())),
        }
    }
}
