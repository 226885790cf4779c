use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use slotwise_core::LocationRepository;
use slotwise_domain::{LocationId, LookupError, WeeklySchedule};

/// In-memory mock for `LocationRepository` with a call counter and an
/// optional per-location delay.
#[derive(Default, Clone)]
pub struct MockLocationRepository {
    schedules: Arc<Mutex<HashMap<LocationId, Result<WeeklySchedule, LookupError>>>>,
    delays: Arc<Mutex<HashMap<LocationId, Duration>>>,
    calls: Arc<AtomicUsize>,
}

impl MockLocationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schedule(self, location_id: &str, schedule: WeeklySchedule) -> Self {
        self.schedules.lock().unwrap().insert(LocationId::new(location_id), Ok(schedule));
        self
    }

    pub fn with_failure(self, location_id: &str, error: LookupError) -> Self {
        self.schedules.lock().unwrap().insert(LocationId::new(location_id), Err(error));
        self
    }

    pub fn with_delay(self, location_id: &str, delay: Duration) -> Self {
        self.delays.lock().unwrap().insert(LocationId::new(location_id), delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocationRepository for MockLocationRepository {
    async fn get_schedule(&self, location_id: &LocationId) -> Result<WeeklySchedule, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.delays.lock().unwrap().get(location_id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.schedules
            .lock()
            .unwrap()
            .get(location_id)
            .cloned()
            .unwrap_or_else(|| Err(LookupError::NotFound(location_id.to_string())))
    }
}
