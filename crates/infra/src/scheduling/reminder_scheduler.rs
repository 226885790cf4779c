//! Reminder scheduler for recurring and one-off reminder delivery.
//!
//! Each reminder becomes one job on a cron-based scheduler: recurring
//! reminders fire on their cron pattern (UTC), one-off reminders fire once
//! after a delay computed from the injected clock. Join handles are tracked,
//! cancellation is explicit, and every asynchronous operation is wrapped in a
//! timeout.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use chrono::Utc;
//! use slotwise_common::SystemClock;
//! use slotwise_core::ReminderDispatcher;
//! use slotwise_domain::{EntityId, Reminder, RepeatKind};
//! use slotwise_infra::scheduling::{ReminderScheduler, SchedulerResult};
//!
//! # async fn example(dispatcher: Arc<dyn ReminderDispatcher>) -> SchedulerResult<()> {
//! let mut scheduler = ReminderScheduler::new(dispatcher, Arc::new(SystemClock));
//! scheduler.start().await?;
//!
//! let reminder = Reminder::new(EntityId::new("worker-7"), Utc::now(), RepeatKind::Weekly, "Stand-up");
//! scheduler.schedule(reminder).await?;
//! // ... application runs ...
//! scheduler.stop().await?;
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use slotwise_common::Clock;
use slotwise_core::{RecurrencePlan, ReminderDispatcher};
use slotwise_domain::{Reminder, ReminderConfig};
use tokio::task::JoinHandle;
use tokio_cron_scheduler::{Job, JobScheduler};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, trace, warn};
use uuid::Uuid;

use crate::scheduling::error::{SchedulerError, SchedulerResult};

type Registry = Arc<Mutex<HashMap<Uuid, Reminder>>>;
type NextDue = Arc<Mutex<Option<DateTime<Utc>>>>;

/// How often the monitor refreshes the earliest upcoming firing.
const DEFAULT_MONITOR_INTERVAL: Duration = Duration::from_secs(30);

/// Configuration for the reminder scheduler.
#[derive(Debug, Clone)]
pub struct ReminderSchedulerConfig {
    /// Whether the scheduler may be started at all.
    pub enabled: bool,
    /// Timeout applied to a single dispatch.
    pub job_timeout: Duration,
    /// Timeout for starting the underlying scheduler.
    pub start_timeout: Duration,
    /// Timeout for stopping the scheduler.
    pub stop_timeout: Duration,
    /// Timeout for awaiting the monitor task join handle.
    pub join_timeout: Duration,
    /// Period of the monitor's next-due refresh.
    pub monitor_interval: Duration,
}

impl Default for ReminderSchedulerConfig {
    fn default() -> Self {
        Self::from(&ReminderConfig::default())
    }
}

impl From<&ReminderConfig> for ReminderSchedulerConfig {
    fn from(config: &ReminderConfig) -> Self {
        Self {
            enabled: config.enabled,
            job_timeout: Duration::from_secs(config.job_timeout_secs),
            start_timeout: Duration::from_secs(config.start_timeout_secs),
            stop_timeout: Duration::from_secs(config.stop_timeout_secs),
            join_timeout: Duration::from_secs(config.stop_timeout_secs),
            monitor_interval: DEFAULT_MONITOR_INTERVAL,
        }
    }
}

/// Reminder scheduler with explicit lifecycle management.
///
/// Reminders may be scheduled before `start`; they are registered as jobs
/// when the scheduler starts and re-registered after a restart. One-off
/// reminders leave the registry once they have fired.
pub struct ReminderScheduler {
    scheduler: Option<JobScheduler>,
    config: ReminderSchedulerConfig,
    registry: Registry,
    next_due: NextDue,
    job_ids: HashMap<Uuid, Uuid>,
    monitor_handle: Option<JoinHandle<()>>,
    cancellation: CancellationToken,
    dispatcher: Arc<dyn ReminderDispatcher>,
    clock: Arc<dyn Clock>,
}

impl ReminderScheduler {
    /// Create a scheduler with the default configuration.
    pub fn new(dispatcher: Arc<dyn ReminderDispatcher>, clock: Arc<dyn Clock>) -> Self {
        Self::with_config(ReminderSchedulerConfig::default(), dispatcher, clock)
    }

    /// Create a scheduler with a custom configuration.
    pub fn with_config(
        config: ReminderSchedulerConfig,
        dispatcher: Arc<dyn ReminderDispatcher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            scheduler: None,
            config,
            registry: Arc::new(Mutex::new(HashMap::new())),
            next_due: Arc::new(Mutex::new(None)),
            job_ids: HashMap::new(),
            monitor_handle: None,
            cancellation: CancellationToken::new(),
            dispatcher,
            clock,
        }
    }

    /// Start the scheduler, registering every known reminder.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> SchedulerResult<()> {
        if !self.config.enabled {
            return Err(SchedulerError::Disabled);
        }
        if self.is_running() {
            return Err(SchedulerError::AlreadyRunning);
        }

        self.cancellation = CancellationToken::new();

        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| SchedulerError::CreationFailed(e.to_string()))?;

        let pending: Vec<Reminder> = self.registry.lock().values().cloned().collect();
        for reminder in &pending {
            let job_id = self.register_job(&scheduler, reminder).await?;
            self.job_ids.insert(reminder.id, job_id);
        }

        let start_timeout = self.config.start_timeout;
        tokio::time::timeout(start_timeout, scheduler.start())
            .await
            .map_err(|_| SchedulerError::Timeout { seconds: start_timeout.as_secs() })?
            .map_err(|e| SchedulerError::StartFailed(e.to_string()))?;

        self.scheduler = Some(scheduler);

        self.monitor_handle = Some(tokio::spawn(Self::monitor_task(
            self.cancellation.clone(),
            self.registry.clone(),
            self.next_due.clone(),
            self.clock.clone(),
            self.config.monitor_interval,
        )));

        info!(reminders = pending.len(), "Reminder scheduler started");
        Ok(())
    }

    /// Stop the scheduler and wait for the monitor task to finish.
    ///
    /// Scheduled reminders stay in the registry for the next `start`.
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> SchedulerResult<()> {
        let Some(mut scheduler) = self.scheduler.take() else {
            return Err(SchedulerError::NotRunning);
        };

        self.cancellation.cancel();
        self.job_ids.clear();

        let stop_timeout = self.config.stop_timeout;
        tokio::time::timeout(stop_timeout, async move { scheduler.shutdown().await })
            .await
            .map_err(|_| SchedulerError::Timeout { seconds: stop_timeout.as_secs() })?
            .map_err(|e| SchedulerError::StopFailed(e.to_string()))?;

        if let Some(handle) = self.monitor_handle.take() {
            let join_timeout = self.config.join_timeout;
            tokio::time::timeout(join_timeout, handle)
                .await
                .map_err(|_| SchedulerError::Timeout { seconds: join_timeout.as_secs() })?
                .map_err(|e| SchedulerError::TaskJoinFailed(e.to_string()))?;
        }

        *self.next_due.lock() = None;
        info!("Reminder scheduler stopped");
        self.cancellation = CancellationToken::new();
        Ok(())
    }

    /// Returns true when a scheduler instance is active.
    pub fn is_running(&self) -> bool {
        self.scheduler.is_some()
    }

    /// Schedule `reminder`, replacing any reminder with the same id.
    ///
    /// Returns the plan the reminder will fire on.
    #[instrument(skip(self, reminder), fields(reminder_id = %reminder.id, repeat = %reminder.repeat))]
    pub async fn schedule(&mut self, reminder: Reminder) -> SchedulerResult<RecurrencePlan> {
        let plan = RecurrencePlan::for_reminder(&reminder, self.clock.now())?;
        if matches!(plan, RecurrencePlan::OneShot(Duration::ZERO)) {
            warn!(fire_at = %reminder.fire_at, "One-off reminder is already due; firing immediately");
        }

        let reminder_id = reminder.id;
        let previous = self.registry.lock().insert(reminder_id, reminder.clone());

        if let Some(scheduler) = self.scheduler.clone() {
            let job_id = match self.register_job(&scheduler, &reminder).await {
                Ok(job_id) => job_id,
                Err(err) => {
                    restore_entry(&self.registry, reminder_id, previous);
                    return Err(err);
                }
            };
            if let Some(old_job) = self.job_ids.insert(reminder_id, job_id) {
                Self::remove_job(&scheduler, old_job).await?;
            }
        }

        Ok(plan)
    }

    /// Cancel a scheduled reminder.
    #[instrument(skip(self))]
    pub async fn cancel(&mut self, reminder_id: Uuid) -> SchedulerResult<()> {
        if self.registry.lock().remove(&reminder_id).is_none() {
            return Err(SchedulerError::UnknownReminder(reminder_id));
        }

        if let (Some(scheduler), Some(job_id)) = (&self.scheduler, self.job_ids.remove(&reminder_id))
        {
            Self::remove_job(scheduler, job_id).await?;
        }

        debug!("Reminder cancelled");
        Ok(())
    }

    /// Number of reminders waiting to fire.
    pub fn scheduled_count(&self) -> usize {
        self.registry.lock().len()
    }

    /// Whether `reminder_id` is still waiting to fire.
    pub fn is_scheduled(&self, reminder_id: Uuid) -> bool {
        self.registry.lock().contains_key(&reminder_id)
    }

    /// Earliest upcoming firing across all reminders, as last computed by
    /// the monitor. `None` before the first refresh or while stopped.
    pub fn next_due(&self) -> Option<DateTime<Utc>> {
        *self.next_due.lock()
    }

    /// Next firing time of a scheduled reminder, as seen by the clock.
    pub fn next_fire(&self, reminder_id: Uuid) -> Option<DateTime<Utc>> {
        let reminder = self.registry.lock().get(&reminder_id).cloned()?;
        let now = self.clock.now();
        RecurrencePlan::for_reminder(&reminder, now).ok()?.next_fire_after(now)
    }

    async fn register_job(
        &self,
        scheduler: &JobScheduler,
        reminder: &Reminder,
    ) -> SchedulerResult<Uuid> {
        let plan = RecurrencePlan::for_reminder(reminder, self.clock.now())?;
        let reminder_id = reminder.id;
        let dispatcher = self.dispatcher.clone();
        let registry = self.registry.clone();
        let job_timeout = self.config.job_timeout;

        let job = match &plan {
            RecurrencePlan::Recurring(cron) => {
                Job::new_async(cron.to_seconds_pattern().as_str(), move |_id, _lock| {
                    let dispatcher = dispatcher.clone();
                    let registry = registry.clone();
                    Box::pin(async move {
                        Self::fire(dispatcher, registry, reminder_id, job_timeout, false).await;
                    })
                })
            }
            RecurrencePlan::OneShot(delay) => {
                Job::new_one_shot_async(*delay, move |_id, _lock| {
                    let dispatcher = dispatcher.clone();
                    let registry = registry.clone();
                    Box::pin(async move {
                        Self::fire(dispatcher, registry, reminder_id, job_timeout, true).await;
                    })
                })
            }
        }
        .map_err(|e| SchedulerError::JobRegistrationFailed(e.to_string()))?;

        let job_id = scheduler
            .add(job)
            .await
            .map_err(|e| SchedulerError::JobRegistrationFailed(e.to_string()))?;

        match &plan {
            RecurrencePlan::Recurring(cron) => {
                debug!(reminder_id = %reminder_id, job_id = %job_id, cron = %cron, "Registered recurring reminder job");
            }
            RecurrencePlan::OneShot(delay) => {
                debug!(reminder_id = %reminder_id, job_id = %job_id, delay_secs = delay.as_secs(), "Registered one-off reminder job");
            }
        }
        Ok(job_id)
    }

    async fn remove_job(scheduler: &JobScheduler, job_id: Uuid) -> SchedulerResult<()> {
        scheduler.remove(&job_id).await.map_err(|e| SchedulerError::JobRemovalFailed(e.to_string()))
    }

    async fn fire(
        dispatcher: Arc<dyn ReminderDispatcher>,
        registry: Registry,
        reminder_id: Uuid,
        job_timeout: Duration,
        one_shot: bool,
    ) {
        let scheduled = registry.lock().get(&reminder_id).cloned();
        let Some(reminder) = scheduled else {
            debug!(reminder_id = %reminder_id, "Reminder no longer scheduled; skipping");
            return;
        };

        let started = Instant::now();
        match tokio::time::timeout(job_timeout, dispatcher.dispatch(&reminder)).await {
            Ok(Ok(())) => {
                debug!(
                    reminder_id = %reminder_id,
                    entity_id = %reminder.entity_id,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Reminder dispatched"
                );
            }
            Ok(Err(err)) => {
                error!(reminder_id = %reminder_id, error = %err, "Reminder dispatch failed");
            }
            Err(_) => {
                warn!(
                    reminder_id = %reminder_id,
                    timeout_secs = job_timeout.as_secs(),
                    "Reminder dispatch timed out"
                );
            }
        }

        if one_shot {
            registry.lock().remove(&reminder_id);
        }
    }

    async fn monitor_task(
        cancel: CancellationToken,
        registry: Registry,
        next_due: NextDue,
        clock: Arc<dyn Clock>,
        period: Duration,
    ) {
        let mut ticker = tokio::time::interval(period);
        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    debug!("Reminder scheduler monitor cancelled");
                    return;
                }
                _ = ticker.tick() => {
                    let earliest = earliest_fire(&registry, clock.now());
                    *next_due.lock() = earliest;
                    debug!(
                        reminders = registry.lock().len(),
                        next_due = ?earliest,
                        "Reminder scheduler heartbeat"
                    );
                }
            }
        }
    }
}

/// Earliest next firing over every registered reminder.
fn earliest_fire(registry: &Registry, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let reminders: Vec<Reminder> = registry.lock().values().cloned().collect();
    reminders
        .iter()
        .filter_map(|reminder| {
            let next = RecurrencePlan::for_reminder(reminder, now).ok()?.next_fire_after(now);
            trace!(reminder_id = %reminder.id, next_fire = ?next, "Next reminder firing");
            next
        })
        .min()
}

/// Put back the entry a failed replacement overwrote, or drop the new one.
fn restore_entry(registry: &Registry, reminder_id: Uuid, previous: Option<Reminder>) {
    let mut registry = registry.lock();
    match previous {
        Some(previous) => {
            registry.insert(reminder_id, previous);
        }
        None => {
            registry.remove(&reminder_id);
        }
    }
}

impl Drop for ReminderScheduler {
    fn drop(&mut self) {
        if self.is_running() {
            warn!("ReminderScheduler dropped while running; cancelling tasks");
            self.cancellation.cancel();
        }
    }
}
