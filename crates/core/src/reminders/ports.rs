//! Port interface for reminder delivery

use async_trait::async_trait;
use slotwise_domain::{Reminder, Result};

/// Delivers a due reminder (push notification, socket message, ...)
#[async_trait]
pub trait ReminderDispatcher: Send + Sync {
    /// Deliver `reminder` to its entity
    async fn dispatch(&self, reminder: &Reminder) -> Result<()>;
}
