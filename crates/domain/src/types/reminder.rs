//! Reminders and their repeat kinds

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ids::EntityId;
use crate::errors::UnsupportedRepeatKind;
use crate::impl_domain_kind_conversions;

/// How often a reminder fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepeatKind {
    /// Fires once at its scheduled time
    Once,
    /// Same time every day
    Daily,
    /// Same weekday and time every week
    Weekly,
    /// Same day of month and time every month
    Monthly,
    /// Same date and time every year
    Yearly,
}

impl_domain_kind_conversions!(RepeatKind, UnsupportedRepeatKind {
    Once => "ONCE",
    Daily => "DAILY",
    Weekly => "WEEKLY",
    Monthly => "MONTHLY",
    Yearly => "YEARLY",
});

impl RepeatKind {
    /// Whether the reminder fires more than once
    pub fn is_recurring(self) -> bool {
        !matches!(self, Self::Once)
    }
}

/// A reminder attached to an entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    /// Time-ordered identifier
    pub id: Uuid,
    /// Entity to remind
    pub entity_id: EntityId,
    /// First (or only) firing time
    pub fire_at: DateTime<Utc>,
    /// Repeat cadence
    pub repeat: RepeatKind,
    /// Text delivered to the entity
    pub message: String,
}

impl Reminder {
    /// New reminder with a fresh v7 id
    pub fn new(
        entity_id: EntityId,
        fire_at: DateTime<Utc>,
        repeat: RepeatKind,
        message: impl Into<String>,
    ) -> Self {
        Self { id: Uuid::now_v7(), entity_id, fire_at, repeat, message: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_repeat_kind_parses_application_names() {
        assert_eq!(RepeatKind::from_str("WEEKLY").unwrap(), RepeatKind::Weekly);
        assert_eq!(RepeatKind::from_str("daily").unwrap(), RepeatKind::Daily);
        assert_eq!(
            RepeatKind::from_str("FORTNIGHTLY"),
            Err(UnsupportedRepeatKind("FORTNIGHTLY".to_string()))
        );
        assert_eq!(RepeatKind::Monthly.to_string(), "MONTHLY");
    }

    #[test]
    fn test_serde_uses_upper_case_names() {
        assert_eq!(serde_json::to_string(&RepeatKind::Yearly).unwrap(), "\"YEARLY\"");
        assert!(!RepeatKind::Once.is_recurring());
        assert!(RepeatKind::Weekly.is_recurring());
    }
}
