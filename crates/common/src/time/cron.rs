//! Cron expression parsing, construction and evaluation
//!
//! Expressions use the standard five fields
//! `minute hour day-of-month month day-of-week`, with Sunday as weekday `0`.

use std::fmt;

use chrono::{DateTime, Datelike, Duration, DurationRound, Timelike, Utc};
use thiserror::Error;

/// Error type for cron parsing
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CronParseError {
    /// Blank or unparseable expression
    #[error("Invalid cron expression: {0}")]
    InvalidExpression(String),

    /// A field is not a number, list, range or step
    #[error("Invalid field: {0}")]
    InvalidField(String),

    /// A value falls outside its field's bounds
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// More than five fields
    #[error("Too many fields: expected 5, got {0}")]
    TooManyFields(usize),

    /// Fewer than five fields
    #[error("Too few fields: expected 5, got {0}")]
    TooFewFields(usize),
}

const MINUTE_BOUNDS: (u32, u32) = (0, 59);
const HOUR_BOUNDS: (u32, u32) = (0, 23);
const DAY_BOUNDS: (u32, u32) = (1, 31);
const MONTH_BOUNDS: (u32, u32) = (1, 12);
const WEEKDAY_BOUNDS: (u32, u32) = (0, 6);

/// A parsed cron expression
///
/// # Examples
///
/// ```
/// use slotwise_common::time::cron::{CronExpression, CronField};
///
/// // Every Tuesday at 14:30
/// let cron = CronExpression::parse("30 14 * * 2").unwrap();
///
/// let built = CronExpression::new(
///     CronField::Single(30),
///     CronField::Single(14),
///     CronField::Any,
///     CronField::Any,
///     CronField::Single(2),
/// )
/// .unwrap();
/// assert_eq!(cron, built);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronExpression {
    minute: CronField,
    hour: CronField,
    day: CronField,
    month: CronField,
    weekday: CronField,
}

impl CronExpression {
    /// Build an expression from already-structured fields, validating each
    /// against its allowed range.
    pub fn new(
        minute: CronField,
        hour: CronField,
        day: CronField,
        month: CronField,
        weekday: CronField,
    ) -> Result<Self, CronParseError> {
        minute.validate(MINUTE_BOUNDS)?;
        hour.validate(HOUR_BOUNDS)?;
        day.validate(DAY_BOUNDS)?;
        month.validate(MONTH_BOUNDS)?;
        weekday.validate(WEEKDAY_BOUNDS)?;
        Ok(Self { minute, hour, day, month, weekday })
    }

    /// Parse a cron expression from a string
    pub fn parse(expr: &str) -> Result<Self, CronParseError> {
        let parts: Vec<&str> = expr.split_whitespace().collect();

        if parts.is_empty() {
            return Err(CronParseError::InvalidExpression(expr.to_string()));
        }
        if parts.len() < 5 {
            return Err(CronParseError::TooFewFields(parts.len()));
        }
        if parts.len() > 5 {
            return Err(CronParseError::TooManyFields(parts.len()));
        }

        Ok(Self {
            minute: CronField::parse(parts[0], MINUTE_BOUNDS)?,
            hour: CronField::parse(parts[1], HOUR_BOUNDS)?,
            day: CronField::parse(parts[2], DAY_BOUNDS)?,
            month: CronField::parse(parts[3], MONTH_BOUNDS)?,
            weekday: CronField::parse(parts[4], WEEKDAY_BOUNDS)?,
        })
    }

    /// Minute field
    pub fn minute(&self) -> &CronField {
        &self.minute
    }

    /// Hour field
    pub fn hour(&self) -> &CronField {
        &self.hour
    }

    /// Day-of-month field
    pub fn day(&self) -> &CronField {
        &self.day
    }

    /// Month field
    pub fn month(&self) -> &CronField {
        &self.month
    }

    /// Day-of-week field (Sunday = 0)
    pub fn weekday(&self) -> &CronField {
        &self.weekday
    }

    /// Render the expression in the six-field dialect used by job schedulers:
    /// a leading seconds field (always `0`) and weekdays spelled by name,
    /// since that dialect numbers Sunday as `1` rather than `0`.
    pub fn to_seconds_pattern(&self) -> String {
        format!(
            "0 {} {} {} {} {}",
            self.minute,
            self.hour,
            self.day,
            self.month,
            weekday_names(&self.weekday)
        )
    }

    /// Check if a datetime matches this cron expression
    pub fn matches(&self, dt: &DateTime<Utc>) -> bool {
        self.minute.matches(dt.minute())
            && self.hour.matches(dt.hour())
            && self.day.matches(dt.day())
            && self.month.matches(dt.month())
            && self.weekday.matches(dt.weekday().num_days_from_sunday())
    }

    /// Get the next occurrence strictly after the given datetime
    pub fn next_after(&self, dt: &DateTime<Utc>) -> Option<DateTime<Utc>> {
        let base = dt.duration_trunc(Duration::minutes(1)).unwrap_or(*dt);
        let mut current = base + Duration::minutes(1);

        // Search up to 4 years in the future
        for _ in 0..(4 * 366 * 24 * 60) {
            if self.matches(&current) {
                return Some(current);
            }
            current += Duration::minutes(1);
        }

        None
    }
}

impl fmt::Display for CronExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {} {}", self.minute, self.hour, self.day, self.month, self.weekday)
    }
}

impl std::str::FromStr for CronExpression {
    type Err = CronParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

fn weekday_name(value: u32) -> &'static str {
    WEEKDAY_NAMES[value as usize % WEEKDAY_NAMES.len()]
}

fn weekday_names(field: &CronField) -> String {
    match field {
        CronField::Any => "*".to_string(),
        CronField::Single(v) => weekday_name(*v).to_string(),
        CronField::List(values) => {
            values.iter().map(|v| weekday_name(*v)).collect::<Vec<_>>().join(",")
        }
        CronField::Range(start, end) => {
            format!("{}-{}", weekday_name(*start), weekday_name(*end))
        }
        CronField::Step(start, step) => (*start..=WEEKDAY_BOUNDS.1)
            .step_by(*step as usize)
            .map(weekday_name)
            .collect::<Vec<_>>()
            .join(","),
    }
}

/// A cron field (minute, hour, day, month, weekday)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CronField {
    /// `*`
    Any,
    /// A single value
    Single(u32),
    /// Comma-separated values
    List(Vec<u32>),
    /// Inclusive range `start-end`
    Range(u32, u32),
    /// `start/step`
    Step(u32, u32),
}

impl CronField {
    fn parse(s: &str, (min, max): (u32, u32)) -> Result<Self, CronParseError> {
        if s == "*" {
            return Ok(Self::Any);
        }

        let field = if s.contains(',') {
            let values: Result<Vec<u32>, _> = s.split(',').map(|v| v.trim().parse()).collect();
            Self::List(values.map_err(|_| CronParseError::InvalidField(s.to_string()))?)
        } else if s.contains('/') {
            let (start, step) =
                s.split_once('/').ok_or_else(|| CronParseError::InvalidField(s.to_string()))?;

            let start = if start == "*" {
                min
            } else {
                start.parse().map_err(|_| CronParseError::InvalidField(s.to_string()))?
            };
            let step = step.parse().map_err(|_| CronParseError::InvalidField(s.to_string()))?;

            Self::Step(start, step)
        } else if s.contains('-') {
            let (start, end) =
                s.split_once('-').ok_or_else(|| CronParseError::InvalidField(s.to_string()))?;
            let start = start.parse().map_err(|_| CronParseError::InvalidField(s.to_string()))?;
            let end = end.parse().map_err(|_| CronParseError::InvalidField(s.to_string()))?;

            Self::Range(start, end)
        } else {
            Self::Single(s.parse().map_err(|_| CronParseError::InvalidField(s.to_string()))?)
        };

        field.validate((min, max))?;
        Ok(field)
    }

    fn validate(&self, (min, max): (u32, u32)) -> Result<(), CronParseError> {
        let in_range = |v: u32| v >= min && v <= max;
        match self {
            Self::Any => Ok(()),
            Self::Single(v) if in_range(*v) => Ok(()),
            Self::Single(v) => {
                Err(CronParseError::InvalidRange(format!("{} not in range {}-{}", v, min, max)))
            }
            Self::List(values) => match values.iter().find(|v| !in_range(**v)) {
                Some(v) => {
                    Err(CronParseError::InvalidRange(format!("{} not in range {}-{}", v, min, max)))
                }
                None if values.is_empty() => {
                    Err(CronParseError::InvalidField("empty list".to_string()))
                }
                None => Ok(()),
            },
            Self::Range(start, end) if in_range(*start) && in_range(*end) && start <= end => Ok(()),
            Self::Range(start, end) => Err(CronParseError::InvalidRange(format!(
                "{}-{} not valid in range {}-{}",
                start, end, min, max
            ))),
            Self::Step(_, 0) => Err(CronParseError::InvalidField("step of 0".to_string())),
            Self::Step(start, _) if in_range(*start) => Ok(()),
            Self::Step(start, step) => Err(CronParseError::InvalidRange(format!(
                "{}/{} not valid in range {}-{}",
                start, step, min, max
            ))),
        }
    }

    fn matches(&self, value: u32) -> bool {
        match self {
            Self::Any => true,
            Self::Single(v) => *v == value,
            Self::List(values) => values.contains(&value),
            Self::Range(start, end) => value >= *start && value <= *end,
            Self::Step(start, step) => value >= *start && (value - start) % step == 0,
        }
    }
}

impl fmt::Display for CronField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "*"),
            Self::Single(v) => write!(f, "{}", v),
            Self::List(values) => {
                let strs: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "{}", strs.join(","))
            }
            Self::Range(start, end) => write!(f, "{}-{}", start, end),
            Self::Step(start, step) => write!(f, "{}/{}", start, step),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_monthly_reminder_fields() {
        let cron = CronExpression::parse("15 8 31 * *").unwrap();
        assert_eq!(cron.minute(), &CronField::Single(15));
        assert_eq!(cron.day(), &CronField::Single(31));
        assert_eq!(cron.weekday, CronField::Any);
    }

    #[test]
    fn test_parse_range_list_and_step() {
        let cron = CronExpression::parse("*/5 9-17 * * 1,3,5").unwrap();
        assert_eq!(cron.minute, CronField::Step(0, 5));
        assert_eq!(cron.hour, CronField::Range(9, 17));
        assert_eq!(cron.weekday, CronField::List(vec![1, 3, 5]));
    }

    #[test]
    fn test_new_validates_ranges() {
        let bad = CronExpression::new(
            CronField::Single(60),
            CronField::Any,
            CronField::Any,
            CronField::Any,
            CronField::Any,
        );
        assert!(matches!(bad, Err(CronParseError::InvalidRange(_))));

        let bad_weekday = CronExpression::new(
            CronField::Any,
            CronField::Any,
            CronField::Any,
            CronField::Any,
            CronField::Single(7),
        );
        assert!(bad_weekday.is_err());
    }

    #[test]
    fn test_display_round_trips_parse() {
        let expr = "30 14 1 7 *";
        assert_eq!(CronExpression::parse(expr).unwrap().to_string(), expr);
    }

    #[test]
    fn test_seconds_pattern_names_weekdays() {
        let cron = CronExpression::parse("30 14 * * 2").unwrap();
        assert_eq!(cron.to_seconds_pattern(), "0 30 14 * * Tue");

        let cron = CronExpression::parse("0 9 1 * *").unwrap();
        assert_eq!(cron.to_seconds_pattern(), "0 0 9 1 * *");

        let cron = CronExpression::parse("0 9 * * 1-5").unwrap();
        assert_eq!(cron.to_seconds_pattern(), "0 0 9 * * Mon-Fri");

        let cron = CronExpression::parse("0 9 * * 0/3").unwrap();
        assert_eq!(cron.to_seconds_pattern(), "0 0 9 * * Sun,Wed,Sat");
    }

    #[test]
    fn test_yearly_pattern_matches_only_its_day() {
        let birthday = CronExpression::parse("0 10 14 2 *").unwrap();

        assert!(birthday.matches(&Utc.with_ymd_and_hms(2026, 2, 14, 10, 0, 0).unwrap()));
        assert!(!birthday.matches(&Utc.with_ymd_and_hms(2026, 3, 14, 10, 0, 0).unwrap()));
        assert!(!birthday.matches(&Utc.with_ymd_and_hms(2026, 2, 14, 10, 1, 0).unwrap()));
    }

    #[test]
    fn test_next_after_is_minute_aligned() {
        let cron = CronExpression::parse("0 0 * * *").unwrap();

        let dt = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 42).unwrap();
        let next = cron.next_after(&dt).unwrap();

        assert_eq!(next, Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_next_after_weekly() {
        // 2025-07-01 is a Tuesday
        let cron = CronExpression::parse("30 14 * * 2").unwrap();
        let dt = Utc.with_ymd_and_hms(2025, 7, 1, 14, 30, 0).unwrap();

        let next = cron.next_after(&dt).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2025, 7, 8, 14, 30, 0).unwrap());
    }

    #[test]
    fn test_invalid_expression() {
        assert!(CronExpression::parse("invalid").is_err());
        assert!(CronExpression::parse("").is_err());
        assert!(CronExpression::parse("60 * * * *").is_err());
        assert!(CronExpression::parse("* 25 * * *").is_err());
        assert!(CronExpression::parse("*/0 * * * *").is_err());
        assert!(CronExpression::parse("* * * * * *").is_err());
    }
}
