//! Time utilities and abstractions
//!
//! - **[`cron`]**: 5-field cron expression parsing, construction and evaluation
//! - **[`clock`]**: wall-clock abstraction with a controllable mock for tests
//!
//! ## Usage
//!
//! ```rust
//! use slotwise_common::time::cron::CronExpression;
//!
//! let cron = CronExpression::parse("30 14 * * 2").unwrap();
//! assert_eq!(cron.to_string(), "30 14 * * 2");
//! ```

#[cfg(feature = "runtime")]
pub mod clock;
pub mod cron;

// Re-export commonly used items
#[cfg(feature = "runtime")]
pub use clock::{Clock, MockClock, SystemClock};
pub use cron::{CronExpression, CronField, CronParseError};
