//! # Slotwise Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - Configuration loading (environment and JSON/TOML files)
//! - In-memory calendar and location repositories
//! - The cron-based reminder scheduler
//! - Tracing subscriber setup
//!
//! ## Architecture
//! - Implements traits defined in `slotwise-core`
//! - Depends on `slotwise-domain` and `slotwise-core`
//! - Contains all "impure" code (I/O, clocks, background tasks)

pub mod config;
pub mod observability;
pub mod repositories;
pub mod scheduling;

// Re-export commonly used items
pub use observability::init_tracing;
pub use repositories::{InMemoryCalendarRepository, InMemoryLocationRepository};
pub use scheduling::{ReminderScheduler, ReminderSchedulerConfig, SchedulerError, SchedulerResult};
