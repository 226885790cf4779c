//! # Slotwise Domain
//!
//! Value types and error definitions for the availability engine.
//!
//! This crate contains:
//! - Time primitives (`Interval`, `IntervalSet`) and their set algebra
//! - Operating-hours schedules, appointments, queries and reminders
//! - Domain error types and Result definitions
//! - Configuration structures and defaults
//!
//! ## Architecture
//! - No dependencies on other Slotwise crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
