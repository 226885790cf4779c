//! In-process implementations of the availability ports

pub mod memory;

pub use memory::{InMemoryCalendarRepository, InMemoryLocationRepository};
