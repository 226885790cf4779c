//! Availability resolution: ports, schedule clipping and the resolver

pub mod clipper;
pub mod error;
pub mod ports;
pub mod resolver;

pub use clipper::ScheduleClipper;
pub use error::{AvailabilityError, AvailabilityResult};
pub use ports::{CalendarRepository, LocationRepository};
pub use resolver::AvailabilityResolver;
