//! bookery - equipment and room booking
//!
//! Reservation bookkeeping for shared equipment and rooms: a half-open
//! overlap checker, per-day schedules, and thin services over a hosted
//! document store, authentication provider and file storage.

pub mod checker;
pub mod config;
pub mod error;
pub mod interval;
pub mod model;
pub mod schedule;
pub mod service;
pub mod store;
pub mod time;

pub use checker::{conflicting_reservations, is_interval_free};
pub use config::Config;
pub use error::{BookingError, BookingResult};
pub use time::TimeOfDay;

/// Identifier type used for documents, resources and users.
pub type Id = String;

/// Generates a new unique identifier (UUID v4).
pub fn generate_id() -> Id {
    uuid::Uuid::new_v4().to_string()
}
