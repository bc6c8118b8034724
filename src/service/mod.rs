//! Application services over the backend contracts.
//!
//! Each service owns handles to the collaborators it needs and maps one
//! user action (submit a form, open a page) to a short sequence of store
//! calls. Errors are returned, never retried.

mod account;
mod booking;
mod calendar;
mod catalog;

pub use account::AccountService;
pub use booking::BookingService;
pub use calendar::CalendarService;
pub use catalog::CatalogService;

pub(crate) const USERS: &str = "users";
pub(crate) const EVENTS: &str = "events";
