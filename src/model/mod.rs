//! Documents stored in the hosted database and the forms that create them.
//!
//! Every stored type implements [`Record`]: it serialises to the document
//! body, and the document id (which lives outside the body) is attached
//! after reading.

mod catalog;
mod event;
mod reservation;
mod user;

pub use catalog::{CatalogItem, Equipment, ImageUpload, NewCatalogItem, ResourceKind, ResourceRef, Room};
pub use event::{parse_local_datetime, CalendarEvent, EventKind, NewEvent};
pub use reservation::{BookingRequest, Reservation};
pub use user::{AuthIdentity, Credentials, Role, SignUpForm, UserPatch, UserProfile, MIN_PASSWORD_LEN};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{BookingError, BookingResult};
use crate::Id;

/// A type stored as a document body keyed by an external id.
pub trait Record: Serialize + DeserializeOwned {
    fn set_id(&mut self, id: Id);
}

/// Rejects empty or whitespace-only required fields.
pub(crate) fn require(value: &str, message: &str) -> BookingResult<()> {
    if value.trim().is_empty() {
        return Err(BookingError::validation(message));
    }
    Ok(())
}
