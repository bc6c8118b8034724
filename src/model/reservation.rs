use chrono::{DateTime, NaiveDate, Utc};
use qtty::Minute;
use serde::{Deserialize, Serialize};

use super::{Record, ResourceRef};
use crate::interval::Interval;
use crate::time::TimeOfDay;
use crate::Id;

/// A claimed `[start_time, end_time)` slot on a resource for one date.
///
/// Reservations are never edited once stored. The resource id is not part
/// of the document body; it is implied by the bookings subcollection the
/// document lives in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    #[serde(skip)]
    pub id: Id,
    #[serde(skip)]
    pub resource_id: Id,
    pub date: NaiveDate,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    pub fn new(
        resource_id: impl Into<Id>,
        date: NaiveDate,
        start_time: TimeOfDay,
        end_time: TimeOfDay,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Id::new(),
            resource_id: resource_id.into(),
            date,
            start_time,
            end_time,
            created_at,
        }
    }

    /// Re-attaches the resource a stored booking belongs to.
    pub fn on_resource(mut self, resource_id: impl Into<Id>) -> Self {
        self.resource_id = resource_id.into();
        self
    }

    pub fn is_on(&self, resource_id: &str, date: NaiveDate) -> bool {
        self.resource_id == resource_id && self.date == date
    }

    /// The booked slot on a minute axis, or `None` if the stored times are reversed.
    pub fn interval(&self) -> Option<Interval<Minute>> {
        Interval::checked(self.start_time.as_quantity(), self.end_time.as_quantity())
    }
}

impl Record for Reservation {
    fn set_id(&mut self, id: Id) {
        self.id = id;
    }
}

/// A booking form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub resource: ResourceRef,
    pub date: NaiveDate,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl BookingRequest {
    pub fn new(resource: ResourceRef, date: NaiveDate, start: TimeOfDay, end: TimeOfDay) -> Self {
        Self {
            resource,
            date,
            start,
            end,
        }
    }
}
