//! Reserving equipment and rooms.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use dashmap::DashMap;
use qtty::Minute;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::checker::{conflicting_reservations, day_schedule, is_interval_free};
use crate::config::Config;
use crate::error::{BookingError, BookingResult};
use crate::interval::Interval;
use crate::model::{BookingRequest, Reservation, ResourceRef};
use crate::schedule::Schedule;
use crate::store::{DocumentStore, Filter};
use crate::time::{self, TimeOfDay};

/// Books time slots on catalog resources.
///
/// [`BookingService::book`] holds a per-resource lock from reading the
/// existing bookings until the new one is written, so two overlapping
/// requests submitted through the same service never both commit. Writers
/// that go to the store directly are not covered by that lock.
pub struct BookingService {
    store: Arc<dyn DocumentStore>,
    config: Config,
    locks: DashMap<ResourceRef, Arc<Mutex<()>>>,
}

impl BookingService {
    pub fn new(store: Arc<dyn DocumentStore>, config: Config) -> Self {
        Self {
            store,
            config,
            locks: DashMap::new(),
        }
    }

    /// Start-time choices for the booking form.
    pub fn start_slots(&self) -> BookingResult<Vec<TimeOfDay>> {
        Ok(time::time_slots(self.config.slot_minutes)?)
    }

    /// End-time choices once `start` is picked.
    pub fn end_slots(&self, start: TimeOfDay) -> BookingResult<Vec<TimeOfDay>> {
        Ok(time::end_slots_after(start, self.config.slot_minutes)?)
    }

    /// An unsubmitted form with the configured default times.
    pub fn draft(&self, resource: ResourceRef, date: NaiveDate) -> BookingRequest {
        BookingRequest::new(resource, date, self.config.default_start, self.config.default_end)
    }

    /// Moves the start of a draft, pushing the end along when it would fall behind.
    pub fn change_start(&self, draft: &mut BookingRequest, start: TimeOfDay) {
        draft.start = start;
        draft.end = time::adjusted_end(start, draft.end, self.config.slot_minutes);
    }

    /// All bookings of `resource`, sorted by date then start time.
    pub async fn list_bookings(&self, resource: &ResourceRef) -> BookingResult<Vec<Reservation>> {
        self.query_bookings(resource, &[]).await
    }

    pub async fn bookings_on(
        &self,
        resource: &ResourceRef,
        date: NaiveDate,
    ) -> BookingResult<Vec<Reservation>> {
        self.query_bookings(resource, &[Filter::eq("date", date.to_string())])
            .await
    }

    /// Dates on which `resource` has at least one booking.
    pub async fn booked_dates(&self, resource: &ResourceRef) -> BookingResult<BTreeSet<NaiveDate>> {
        Ok(self
            .list_bookings(resource)
            .await?
            .into_iter()
            .map(|r| r.date)
            .collect())
    }

    pub async fn day_schedule(
        &self,
        resource: &ResourceRef,
        date: NaiveDate,
    ) -> BookingResult<Schedule<Minute>> {
        let bookings = self.bookings_on(resource, date).await?;
        Ok(day_schedule(&resource.id, date, &bookings))
    }

    /// Unbooked stretches of the day, from 00:00 to 23:59.
    pub async fn free_intervals(
        &self,
        resource: &ResourceRef,
        date: NaiveDate,
    ) -> BookingResult<Vec<Interval<Minute>>> {
        let whole_day = Interval::new(
            TimeOfDay::MIDNIGHT.as_quantity(),
            TimeOfDay::LAST_MINUTE.as_quantity(),
        );
        Ok(self.day_schedule(resource, date).await?.free_intervals(whole_day))
    }

    /// Runs the overlap check against the current bookings without writing.
    pub async fn is_free(&self, request: &BookingRequest) -> BookingResult<bool> {
        let existing = self.bookings_on(&request.resource, request.date).await?;
        Ok(is_interval_free(
            &request.resource.id,
            request.date,
            request.start,
            request.end,
            &existing,
        ))
    }

    /// Checks the request against existing bookings and stores it.
    pub async fn book(&self, request: BookingRequest) -> BookingResult<Reservation> {
        let lock = self.lock_for(&request.resource);
        let _guard = lock.lock().await;

        self.ensure_resource(&request.resource).await?;

        if request.end <= request.start {
            warn!(resource = %request.resource, start = %request.start, end = %request.end, "rejected booking with empty range");
            return Err(BookingError::InvalidRange {
                start: request.start.to_string(),
                end: request.end.to_string(),
            });
        }

        let existing = self.bookings_on(&request.resource, request.date).await?;
        if let Some(taken) = conflicting_reservations(
            &request.resource.id,
            request.date,
            request.start,
            request.end,
            &existing,
        )
        .next()
        {
            warn!(
                resource = %request.resource,
                date = %request.date,
                conflict = %taken.id,
                "rejected overlapping booking"
            );
            return Err(BookingError::Unavailable {
                resource_id: request.resource.id.clone(),
                date: taken.date.to_string(),
                start: taken.start_time.to_string(),
                end: taken.end_time.to_string(),
            });
        }

        let mut reservation = Reservation::new(
            request.resource.id.clone(),
            request.date,
            request.start,
            request.end,
            Utc::now(),
        );
        let body = serde_json::to_value(&reservation)?;
        reservation.id = self
            .store
            .create(&request.resource.bookings_collection(), body)
            .await?;

        info!(
            resource = %request.resource,
            date = %reservation.date,
            start = %reservation.start_time,
            end = %reservation.end_time,
            id = %reservation.id,
            "booking committed"
        );
        Ok(reservation)
    }

    fn lock_for(&self, resource: &ResourceRef) -> Arc<Mutex<()>> {
        self.locks.entry(resource.clone()).or_default().clone()
    }

    async fn ensure_resource(&self, resource: &ResourceRef) -> BookingResult<()> {
        match self.store.get(resource.kind.collection(), &resource.id).await? {
            Some(_) => Ok(()),
            None => Err(BookingError::not_found(resource.kind.label(), &resource.id)),
        }
    }

    async fn query_bookings(
        &self,
        resource: &ResourceRef,
        filters: &[Filter],
    ) -> BookingResult<Vec<Reservation>> {
        let documents = self
            .store
            .query(&resource.bookings_collection(), filters)
            .await?;
        debug!(resource = %resource, count = documents.len(), "bookings loaded");
        let mut bookings = documents
            .into_iter()
            .map(|doc| doc.decode::<Reservation>().map(|r| r.on_resource(resource.id.clone())))
            .collect::<BookingResult<Vec<_>>>()?;
        bookings.sort_by_key(|r| (r.date, r.start_time));
        Ok(bookings)
    }
}
