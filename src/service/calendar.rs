//! The shared calendar of events, notes and equipment bookings.

use std::sync::Arc;

use tracing::{info, warn};

use super::EVENTS;
use crate::error::{BookingError, BookingResult};
use crate::model::{CalendarEvent, CatalogItem, EventKind, NewEvent, ResourceKind};
use crate::store::{Document, DocumentStore, Subscription};

pub struct CalendarService {
    store: Arc<dyn DocumentStore>,
}

impl CalendarService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Validates the form and stores the event.
    ///
    /// Booking entries must name existing equipment; its name is copied onto
    /// the event so the calendar can label it without a second lookup.
    pub async fn add_event(&self, form: NewEvent) -> BookingResult<CalendarEvent> {
        form.validate()?;
        let equipment_name = match form.selected_equipment() {
            Some(id) => {
                let found = self.equipment_name(id).await?;
                if found.is_none() && form.kind == EventKind::Booking {
                    return Err(BookingError::not_found(ResourceKind::Equipment.label(), id));
                }
                found
            }
            None => None,
        };

        let mut event = form.into_event(equipment_name)?;
        event.id = self
            .store
            .create(EVENTS, serde_json::to_value(&event)?)
            .await?;
        info!(id = %event.id, kind = ?event.kind, start = %event.start, "calendar event added");
        Ok(event)
    }

    /// All events ordered by start.
    pub async fn list_events(&self) -> BookingResult<Vec<CalendarEvent>> {
        let mut events = self
            .store
            .query(EVENTS, &[])
            .await?
            .into_iter()
            .map(|doc| doc.decode::<CalendarEvent>())
            .collect::<BookingResult<Vec<_>>>()?;
        sort_events(&mut events);
        Ok(events)
    }

    /// Calls `on_change` with the full, ordered event list now and after every
    /// change. Documents that fail to decode are logged and left out.
    pub fn subscribe<F>(&self, on_change: F) -> Subscription
    where
        F: Fn(Vec<CalendarEvent>) + Send + Sync + 'static,
    {
        self.store.subscribe(
            EVENTS,
            Arc::new(move |docs: &[Document]| {
                let mut events: Vec<CalendarEvent> = docs
                    .iter()
                    .cloned()
                    .filter_map(|doc| {
                        let id = doc.id.clone();
                        doc.decode::<CalendarEvent>()
                            .map_err(|e| warn!(%id, error = %e, "skipping unreadable event"))
                            .ok()
                    })
                    .collect();
                sort_events(&mut events);
                on_change(events);
            }),
        )
    }

    async fn equipment_name(&self, id: &str) -> BookingResult<Option<String>> {
        let Some(doc) = self
            .store
            .get(ResourceKind::Equipment.collection(), id)
            .await?
        else {
            return Ok(None);
        };
        Ok(Some(doc.decode::<CatalogItem>()?.name))
    }
}

fn sort_events(events: &mut [CalendarEvent]) {
    events.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));
}
