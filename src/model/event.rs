use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{require, Record};
use crate::error::{BookingError, BookingResult};
use crate::Id;

/// What a calendar entry represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    #[default]
    Event,
    Note,
    Booking,
}

impl EventKind {
    /// Colour the calendar paints this kind of entry in.
    pub const fn color(&self) -> &'static str {
        match self {
            EventKind::Booking => "blue",
            EventKind::Note => "orange",
            EventKind::Event => "yellow",
        }
    }
}

/// An entry of the shared `events` calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    #[serde(skip)]
    pub id: Id,
    pub title: String,
    #[serde(with = "local_minute")]
    pub start: NaiveDateTime,
    #[serde(with = "local_minute")]
    pub end: NaiveDateTime,
    #[serde(rename = "type", default)]
    pub kind: EventKind,
    #[serde(default)]
    pub equipment_id: Option<Id>,
    #[serde(default)]
    pub equipment_name: Option<String>,
}

impl CalendarEvent {
    /// Title shown on the calendar; bookings are labelled with the equipment name.
    pub fn display_title(&self) -> String {
        match (self.kind, self.equipment_name.as_deref()) {
            (EventKind::Booking, Some(name)) => format!("Reservation: {name}"),
            (EventKind::Booking, None) => "Reservation".to_string(),
            _ => self.title.clone(),
        }
    }

    pub fn color(&self) -> &'static str {
        self.kind.color()
    }
}

impl Record for CalendarEvent {
    fn set_id(&mut self, id: Id) {
        self.id = id;
    }
}

/// The add-event form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewEvent {
    pub title: String,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub kind: EventKind,
    pub equipment_id: Option<Id>,
}

impl NewEvent {
    pub fn new(title: impl Into<String>, kind: EventKind, start: NaiveDateTime) -> Self {
        Self {
            title: title.into(),
            start: Some(start),
            end: None,
            kind,
            equipment_id: None,
        }
    }

    pub fn ending(mut self, end: NaiveDateTime) -> Self {
        self.end = Some(end);
        self
    }

    pub fn for_equipment(mut self, equipment_id: impl Into<Id>) -> Self {
        self.equipment_id = Some(equipment_id.into());
        self
    }

    /// Equipment id with blank selections treated as none.
    pub fn selected_equipment(&self) -> Option<&str> {
        self.equipment_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    pub fn validate(&self) -> BookingResult<()> {
        const MISSING: &str = "Please enter a title and a start date";
        require(&self.title, MISSING)?;
        let start = self.start.ok_or_else(|| BookingError::validation(MISSING))?;
        if self.kind == EventKind::Booking && self.selected_equipment().is_none() {
            return Err(BookingError::validation("Please select equipment"));
        }
        if matches!(self.end, Some(end) if end < start) {
            return Err(BookingError::validation("End must not be before start"));
        }
        Ok(())
    }

    /// Builds the stored event; a missing end collapses onto the start.
    pub fn into_event(self, equipment_name: Option<String>) -> BookingResult<CalendarEvent> {
        self.validate()?;
        let equipment_id = self.selected_equipment().map(str::to_string);
        let start = self
            .start
            .ok_or_else(|| BookingError::validation("Start date is required"))?;
        Ok(CalendarEvent {
            id: Id::new(),
            title: self.title.trim().to_string(),
            start,
            end: self.end.unwrap_or(start),
            kind: self.kind,
            equipment_id,
            equipment_name,
        })
    }
}

/// Parses a `datetime-local` form value (`YYYY-MM-DDTHH:MM`, seconds optional).
pub fn parse_local_datetime(raw: &str) -> BookingResult<NaiveDateTime> {
    local_minute::parse(raw.trim())
        .map_err(|_| BookingError::validation(format!("Invalid date and time '{raw}'")))
}

mod local_minute {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M";
    const WITH_SECONDS: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn parse(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
        NaiveDateTime::parse_from_str(raw, FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(raw, WITH_SECONDS))
    }

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(raw: &str) -> NaiveDateTime {
        parse_local_datetime(raw).unwrap()
    }

    #[test]
    fn parses_form_values_with_and_without_seconds() {
        assert_eq!(dt("2025-03-01T09:00"), dt("2025-03-01T09:00:00"));
        assert!(parse_local_datetime("2025-03-01").is_err());
        assert!(parse_local_datetime("yesterday").is_err());
    }

    #[test]
    fn title_and_start_are_required() {
        let mut form = NewEvent::new("", EventKind::Event, dt("2025-03-01T09:00"));
        assert!(form.validate().is_err());
        form.title = "Standup".into();
        assert!(form.validate().is_ok());
        form.start = None;
        assert!(form.validate().is_err());
    }

    #[test]
    fn booking_needs_equipment() {
        let form = NewEvent::new("Shoot", EventKind::Booking, dt("2025-03-01T09:00"));
        let err = form.validate().unwrap_err();
        assert_eq!(err.user_message(), "Please select equipment");

        let blank = form.clone().for_equipment("  ");
        assert!(blank.validate().is_err());
        assert!(form.for_equipment("cam-1").validate().is_ok());
    }

    #[test]
    fn end_defaults_to_start() {
        let event = NewEvent::new("Note", EventKind::Note, dt("2025-03-01T09:00"))
            .into_event(None)
            .unwrap();
        assert_eq!(event.end, event.start);
    }

    #[test]
    fn end_before_start_is_rejected() {
        let form = NewEvent::new("Talk", EventKind::Event, dt("2025-03-01T09:00"))
            .ending(dt("2025-03-01T08:00"));
        assert!(form.validate().is_err());
    }

    #[test]
    fn display_rules_per_kind() {
        let booking = NewEvent::new("ignored", EventKind::Booking, dt("2025-03-01T09:00"))
            .for_equipment("cam-1")
            .into_event(Some("Camera".into()))
            .unwrap();
        assert_eq!(booking.display_title(), "Reservation: Camera");
        assert_eq!(booking.color(), "blue");

        let note = NewEvent::new("Buy tape", EventKind::Note, dt("2025-03-01T09:00"))
            .into_event(None)
            .unwrap();
        assert_eq!(note.display_title(), "Buy tape");
        assert_eq!(note.color(), "orange");
        assert_eq!(EventKind::Event.color(), "yellow");
    }

    #[test]
    fn stored_shape_uses_form_datetimes() {
        let event = NewEvent::new("Standup", EventKind::Event, dt("2025-03-01T09:00"))
            .ending(dt("2025-03-01T09:15"))
            .into_event(None)
            .unwrap();
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "title": "Standup",
                "start": "2025-03-01T09:00",
                "end": "2025-03-01T09:15",
                "type": "event",
                "equipmentId": null,
                "equipmentName": null,
            })
        );
    }
}
