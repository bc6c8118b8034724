//! Time-of-day values for booking forms.
//!
//! Bookings are made on a calendar date with a start and end expressed as
//! wall-clock `HH:MM`. Internally every time of day is the number of minutes
//! since midnight, which makes comparisons a plain integer comparison and
//! lets the value be lifted onto a `qtty` [`Minute`] axis for interval
//! arithmetic.

use std::fmt;
use std::str::FromStr;

use qtty::{Hour, Minute, Quantity};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const MINUTES_PER_HOUR: u16 = 60;
const MINUTES_PER_DAY: u16 = 24 * MINUTES_PER_HOUR;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("Malformed time '{0}', expected HH:MM")]
    Malformed(String),

    #[error("Time {hour:02}:{minute:02} is out of range")]
    OutOfRange { hour: u16, minute: u16 },

    #[error("Slot step must be between 1 and 1439 minutes, got {0}")]
    InvalidStep(u16),
}

/// Wall-clock time within a single day, stored as minutes since midnight.
///
/// Always in `00:00..=23:59`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);
    pub const LAST_MINUTE: TimeOfDay = TimeOfDay(MINUTES_PER_DAY - 1);

    pub fn from_hm(hour: u16, minute: u16) -> Result<Self, TimeParseError> {
        if hour >= 24 || minute >= MINUTES_PER_HOUR {
            return Err(TimeParseError::OutOfRange { hour, minute });
        }
        Ok(Self(hour * MINUTES_PER_HOUR + minute))
    }

    pub fn from_minutes(minutes: u16) -> Result<Self, TimeParseError> {
        if minutes >= MINUTES_PER_DAY {
            return Err(TimeParseError::OutOfRange {
                hour: minutes / MINUTES_PER_HOUR,
                minute: minutes % MINUTES_PER_HOUR,
            });
        }
        Ok(Self(minutes))
    }

    /// Minutes since midnight.
    pub const fn minutes(&self) -> u16 {
        self.0
    }

    pub const fn hour(&self) -> u16 {
        self.0 / MINUTES_PER_HOUR
    }

    pub const fn minute(&self) -> u16 {
        self.0 % MINUTES_PER_HOUR
    }

    /// Position of this time on a minute axis.
    pub fn as_quantity(&self) -> Quantity<Minute> {
        Quantity::new(f64::from(self.0))
    }

    /// Adds `minutes`, saturating at 23:59 instead of wrapping into the next day.
    pub fn add_minutes(self, minutes: u16) -> Self {
        let total = u32::from(self.0) + u32::from(minutes);
        let capped = total.min(u32::from(Self::LAST_MINUTE.0));
        // capped <= 1439, fits in u16
        Self(capped as u16)
    }

    /// Length of `[self, end)` in hours, or zero when `end` is not after `self`.
    pub fn hours_until(&self, end: TimeOfDay) -> Quantity<Hour> {
        let span = end.0.saturating_sub(self.0);
        Quantity::<Minute>::new(f64::from(span)).to::<Hour>()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || TimeParseError::Malformed(s.to_string());
        let (h, m) = s.trim().split_once(':').ok_or_else(malformed)?;
        if h.is_empty() || m.len() != 2 {
            return Err(malformed());
        }
        let hour: u16 = h.parse().map_err(|_| malformed())?;
        let minute: u16 = m.parse().map_err(|_| malformed())?;
        Self::from_hm(hour, minute)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = TimeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

fn check_step(step: u16) -> Result<(), TimeParseError> {
    if step == 0 || step >= MINUTES_PER_DAY {
        return Err(TimeParseError::InvalidStep(step));
    }
    Ok(())
}

/// Slot grid starting at midnight in `step`-minute increments, excluding 24:00.
pub fn time_slots(step: u16) -> Result<Vec<TimeOfDay>, TimeParseError> {
    check_step(step)?;
    Ok((0..MINUTES_PER_DAY)
        .step_by(usize::from(step))
        .map(TimeOfDay)
        .collect())
}

/// Grid slots strictly after `start`; the valid choices for an end time.
pub fn end_slots_after(start: TimeOfDay, step: u16) -> Result<Vec<TimeOfDay>, TimeParseError> {
    Ok(time_slots(step)?
        .into_iter()
        .filter(|slot| *slot > start)
        .collect())
}

/// End time to keep after the start time moved to `start`.
///
/// If `end` no longer comes after `start`, it is pushed to `start + step`.
pub fn adjusted_end(start: TimeOfDay, end: TimeOfDay, step: u16) -> TimeOfDay {
    if end <= start {
        start.add_minutes(step)
    } else {
        end
    }
}
