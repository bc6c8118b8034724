//! Half-open time intervals.

use std::fmt::Display;

use qtty::{Quantity, Unit};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Half-open range `[start, end)` on a time axis.
///
/// A booking ending at 10:00 and another starting at 10:00 do not share
/// any instant, so back-to-back intervals never overlap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval<U: Unit> {
    start: Quantity<U>,
    end: Quantity<U>,
}

impl<U: Unit> Interval<U> {
    /// Creates interval `[start, end)`.
    ///
    /// # Panics
    ///
    /// Panics if `start > end`. Use [`Interval::checked`] for untrusted input.
    pub const fn new(start: Quantity<U>, end: Quantity<U>) -> Self {
        assert!(
            start.value() <= end.value(),
            "Interval start must be <= end"
        );
        Self { start, end }
    }

    /// Creates `[start, end)` if `start <= end` and neither bound is NaN.
    pub fn checked(start: Quantity<U>, end: Quantity<U>) -> Option<Self> {
        (start.value() <= end.value()).then_some(Self { start, end })
    }

    pub const fn from_f64(start: f64, end: f64) -> Self {
        Self::new(Quantity::<U>::new(start), Quantity::<U>::new(end))
    }

    pub const fn start(&self) -> Quantity<U> {
        self.start
    }

    pub const fn end(&self) -> Quantity<U> {
        self.end
    }

    pub fn duration(&self) -> Quantity<U> {
        self.end - self.start
    }

    /// True when the interval covers no time at all.
    pub fn is_empty(&self) -> bool {
        self.end.value() <= self.start.value()
    }

    /// Converts this interval to another unit of the same dimension.
    pub fn to<T: Unit<Dim = U::Dim>>(self) -> Interval<T> {
        Interval::new(self.start.to(), self.end.to())
    }

    /// Returns true if `position` ∈ `[start, end)`.
    pub const fn contains(&self, position: Quantity<U>) -> bool {
        self.start.value() <= position.value() && position.value() < self.end.value()
    }

    /// Two intervals overlap unless one ends at or before the other starts.
    pub const fn overlaps(&self, other: &Interval<U>) -> bool {
        !(self.end.value() <= other.start.value() || self.start.value() >= other.end.value())
    }

    pub fn intersection(&self, other: &Interval<U>) -> Option<Interval<U>> {
        if !self.overlaps(other) {
            return None;
        }
        let start = if self.start.value() > other.start.value() {
            self.start
        } else {
            other.start
        };
        let end = if self.end.value() < other.end.value() {
            self.end
        } else {
            other.end
        };
        Some(Interval::new(start, end))
    }
}

impl<U: Unit> Display for Interval<U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:.1}, {:.1})", self.start.value(), self.end.value())
    }
}

impl<U: Unit> Serialize for Interval<U> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("Interval", 2)?;
        s.serialize_field("start", &self.start.value())?;
        s.serialize_field("end", &self.end.value())?;
        s.end()
    }
}

impl<'de, U: Unit> Deserialize<'de> for Interval<U> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            start: f64,
            end: f64,
        }

        let raw = Raw::deserialize(deserializer)?;
        Self::checked(Quantity::new(raw.start), Quantity::new(raw.end))
            .ok_or_else(|| serde::de::Error::custom("interval start must be <= end"))
    }
}
