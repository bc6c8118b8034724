use std::collections::{BTreeMap, HashMap};

use qtty::Quantity;

use crate::interval::Interval;
use crate::Id;

pub mod errors;
mod slot;

use errors::ScheduleError;
use slot::StartKey;
pub use slot::Slot;

#[cfg(test)]
mod tests;

/// Day ledger of one resource: committed bookings that never overlap,
/// ordered by start.
///
/// Slots are kept in a `BTreeMap` keyed by start, with a side index from
/// reservation id to start. Because no two slots overlap, an insertion only
/// has to be checked against its two neighbours, and a range query starts at
/// the last slot beginning before the query and walks forward until slots
/// begin after it ends.
///
/// ```
/// use bookery::schedule::Schedule;
/// use bookery::interval::Interval;
/// use qtty::{Minute, Quantity};
///
/// let mut day = Schedule::<Minute>::new();
/// day.add("a", Interval::from_f64(540.0, 600.0)).unwrap(); // 09:00-10:00
/// day.add("b", Interval::from_f64(600.0, 660.0)).unwrap(); // 10:00-11:00
///
/// assert!(day.is_free(Interval::from_f64(480.0, 540.0)).unwrap());
/// assert_eq!(day.conflicts_vec(Interval::from_f64(570.0, 630.0)).unwrap().len(), 2);
/// assert_eq!(day.entry_at(Quantity::new(600.0)).unwrap(), Some("b".to_string()));
/// ```
#[derive(Debug, Clone)]
pub struct Schedule<U: qtty::Unit> {
    slots: BTreeMap<StartKey, Slot<U>>,
    starts: HashMap<Id, StartKey>,
}

impl<U: qtty::Unit> Default for Schedule<U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U: qtty::Unit> Schedule<U> {
    pub fn new() -> Self {
        Self {
            slots: BTreeMap::new(),
            starts: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn key_of(at: Quantity<U>) -> Result<StartKey, ScheduleError> {
        StartKey::new(at.value()).ok_or(ScheduleError::NaNTime)
    }

    /// Last slot starting at or before `key`.
    fn slot_before(&self, key: StartKey) -> Option<(&StartKey, &Slot<U>)> {
        self.slots.range(..=key).next_back()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.starts.contains_key(id)
    }

    pub fn get_interval(&self, id: &str) -> Option<Interval<U>> {
        self.starts
            .get(id)
            .and_then(|key| self.slots.get(key))
            .map(Slot::span)
    }

    /// Commits `interval` under `id`.
    ///
    /// Fails on a reused id, a NaN bound, an empty interval, or an overlap
    /// with a slot already in the ledger. The ledger is unchanged on error.
    pub fn add(&mut self, id: impl Into<Id>, interval: Interval<U>) -> Result<(), ScheduleError> {
        let id: Id = id.into();
        if self.contains(&id) {
            return Err(ScheduleError::DuplicateId(id));
        }
        let key = Self::key_of(interval.start())?;
        Self::key_of(interval.end())?;
        if interval.is_empty() {
            return Err(ScheduleError::EmptyInterval(id));
        }

        let before = self.slot_before(key).map(|(_, s)| s);
        let after = self.slots.range(key..).next().map(|(_, s)| s);
        if let Some(clash) = [before, after]
            .into_iter()
            .flatten()
            .find(|s| s.span.overlaps(&interval))
        {
            return Err(ScheduleError::OverlapsExisting {
                new_id: id,
                existing_id: clash.holder.clone(),
            });
        }

        self.starts.insert(id.clone(), key);
        self.slots.insert(
            key,
            Slot {
                holder: id,
                span: interval,
            },
        );
        Ok(())
    }

    /// Drops the slot held by `id`, returning its interval.
    pub fn remove(&mut self, id: &str) -> Option<Interval<U>> {
        let key = self.starts.remove(id)?;
        self.slots.remove(&key).map(|s| s.span)
    }

    pub fn has_conflict(&self, query: Interval<U>) -> Result<bool, ScheduleError> {
        Ok(self.conflicts(query)?.next().is_some())
    }

    /// Slots overlapping `query`, in start order.
    pub fn conflicts<'a>(
        &'a self,
        query: Interval<U>,
    ) -> Result<impl Iterator<Item = (Id, Interval<U>)> + 'a, ScheduleError> {
        let from = Self::key_of(query.start())?;
        let until = Self::key_of(query.end())?.get();

        let first = match self.slot_before(from) {
            Some((key, slot)) if slot.span.overlaps(&query) => *key,
            _ => from,
        };

        Ok(self
            .slots
            .range(first..)
            .take_while(move |(key, _)| key.get() < until)
            .map(|(_, slot)| slot)
            .filter(move |slot| slot.span.overlaps(&query))
            .map(Slot::pair))
    }

    pub fn conflicts_vec(
        &self,
        query: Interval<U>,
    ) -> Result<Vec<(Id, Interval<U>)>, ScheduleError> {
        Ok(self.conflicts(query)?.collect())
    }

    /// Whether `query` could be committed. Empty intervals never are.
    pub fn is_free(&self, query: Interval<U>) -> Result<bool, ScheduleError> {
        if query.is_empty() {
            return Ok(false);
        }
        self.has_conflict(query).map(|taken| !taken)
    }

    /// Id of the reservation holding the instant `at`.
    pub fn entry_at(&self, at: Quantity<U>) -> Result<Option<Id>, ScheduleError> {
        let key = Self::key_of(at)?;
        Ok(self
            .slot_before(key)
            .map(|(_, slot)| slot)
            .filter(|slot| slot.span.contains(at))
            .map(|slot| slot.holder.clone()))
    }

    pub fn slots(&self) -> impl Iterator<Item = &Slot<U>> + '_ {
        self.slots.values()
    }

    /// `(id, interval)` pairs in start order.
    pub fn iter(&self) -> impl Iterator<Item = (Id, Interval<U>)> + '_ {
        self.slots.values().map(Slot::pair)
    }

    pub fn ids(&self) -> impl Iterator<Item = Id> + '_ {
        self.slots.values().map(|s| s.holder.clone())
    }

    pub fn intervals(&self) -> impl Iterator<Item = Interval<U>> + '_ {
        self.slots.values().map(Slot::span)
    }

    /// Unbooked stretches of `window`, in order.
    pub fn free_intervals(&self, window: Interval<U>) -> Vec<Interval<U>> {
        let mut gaps = Vec::new();
        let mut cursor = window.start();
        let mut push_gap = |from: Quantity<U>, to: Quantity<U>| {
            if let Some(gap) = Interval::checked(from, to).filter(|g| !g.is_empty()) {
                gaps.push(gap);
            }
        };
        for span in self.intervals() {
            if span.start().value() >= window.end().value() {
                break;
            }
            if span.end().value() <= cursor.value() {
                continue;
            }
            push_gap(cursor, span.start());
            cursor = span.end();
        }
        push_gap(cursor, window.end());
        gaps
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.starts.clear();
    }

    /// Booked time summed over all slots.
    pub fn total_duration(&self) -> Quantity<U> {
        self.intervals()
            .map(|span| span.duration())
            .fold(Quantity::new(0.0), |acc, d| acc + d)
    }

    pub fn earliest_start(&self) -> Option<Quantity<U>> {
        self.slots.values().next().map(|s| s.span.start())
    }

    pub fn latest_end(&self) -> Option<Quantity<U>> {
        self.slots.values().next_back().map(|s| s.span.end())
    }
}
