use std::cmp::Ordering;

use crate::interval::Interval;
use crate::Id;

/// Start position used as the ledger's sort key.
///
/// Ordered with `f64::total_cmp`; the ledger refuses NaN before building one.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StartKey(f64);

impl StartKey {
    pub(crate) fn new(minutes: f64) -> Option<Self> {
        (!minutes.is_nan()).then_some(Self(minutes))
    }

    pub(crate) fn get(self) -> f64 {
        self.0
    }
}

impl PartialEq for StartKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for StartKey {}

impl PartialOrd for StartKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StartKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// One committed booking in a ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot<U: qtty::Unit> {
    pub(crate) holder: Id,
    pub(crate) span: Interval<U>,
}

impl<U: qtty::Unit> Slot<U> {
    /// Id of the reservation holding the slot.
    pub fn holder(&self) -> &str {
        &self.holder
    }

    pub fn span(&self) -> Interval<U> {
        self.span
    }

    pub(crate) fn pair(&self) -> (Id, Interval<U>) {
        (self.holder.clone(), self.span)
    }
}
