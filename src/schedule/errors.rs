use thiserror::Error;

use crate::Id;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// Entry ID is already present in the schedule
    #[error("Entry ID {0} already exists in schedule")]
    DuplicateId(Id),

    /// A time value was NaN, which is not allowed
    #[error("Time value cannot be NaN")]
    NaNTime,

    /// Interval covers no time
    #[error("Entry {0} has an empty interval")]
    EmptyInterval(Id),

    /// New interval overlaps with an existing interval
    #[error("Entry {new_id} overlaps with existing entry {existing_id}")]
    OverlapsExisting { new_id: Id, existing_id: Id },
}
