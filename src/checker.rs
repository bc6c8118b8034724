//! Booking overlap checker.
//!
//! Decides whether a proposed `[start, end)` slot on a resource and date may
//! be committed given the reservations already stored. Times are compared as
//! minutes since midnight. Intervals are half-open, so a booking that ends
//! exactly when another begins is not a conflict. Only reservations on the
//! same resource and the same date are considered.
//!
//! The check is a pure function of its inputs. It says nothing about
//! reservations written after the list was read; callers that need the
//! check to hold at commit time must serialise read-check-write themselves
//! (see [`crate::service::BookingService::book`]).

use chrono::NaiveDate;
use qtty::Minute;
use tracing::warn;

use crate::model::Reservation;
use crate::schedule::Schedule;
use crate::time::TimeOfDay;

/// True when `[proposed_start, proposed_end)` is bookable.
///
/// Returns `false` for zero or negative durations, and for any overlap with
/// an existing reservation on `resource_id` and `date`.
pub fn is_interval_free(
    resource_id: &str,
    date: NaiveDate,
    proposed_start: TimeOfDay,
    proposed_end: TimeOfDay,
    existing: &[Reservation],
) -> bool {
    if proposed_end <= proposed_start {
        return false;
    }
    conflicting_reservations(resource_id, date, proposed_start, proposed_end, existing)
        .next()
        .is_none()
}

/// Reservations on the same resource and date that overlap the proposal.
///
/// Stored reservations are compared exactly as stored, even when their own
/// end does not come after their start.
pub fn conflicting_reservations<'a>(
    resource_id: &'a str,
    date: NaiveDate,
    proposed_start: TimeOfDay,
    proposed_end: TimeOfDay,
    existing: &'a [Reservation],
) -> impl Iterator<Item = &'a Reservation> + 'a {
    let start = proposed_start.minutes();
    let end = proposed_end.minutes();
    existing
        .iter()
        .filter(move |r| r.is_on(resource_id, date))
        .filter(move |r| {
            let (b_start, b_end) = (r.start_time.minutes(), r.end_time.minutes());
            !(end <= b_start || start >= b_end)
        })
}

/// Builds the day ledger of one resource from its stored reservations.
///
/// Entries that cannot be placed (reversed times, or overlaps left behind by
/// writers that skipped the check) are logged and left out.
pub fn day_schedule(resource_id: &str, date: NaiveDate, existing: &[Reservation]) -> Schedule<Minute> {
    let mut schedule = Schedule::new();
    for reservation in existing.iter().filter(|r| r.is_on(resource_id, date)) {
        let Some(interval) = reservation.interval() else {
            warn!(
                reservation = %reservation.id,
                start = %reservation.start_time,
                end = %reservation.end_time,
                "skipping reservation with reversed times"
            );
            continue;
        };
        if let Err(e) = schedule.add(reservation.id.clone(), interval) {
            warn!(reservation = %reservation.id, error = %e, "skipping reservation");
        }
    }
    schedule
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    const CAMERA: &str = "cam-1";

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    fn booking(id: &str, resource: &str, date: NaiveDate, start: &str, end: &str) -> Reservation {
        let mut r = Reservation::new(resource, date, t(start), t(end), Utc::now());
        r.id = id.to_string();
        r
    }

    fn nine_to_ten() -> Vec<Reservation> {
        vec![booking("b1", CAMERA, d(1), "09:00", "10:00")]
    }

    #[test]
    fn reference_cases_around_an_existing_booking() {
        let existing = nine_to_ten();
        let free = |start: &str, end: &str| is_interval_free(CAMERA, d(1), t(start), t(end), &existing);

        assert!(free("08:00", "09:00"));
        assert!(!free("09:30", "10:30"));
        assert!(free("10:00", "11:00"));
        assert!(!free("08:30", "10:30"));
        assert!(!free("09:15", "09:45"));
    }

    #[test]
    fn non_positive_duration_is_never_free() {
        assert!(!is_interval_free(CAMERA, d(1), t("10:00"), t("10:00"), &[]));
        assert!(!is_interval_free(CAMERA, d(1), t("11:00"), t("10:00"), &[]));
        assert!(!is_interval_free("other", d(2), t("00:30"), t("00:00"), &nine_to_ten()));
    }

    #[test]
    fn other_dates_and_resources_are_ignored() {
        let existing = vec![
            booking("b1", CAMERA, d(2), "09:00", "10:00"),
            booking("b2", "tripod", d(1), "09:00", "10:00"),
        ];
        assert!(is_interval_free(CAMERA, d(1), t("09:00"), t("10:00"), &existing));
    }

    #[test]
    fn repeated_checks_agree() {
        let existing = nine_to_ten();
        let first = is_interval_free(CAMERA, d(1), t("09:30"), t("11:00"), &existing);
        let second = is_interval_free(CAMERA, d(1), t("09:30"), t("11:00"), &existing);
        assert_eq!(first, second);
    }

    #[test]
    fn conflicts_are_listed() {
        let existing = vec![
            booking("b1", CAMERA, d(1), "09:00", "10:00"),
            booking("b2", CAMERA, d(1), "11:00", "12:00"),
            booking("b3", CAMERA, d(1), "13:00", "14:00"),
        ];
        let ids: Vec<_> = conflicting_reservations(CAMERA, d(1), t("09:30"), t("11:30"), &existing)
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, vec!["b1", "b2"]);
    }

    #[test]
    fn reversed_stored_booking_is_compared_as_stored() {
        let existing = vec![booking("odd", CAMERA, d(1), "10:00", "09:00")];
        assert!(!is_interval_free(CAMERA, d(1), t("08:00"), t("11:00"), &existing));
        assert!(is_interval_free(CAMERA, d(1), t("09:30"), t("10:30"), &existing));
    }

    #[test]
    fn day_schedule_skips_unplaceable_entries() {
        let existing = vec![
            booking("b1", CAMERA, d(1), "09:00", "10:00"),
            booking("clash", CAMERA, d(1), "09:30", "10:30"),
            booking("odd", CAMERA, d(1), "12:00", "11:00"),
            booking("b2", CAMERA, d(1), "10:00", "11:00"),
            booking("elsewhere", CAMERA, d(2), "09:00", "10:00"),
        ];
        let schedule = day_schedule(CAMERA, d(1), &existing);
        let ids: Vec<_> = schedule.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["b1", "b2"]);
        assert_eq!(schedule.total_duration().value(), 120.0);
    }
}
