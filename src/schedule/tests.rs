//! Test suite for the booking ledger.

use super::*;
use qtty::Minute;

type TestInterval = Interval<Minute>;
type TestSchedule = Schedule<Minute>;

/// Interval from wall-clock hours, e.g. `hm(9.0, 10.5)` is 09:00-10:30.
fn hm(start_hour: f64, end_hour: f64) -> TestInterval {
    Interval::from_f64(start_hour * 60.0, end_hour * 60.0)
}

fn at(hour: f64) -> Quantity<Minute> {
    Quantity::new(hour * 60.0)
}

#[cfg(test)]
mod basic_operations {
    use super::*;

    #[test]
    fn test_new_schedule_is_empty() {
        let schedule = TestSchedule::new();
        assert!(schedule.is_empty());
        assert_eq!(schedule.len(), 0);
    }

    #[test]
    fn test_add_single_booking() {
        let mut schedule = TestSchedule::new();
        assert!(schedule.add("a", hm(9.0, 10.0)).is_ok());
        assert_eq!(schedule.len(), 1);
        assert!(schedule.contains("a"));
    }

    #[test]
    fn test_add_duplicate_id_fails() {
        let mut schedule = TestSchedule::new();
        schedule.add("a", hm(9.0, 10.0)).unwrap();
        let result = schedule.add("a", hm(12.0, 13.0));
        assert_eq!(result, Err(ScheduleError::DuplicateId("a".to_string())));
    }

    #[test]
    fn test_add_empty_interval_fails() {
        let mut schedule = TestSchedule::new();
        let result = schedule.add("a", hm(9.0, 9.0));
        assert_eq!(result, Err(ScheduleError::EmptyInterval("a".to_string())));
        assert!(schedule.is_empty());
    }

    #[test]
    fn test_nan_position_fails() {
        let mut schedule = TestSchedule::new();
        schedule.add("a", hm(9.0, 10.0)).unwrap();
        assert_eq!(
            schedule.entry_at(Quantity::new(f64::NAN)),
            Err(ScheduleError::NaNTime)
        );
    }

    #[test]
    fn test_get_and_remove() {
        let mut schedule = TestSchedule::new();
        schedule.add("a", hm(9.0, 10.0)).unwrap();
        schedule.add("b", hm(11.0, 12.0)).unwrap();

        assert_eq!(schedule.get_interval("b"), Some(hm(11.0, 12.0)));
        assert_eq!(schedule.remove("a"), Some(hm(9.0, 10.0)));
        assert_eq!(schedule.remove("a"), None);
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule.get_interval("a"), None);
    }

    #[test]
    fn test_clear() {
        let mut schedule = TestSchedule::new();
        schedule.add("a", hm(9.0, 10.0)).unwrap();
        schedule.add("b", hm(11.0, 12.0)).unwrap();
        schedule.clear();
        assert!(schedule.is_empty());
    }
}

#[cfg(test)]
mod overlap_detection {
    use super::*;

    #[test]
    fn test_back_to_back_bookings_allowed() {
        let mut schedule = TestSchedule::new();
        schedule.add("a", hm(9.0, 10.0)).unwrap();
        schedule.add("b", hm(10.0, 11.0)).unwrap();
        schedule.add("c", hm(8.0, 9.0)).unwrap();
        assert_eq!(schedule.len(), 3);
    }

    #[test]
    fn test_partial_overlap_rejected() {
        let mut schedule = TestSchedule::new();
        schedule.add("a", hm(9.0, 10.0)).unwrap();
        let result = schedule.add("b", hm(9.5, 10.5));
        assert!(
            matches!(result, Err(ScheduleError::OverlapsExisting { new_id, existing_id }) if new_id == "b" && existing_id == "a")
        );
    }

    #[test]
    fn test_overlap_with_successor_rejected() {
        let mut schedule = TestSchedule::new();
        schedule.add("a", hm(9.0, 10.0)).unwrap();
        schedule.add("b", hm(12.0, 13.0)).unwrap();
        let result = schedule.add("c", hm(11.0, 12.5));
        assert!(
            matches!(result, Err(ScheduleError::OverlapsExisting { existing_id, .. }) if existing_id == "b")
        );
    }

    #[test]
    fn test_containing_interval_rejected() {
        let mut schedule = TestSchedule::new();
        schedule.add("a", hm(9.0, 10.0)).unwrap();
        let result = schedule.add("b", hm(8.5, 10.5));
        assert!(matches!(
            result,
            Err(ScheduleError::OverlapsExisting { .. })
        ));
    }

    #[test]
    fn test_same_start_rejected() {
        let mut schedule = TestSchedule::new();
        schedule.add("a", hm(9.0, 10.0)).unwrap();
        assert!(schedule.add("b", hm(9.0, 9.5)).is_err());
        assert_eq!(schedule.get_interval("a"), Some(hm(9.0, 10.0)));
    }
}

#[cfg(test)]
mod conflict_queries {
    use super::*;

    #[test]
    fn test_conflicts_in_start_order() {
        let mut schedule = TestSchedule::new();
        schedule.add("c", hm(14.0, 15.0)).unwrap();
        schedule.add("a", hm(9.0, 10.0)).unwrap();
        schedule.add("b", hm(11.0, 12.0)).unwrap();

        let ids: Vec<_> = schedule
            .conflicts_vec(hm(9.5, 14.5))
            .unwrap()
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_conflicts_exclude_touching_entries() {
        let mut schedule = TestSchedule::new();
        schedule.add("a", hm(9.0, 10.0)).unwrap();
        schedule.add("b", hm(11.0, 12.0)).unwrap();

        assert!(schedule.conflicts_vec(hm(10.0, 11.0)).unwrap().is_empty());
        assert!(schedule.is_free(hm(10.0, 11.0)).unwrap());
    }

    #[test]
    fn test_is_free_reference_cases() {
        let mut schedule = TestSchedule::new();
        schedule.add("a", hm(9.0, 10.0)).unwrap();

        assert!(schedule.is_free(hm(8.0, 9.0)).unwrap());
        assert!(!schedule.is_free(hm(9.5, 10.5)).unwrap());
        assert!(schedule.is_free(hm(10.0, 11.0)).unwrap());
        assert!(!schedule.is_free(hm(8.5, 10.5)).unwrap());
    }

    #[test]
    fn test_empty_query_is_not_free() {
        let schedule = TestSchedule::new();
        assert!(!schedule.is_free(hm(9.0, 9.0)).unwrap());
    }

    #[test]
    fn test_entry_at_is_half_open() {
        let mut schedule = TestSchedule::new();
        schedule.add("a", hm(9.0, 10.0)).unwrap();

        assert_eq!(schedule.entry_at(at(9.0)).unwrap(), Some("a".to_string()));
        assert_eq!(schedule.entry_at(at(9.99)).unwrap(), Some("a".to_string()));
        assert_eq!(schedule.entry_at(at(10.0)).unwrap(), None);
        assert_eq!(schedule.entry_at(at(8.0)).unwrap(), None);
    }
}

#[cfg(test)]
mod free_time {
    use super::*;

    #[test]
    fn test_free_intervals_between_bookings() {
        let mut schedule = TestSchedule::new();
        schedule.add("a", hm(9.0, 10.0)).unwrap();
        schedule.add("b", hm(12.0, 13.0)).unwrap();

        let gaps = schedule.free_intervals(hm(8.0, 18.0));
        assert_eq!(gaps, vec![hm(8.0, 9.0), hm(10.0, 12.0), hm(13.0, 18.0)]);
    }

    #[test]
    fn test_free_intervals_clip_to_window() {
        let mut schedule = TestSchedule::new();
        schedule.add("a", hm(7.0, 9.0)).unwrap();
        schedule.add("b", hm(17.0, 19.0)).unwrap();

        let gaps = schedule.free_intervals(hm(8.0, 18.0));
        assert_eq!(gaps, vec![hm(9.0, 17.0)]);
    }

    #[test]
    fn test_fully_booked_window_has_no_gaps() {
        let mut schedule = TestSchedule::new();
        schedule.add("a", hm(8.0, 12.0)).unwrap();
        schedule.add("b", hm(12.0, 18.0)).unwrap();

        assert!(schedule.free_intervals(hm(9.0, 17.0)).is_empty());
    }
}

#[cfg(test)]
mod statistics {
    use super::*;

    #[test]
    fn test_total_duration_and_span() {
        let mut schedule = TestSchedule::new();
        schedule.add("a", hm(9.0, 10.0)).unwrap();
        schedule.add("b", hm(13.0, 14.5)).unwrap();

        assert_eq!(schedule.total_duration().value(), 150.0);
        assert_eq!(schedule.earliest_start(), Some(at(9.0)));
        assert_eq!(schedule.latest_end(), Some(at(14.5)));
    }

    #[test]
    fn test_iteration_is_sorted() {
        let mut schedule = TestSchedule::new();
        schedule.add("late", hm(15.0, 16.0)).unwrap();
        schedule.add("early", hm(8.0, 9.0)).unwrap();

        let ids: Vec<_> = schedule.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["early", "late"]);
        let mut all: Vec<_> = schedule.ids().collect();
        all.sort();
        assert_eq!(all, vec!["early", "late"]);
        assert_eq!(schedule.intervals().count(), 2);
        let first = schedule.slots().next().unwrap();
        assert_eq!(first.holder(), "early");
        assert_eq!(Some(first.span()), schedule.get_interval("early"));
    }
}
