//! At most one `end` marker per calendar date.
//!
//! The first layer checks the events already loaded for the date before the
//! store is contacted. The second layer is the store's own constraint, which
//! arrives here as [`StoreError::DuplicateEndOfDay`](crate::StoreError) and
//! converts into the same [`EngineError::DuplicateEndOfDay`].

use chrono::NaiveDate;

use crate::error::EngineError;
use crate::event::{NewTaskEvent, TaskEvent};
use crate::event_type::EventKind;

/// Fails if `loaded` already holds an `end` marker dated `date`.
pub fn ensure_no_end_marker(loaded: &[TaskEvent], date: NaiveDate) -> Result<(), EngineError> {
    let exists = loaded
        .iter()
        .any(|event| event.kind == EventKind::End && event.date == date);
    if exists {
        tracing::debug!(%date, "end-of-day marker rejected by pre-check");
        return Err(EngineError::DuplicateEndOfDay { date });
    }
    Ok(())
}

/// Pre-check for a pending insert. Only `end` events are constrained.
pub fn check_insert(loaded: &[TaskEvent], event: &NewTaskEvent) -> Result<(), EngineError> {
    if event.kind == EventKind::End {
        ensure_no_end_marker(loaded, event.date)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::timeline::tests::event_on;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn end_at(s: &str) -> NewTaskEvent {
        NewTaskEvent::marker(EventKind::End, "", date(s).and_hms_opt(18, 0, 0).unwrap()).unwrap()
    }

    #[test]
    fn rejects_second_end_marker_for_the_same_date() {
        let loaded = [event_on(1, "17:00", EventKind::End, "", "2025-06-15")];
        let err = check_insert(&loaded, &end_at("2025-06-15")).unwrap_err();
        assert_eq!(
            err,
            EngineError::DuplicateEndOfDay {
                date: date("2025-06-15")
            }
        );
    }

    #[test]
    fn end_markers_on_other_dates_do_not_count() {
        let loaded = [event_on(1, "17:00", EventKind::End, "", "2025-06-14")];
        assert!(check_insert(&loaded, &end_at("2025-06-15")).is_ok());
    }

    #[test]
    fn pauses_and_tasks_are_unconstrained() {
        let loaded = [event_on(1, "17:00", EventKind::End, "", "2025-06-15")];
        let pause = NewTaskEvent::marker(
            EventKind::Pause,
            "",
            date("2025-06-15").and_hms_opt(18, 0, 0).unwrap(),
        )
        .unwrap();
        assert!(check_insert(&loaded, &pause).is_ok());

        let task = NewTaskEvent::task("Dev", "x", "19:00".parse().unwrap(), date("2025-06-15")).unwrap();
        assert!(check_insert(&loaded, &task).is_ok());
    }
}
