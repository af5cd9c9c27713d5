//! Duration derivation.
//!
//! An event lasts until the next event of its day starts. The last event of
//! a day is an open interval whose end is resolved from the event's date
//! relative to today:
//!
//! | date      | end boundary                          |
//! |-----------|---------------------------------------|
//! | past      | end of day (24:00)                    |
//! | today     | `max(own start, now)`                 |
//! | future    | own start (duration `0m`)             |
//!
//! "Now" is read on every call through the non-`_at` wrappers and never
//! cached.

use std::cmp::Ordering;

use chrono::{Local, NaiveDateTime};

use crate::event::TaskEvent;
use crate::time::{MINUTES_PER_DAY, minute_of_day};
use crate::timeline::{Successor, Timeline};

/// Rendered duration when none can be derived.
pub const NO_DURATION: &str = "-";

/// Formats whole minutes as `"{h}h {m}m"`, or `"{m}m"` under an hour.
pub fn format_minutes(minutes: u32) -> String {
    let hours = minutes / 60;
    let minutes = minutes % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

impl Timeline {
    /// Derived duration of `event` in minutes, or `None` when there is none.
    ///
    /// Only the id of `event` is used; every field is read from the
    /// timeline's own copy of the record.
    pub fn duration_minutes_at(&self, event: &TaskEvent, now: NaiveDateTime) -> Option<u32> {
        let event = self.get(event.id)?;
        if !event.kind.shows_duration() {
            return None;
        }
        let successor = self.successor(event.id)?;
        let own = event.start_minutes()?;

        match successor {
            Successor::Next(next) => {
                let next = next.start_minutes()?;
                match next.cmp(&own) {
                    Ordering::Less => None,
                    Ordering::Equal => Some(0),
                    Ordering::Greater => Some(u32::from(next - own)),
                }
            }
            Successor::Last => {
                let today = now.date();
                let boundary = match event.date.cmp(&today) {
                    Ordering::Less => MINUTES_PER_DAY,
                    Ordering::Equal => own.max(minute_of_day(now.time())),
                    Ordering::Greater => own,
                };
                Some(u32::from(boundary.saturating_sub(own)))
            }
        }
    }

    /// Rendered duration of `event` as of `now`.
    pub fn calculate_duration_at(&self, event: &TaskEvent, now: NaiveDateTime) -> String {
        self.duration_minutes_at(event, now)
            .map_or_else(|| NO_DURATION.to_string(), format_minutes)
    }

    /// Rendered duration of `event`, reading the local clock.
    pub fn calculate_duration(&self, event: &TaskEvent) -> String {
        self.calculate_duration_at(event, Local::now().naive_local())
    }

    /// Minutes tracked across normal events. Events without a derivable
    /// duration are left out rather than counted as zero.
    pub fn total_minutes_tracked_at(&self, now: NaiveDateTime) -> u32 {
        self.events()
            .iter()
            .filter(|event| event.kind.counts_toward_totals())
            .filter_map(|event| self.duration_minutes_at(event, now))
            .sum()
    }

    pub fn total_minutes_tracked(&self) -> u32 {
        self.total_minutes_tracked_at(Local::now().naive_local())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveDate;

    use crate::event_type::EventKind;
    use crate::timeline::tests::event_on;
    use crate::types::EventId;

    const DAY: &str = "2025-06-15";

    fn at(date: &str, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn task(id: i64, start: &str) -> TaskEvent {
        event_on(id, start, EventKind::Normal, "Dev", DAY)
    }

    #[test]
    fn formats_hours_and_minutes() {
        assert_eq!(format_minutes(0), "0m");
        assert_eq!(format_minutes(45), "45m");
        assert_eq!(format_minutes(60), "1h 0m");
        assert_eq!(format_minutes(90), "1h 30m");
        assert_eq!(format_minutes(1440), "24h 0m");
    }

    #[test]
    fn duration_runs_until_the_next_event() {
        let first = task(1, "09:00");
        let timeline = Timeline::build(&[first.clone(), task(2, "10:30")]);
        assert_eq!(timeline.calculate_duration_at(&first, at("2025-06-20", 12, 0)), "1h 30m");
    }

    #[test]
    fn equal_start_times_yield_zero() {
        let first = task(1, "09:00");
        let timeline = Timeline::build(&[first.clone(), task(2, "9:00")]);
        assert_eq!(timeline.calculate_duration_at(&first, at("2025-06-20", 12, 0)), "0m");
    }

    #[test]
    fn last_event_on_a_past_date_runs_to_midnight() {
        let only = task(1, "09:00");
        let timeline = Timeline::build(std::slice::from_ref(&only));
        assert_eq!(timeline.calculate_duration_at(&only, at("2025-06-16", 8, 0)), "15h 0m");
    }

    #[test]
    fn last_event_today_runs_until_now() {
        let only = task(1, "09:00");
        let timeline = Timeline::build(std::slice::from_ref(&only));
        assert_eq!(timeline.calculate_duration_at(&only, at(DAY, 10, 30)), "1h 30m");
    }

    #[test]
    fn last_event_today_scheduled_after_now_is_zero() {
        let only = task(1, "09:00");
        let timeline = Timeline::build(std::slice::from_ref(&only));
        assert_eq!(timeline.calculate_duration_at(&only, at(DAY, 8, 0)), "0m");
    }

    #[test]
    fn last_event_on_a_future_date_is_zero() {
        let only = task(1, "09:00");
        let timeline = Timeline::build(std::slice::from_ref(&only));
        assert_eq!(timeline.calculate_duration_at(&only, at("2025-06-14", 23, 0)), "0m");
    }

    #[test]
    fn end_marker_has_no_duration() {
        let end = event_on(2, "17:00", EventKind::End, "", DAY);
        let timeline = Timeline::build(&[task(1, "09:00"), end.clone()]);
        assert_eq!(timeline.calculate_duration_at(&end, at(DAY, 18, 0)), NO_DURATION);
    }

    #[test]
    fn pause_has_a_duration() {
        let pause = event_on(2, "12:00", EventKind::Pause, "", DAY);
        let timeline = Timeline::build(&[task(1, "09:00"), pause.clone(), task(3, "12:45")]);
        assert_eq!(timeline.calculate_duration_at(&pause, at(DAY, 18, 0)), "45m");
    }

    #[test]
    fn foreign_event_has_no_duration() {
        let timeline = Timeline::build(&[task(1, "09:00")]);
        let stranger = task(7, "08:00");
        assert_eq!(timeline.calculate_duration_at(&stranger, at(DAY, 10, 0)), NO_DURATION);
    }

    #[test]
    fn structurally_equal_copy_resolves_by_id() {
        let original = task(1, "09:00");
        let timeline = Timeline::build(&[original.clone(), task(2, "10:00")]);
        let copy = original.clone();
        assert_eq!(timeline.calculate_duration_at(&copy, at(DAY, 12, 0)), "1h 0m");
    }

    #[test]
    fn stale_copy_is_resolved_from_the_timeline_record() {
        let current = task(1, "09:00");
        let timeline = Timeline::build(std::slice::from_ref(&current));
        let mut stale = current.clone();
        stale.date = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        stale.kind = EventKind::End;
        assert_eq!(timeline.calculate_duration_at(&stale, at(DAY, 10, 30)), "1h 30m");
    }

    #[test]
    fn unparsable_own_time_has_no_duration() {
        let broken = task(1, "nine");
        let timeline = Timeline::build(&[task(2, "09:00"), broken.clone()]);
        assert_eq!(timeline.calculate_duration_at(&broken, at(DAY, 12, 0)), NO_DURATION);
    }

    #[test]
    fn unparsable_successor_has_no_duration() {
        let first = task(1, "09:00");
        let timeline = Timeline::build(&[first.clone(), task(2, "nine")]);
        assert_eq!(timeline.calculate_duration_at(&first, at(DAY, 12, 0)), NO_DURATION);
    }

    #[test]
    fn repeated_calls_are_idempotent() {
        let first = task(1, "09:00");
        let timeline = Timeline::build(&[first.clone(), task(2, "11:15")]);
        let now = at(DAY, 12, 0);
        let once = timeline.calculate_duration_at(&first, now);
        let twice = timeline.calculate_duration_at(&first, now);
        assert_eq!(once, twice);
        assert_eq!(once, "2h 15m");
    }

    #[test]
    fn totals_only_count_normal_events() {
        let events = [
            task(1, "09:00"),
            event_on(2, "10:00", EventKind::Pause, "", DAY),
            task(3, "10:30"),
            event_on(4, "12:00", EventKind::End, "", DAY),
        ];
        let timeline = Timeline::build(&events);
        // 09:00-10:00 and 10:30-12:00; the pause and end are excluded.
        assert_eq!(timeline.total_minutes_tracked_at(at(DAY, 18, 0)), 150);
    }

    #[test]
    fn totals_skip_events_without_duration() {
        let events = [task(1, "09:00"), task(2, "10:00"), task(3, "bogus")];
        let timeline = Timeline::build(&events);
        // 09:00 -> 10:00 counts; 10:00 -> "bogus" and "bogus" itself are skipped.
        assert_eq!(timeline.total_minutes_tracked_at(at(DAY, 18, 0)), 60);
        assert!(timeline.get(EventId::new(3)).is_some());
    }

    #[test]
    fn wall_clock_variants_treat_past_dates_as_closed() {
        let events = [task(1, "09:00"), task(2, "22:00")];
        let timeline = Timeline::build(&events);
        assert_eq!(timeline.calculate_duration(&events[1]), "2h 0m");
        assert_eq!(timeline.total_minutes_tracked(), 15 * 60);
        assert_eq!(timeline.category_breakdown()[0].minutes, 15 * 60);
    }
}
