//! A rendered view of one day: ordered rows, total, and breakdown.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::aggregate::CategoryTotal;
use crate::event::TaskEvent;
use crate::event_type::EventKind;
use crate::timeline::Timeline;
use crate::types::EventId;

/// One event of the day with its derived duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub id: EventId,
    pub start_time: String,
    pub kind: EventKind,
    pub category: String,
    pub label: String,
    pub duration: String,
}

/// Everything shown for a day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayReport {
    pub date: NaiveDate,
    pub rows: Vec<ReportRow>,
    pub total_minutes: u32,
    pub categories: Vec<CategoryTotal>,
}

impl DayReport {
    /// Builds the report for `date` as of `now`. Events dated elsewhere are ignored.
    pub fn build_at(date: NaiveDate, events: &[TaskEvent], now: NaiveDateTime) -> Self {
        let events: Vec<TaskEvent> = events.iter().filter(|e| e.date == date).cloned().collect();
        let timeline = Timeline::build(&events);
        let rows = timeline
            .events()
            .iter()
            .map(|event| ReportRow {
                id: event.id,
                start_time: event.start_time.clone(),
                kind: event.kind,
                category: event.category.clone(),
                label: event.label.clone(),
                duration: timeline.calculate_duration_at(event, now),
            })
            .collect();

        Self {
            date,
            rows,
            total_minutes: timeline.total_minutes_tracked_at(now),
            categories: timeline.category_breakdown_at(now),
        }
    }

    /// Whether the day has been closed with an end marker.
    pub fn is_closed(&self) -> bool {
        self.rows.iter().any(|row| row.kind == EventKind::End)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::timeline::tests::event_on;

    #[test]
    fn report_orders_rows_and_totals_normal_time() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let events = [
            event_on(3, "12:00", EventKind::End, "", "2025-06-15"),
            event_on(1, "09:00", EventKind::Normal, "Dev", "2025-06-15"),
            event_on(2, "10:30", EventKind::Pause, "", "2025-06-15"),
            event_on(9, "08:00", EventKind::Normal, "Dev", "2025-06-14"),
        ];
        let now = date.and_hms_opt(20, 0, 0).unwrap();
        let report = DayReport::build_at(date, &events, now);

        let rows: Vec<_> = report
            .rows
            .iter()
            .map(|row| (row.id.get(), row.duration.as_str()))
            .collect();
        assert_eq!(rows, vec![(1, "1h 30m"), (2, "1h 30m"), (3, "-")]);
        assert_eq!(report.total_minutes, 90);
        assert_eq!(report.categories.len(), 1);
        assert!(report.is_closed());
    }
}
