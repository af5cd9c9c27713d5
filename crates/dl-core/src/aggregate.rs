//! Per-category totals over a day's timeline.

use std::collections::BTreeMap;

use chrono::{Local, NaiveDateTime};
use serde::Serialize;

use crate::timeline::Timeline;

/// Minutes tracked for one category, and its share of the day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub minutes: u32,
    pub percentage: f64,
}

impl Timeline {
    /// Sums normal-event durations per category.
    ///
    /// Sorted by minutes descending, then category name ascending. Empty
    /// when no normal event has a derivable duration.
    pub fn category_breakdown_at(&self, now: NaiveDateTime) -> Vec<CategoryTotal> {
        let mut minutes_by_category: BTreeMap<&str, u32> = BTreeMap::new();
        for event in self.events() {
            if !event.kind.counts_toward_totals() {
                continue;
            }
            if let Some(minutes) = self.duration_minutes_at(event, now) {
                *minutes_by_category.entry(event.category.as_str()).or_default() += minutes;
            }
        }

        let total: u32 = minutes_by_category.values().sum();
        let mut breakdown: Vec<CategoryTotal> = minutes_by_category
            .into_iter()
            .map(|(category, minutes)| CategoryTotal {
                category: category.to_string(),
                minutes,
                percentage: percentage(minutes, total),
            })
            .collect();
        // BTreeMap iteration already orders names; the stable sort keeps that for ties.
        breakdown.sort_by(|a, b| b.minutes.cmp(&a.minutes));
        breakdown
    }

    pub fn category_breakdown(&self) -> Vec<CategoryTotal> {
        self.category_breakdown_at(Local::now().naive_local())
    }
}

fn percentage(minutes: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    f64::from(minutes) / f64::from(total) * 100.0
}
