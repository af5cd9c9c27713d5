//! Retention: deletes old history after a day is closed.
//!
//! Eviction runs only after an `end` marker has been stored. It is
//! best-effort: failures are logged and never reach the caller that closed
//! the day.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::{EventStore, StoreError};

/// Smallest accepted retention window, in days.
pub const MIN_RETENTION_DAYS: i64 = 30;
/// Largest accepted retention window, in days.
pub const MAX_RETENTION_DAYS: i64 = 3650;
/// Retention window used when none is configured.
pub const DEFAULT_RETENTION_DAYS: i64 = 180;

/// Retention settings as handed over by the settings layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionSettings {
    pub enabled: bool,
    pub retention_days: Option<i64>,
}

impl Default for RetentionSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            retention_days: Some(DEFAULT_RETENTION_DAYS),
        }
    }
}

impl RetentionSettings {
    /// Events dated strictly before the returned date are evicted.
    ///
    /// `None` when retention is disabled or the window is missing or out of
    /// range. Out-of-range values are not clamped here.
    pub fn cutoff_date(&self, today: NaiveDate) -> Option<NaiveDate> {
        if !self.enabled {
            return None;
        }
        let days = self
            .retention_days
            .filter(|days| (MIN_RETENTION_DAYS..=MAX_RETENTION_DAYS).contains(days))?;
        today.checked_sub_days(Days::new(days.unsigned_abs()))
    }
}

/// A retention pass that could not delete old events.
#[derive(Debug, Error)]
#[error("failed to evict events before {cutoff}: {source}")]
pub struct EvictionFailure {
    pub cutoff: NaiveDate,
    #[source]
    pub source: StoreError,
}

/// Deletes events older than the retention window.
///
/// Returns `Ok(None)` when eviction is skipped by the settings.
pub fn evict<S>(
    store: &mut S,
    settings: &RetentionSettings,
    today: NaiveDate,
) -> Result<Option<usize>, EvictionFailure>
where
    S: EventStore + ?Sized,
{
    let Some(cutoff) = settings.cutoff_date(today) else {
        tracing::debug!(?settings, "retention skipped");
        return Ok(None);
    };
    let deleted = store
        .delete_events_before(cutoff)
        .map_err(|source| EvictionFailure { cutoff, source })?;
    tracing::info!(%cutoff, deleted, "evicted old events");
    Ok(Some(deleted))
}
