//! The create/update/delete path for a loaded day.
//!
//! [`DayContext`] is the explicit "currently loaded day": callers pass it to
//! every write so the end-of-day pre-check and stale-reference checks work
//! against exactly the events the caller is looking at.

use chrono::{Local, NaiveDate};

use crate::error::EngineError;
use crate::event::{EventChanges, NewTaskEvent, TaskEvent};
use crate::event_type::EventKind;
use crate::guard;
use crate::retention::{self, RetentionSettings};
use crate::store::EventStore;
use crate::timeline::Timeline;
use crate::types::EventId;

/// The events of one calendar date as last read from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayContext {
    date: NaiveDate,
    events: Vec<TaskEvent>,
}

impl DayContext {
    /// Wraps already-loaded events. Events from other dates are ignored.
    pub fn new(date: NaiveDate, events: Vec<TaskEvent>) -> Self {
        let events = events.into_iter().filter(|event| event.date == date).collect();
        Self { date, events }
    }

    /// Reads the events for `date` from the store.
    pub fn load<S>(store: &S, date: NaiveDate) -> Result<Self, EngineError>
    where
        S: EventStore + ?Sized,
    {
        let events = store.events_on(date)?;
        tracing::debug!(%date, events = events.len(), "loaded day");
        Ok(Self::new(date, events))
    }

    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn events(&self) -> &[TaskEvent] {
        &self.events
    }

    /// Chronological view of the loaded events.
    pub fn timeline(&self) -> Timeline {
        Timeline::build(&self.events)
    }

    fn find(&self, id: EventId) -> Result<&TaskEvent, EngineError> {
        self.events
            .iter()
            .find(|event| event.id == id)
            .ok_or(EngineError::StaleReference { id })
    }

    fn upsert(&mut self, event: TaskEvent) {
        self.events.retain(|existing| existing.id != event.id);
        if event.date == self.date {
            self.events.push(event);
        }
    }
}

/// Creates an event, reading today's date from the local clock.
pub fn create_event<S>(
    store: &mut S,
    ctx: &mut DayContext,
    event: &NewTaskEvent,
    retention: &RetentionSettings,
) -> Result<TaskEvent, EngineError>
where
    S: EventStore + ?Sized,
{
    create_event_at(store, ctx, event, retention, Local::now().date_naive())
}

/// Creates an event.
///
/// `end` markers are checked against the loaded day before the store is
/// contacted, and the store's own rejection maps to the same error. After an
/// `end` marker is stored, old history is evicted per `retention`; eviction
/// problems are logged and do not affect the returned event.
///
/// Eviction runs before this returns. Use [`record_event`] and
/// [`Recorded::finish`] to acknowledge the new event first.
pub fn create_event_at<S>(
    store: &mut S,
    ctx: &mut DayContext,
    event: &NewTaskEvent,
    retention: &RetentionSettings,
    today: NaiveDate,
) -> Result<TaskEvent, EngineError>
where
    S: EventStore + ?Sized,
{
    Ok(record_event(store, ctx, event)?.finish(store, ctx, retention, today))
}

/// An event that is stored but whose follow-up work has not run yet.
#[derive(Debug)]
#[must_use = "a closed day owes a retention pass; call `finish`"]
pub struct Recorded {
    pub event: TaskEvent,
}

impl Recorded {
    /// Runs the retention pass owed by an `end` marker and hands back the
    /// event. Other kinds pass straight through.
    pub fn finish<S>(
        self,
        store: &mut S,
        ctx: &mut DayContext,
        retention: &RetentionSettings,
        today: NaiveDate,
    ) -> TaskEvent
    where
        S: EventStore + ?Sized,
    {
        if self.event.kind == EventKind::End {
            match retention::evict(store, retention, today) {
                Ok(Some(_)) => {
                    if retention.cutoff_date(today).is_some_and(|cutoff| ctx.date < cutoff) {
                        ctx.events.clear();
                    }
                }
                Ok(None) => {}
                Err(err) => tracing::warn!(error = %err, "retention eviction failed"),
            }
        }
        self.event
    }
}

/// Stores an event without running any follow-up work.
///
/// Applies the same end-of-day checks as [`create_event_at`]. The event is
/// committed and part of `ctx` once this returns.
pub fn record_event<S>(
    store: &mut S,
    ctx: &mut DayContext,
    event: &NewTaskEvent,
) -> Result<Recorded, EngineError>
where
    S: EventStore + ?Sized,
{
    guard::check_insert(&ctx.events, event)?;

    let stored = store.insert_event(event)?;
    tracing::debug!(id = %stored.id, kind = %stored.kind, date = %stored.date, "event created");
    ctx.upsert(stored.clone());
    Ok(Recorded { event: stored })
}

/// Updates the mutable fields of an event of the loaded day.
pub fn update_event<S>(
    store: &mut S,
    ctx: &mut DayContext,
    id: EventId,
    changes: &EventChanges,
) -> Result<TaskEvent, EngineError>
where
    S: EventStore + ?Sized,
{
    let current = ctx.find(id)?;
    let changes = changes.validated_for(current.kind)?;
    if changes.is_empty() {
        return Ok(current.clone());
    }

    // Moving an end marker to another date is only checked by the store:
    // the target date is not loaded.
    let updated = store.update_event(id, &changes)?;
    tracing::debug!(%id, "event updated");
    ctx.upsert(updated.clone());
    Ok(updated)
}

/// Deletes one event of the loaded day.
pub fn delete_event<S>(store: &mut S, ctx: &mut DayContext, id: EventId) -> Result<(), EngineError>
where
    S: EventStore + ?Sized,
{
    ctx.find(id)?;
    store.delete_event(id)?;
    tracing::debug!(%id, "event deleted");
    ctx.events.retain(|event| event.id != id);
    Ok(())
}
