//! The record store collaborator.
//!
//! The engine only talks to storage through [`EventStore`]. Implementations
//! translate whatever their backend reports into [`StoreError`], so the
//! engine never inspects backend-specific error shapes.

use chrono::NaiveDate;
use thiserror::Error;

use crate::event::{EventChanges, NewTaskEvent, TaskEvent};
use crate::types::EventId;

/// Errors surfaced by a record store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store's own end-of-day uniqueness constraint rejected the write.
    #[error("an end-of-day marker already exists for {date}")]
    DuplicateEndOfDay { date: NaiveDate },

    /// No event with this ID exists.
    #[error("event {0} not found")]
    NotFound(EventId),

    /// The store does not provide this capability.
    #[error("store does not support {0}")]
    Unsupported(&'static str),

    /// Any other backend failure.
    #[error("store failure: {0}")]
    Backend(String),
}

/// Storage for task events.
pub trait EventStore {
    /// All events recorded for `date`, in no particular order.
    fn events_on(&self, date: NaiveDate) -> Result<Vec<TaskEvent>, StoreError>;

    /// Inserts an event and returns it with its assigned ID.
    ///
    /// Must reject a second `end` event for the same date with
    /// [`StoreError::DuplicateEndOfDay`].
    fn insert_event(&mut self, event: &NewTaskEvent) -> Result<TaskEvent, StoreError>;

    /// Applies validated changes to an existing event.
    fn update_event(&mut self, id: EventId, changes: &EventChanges) -> Result<TaskEvent, StoreError>;

    fn delete_event(&mut self, id: EventId) -> Result<(), StoreError>;

    /// Deletes every event dated strictly before `cutoff`, returning the count.
    fn delete_events_before(&mut self, cutoff: NaiveDate) -> Result<usize, StoreError> {
        let _ = cutoff;
        Err(StoreError::Unsupported("bulk deletion"))
    }
}
