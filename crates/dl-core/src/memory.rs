//! In-memory [`EventStore`] used by unit tests.

use chrono::NaiveDate;

use crate::event::{EventChanges, NewTaskEvent, TaskEvent};
use crate::event_type::EventKind;
use crate::store::{EventStore, StoreError};
use crate::types::EventId;

#[derive(Debug, Default)]
pub struct MemoryStore {
    events: Vec<TaskEvent>,
    next_id: i64,
    insert_calls: usize,
    bulk_delete_calls: usize,
    fail_bulk_delete: bool,
}

impl MemoryStore {
    pub fn with_events(events: Vec<TaskEvent>) -> Self {
        let next_id = events.iter().map(|e| e.id.get()).max().unwrap_or(0);
        Self {
            events,
            next_id,
            ..Self::default()
        }
    }

    pub const fn failing_bulk_delete(mut self) -> Self {
        self.fail_bulk_delete = true;
        self
    }

    pub fn ids(&self) -> Vec<i64> {
        self.events.iter().map(|e| e.id.get()).collect()
    }

    pub const fn insert_calls(&self) -> usize {
        self.insert_calls
    }

    pub const fn bulk_delete_calls(&self) -> usize {
        self.bulk_delete_calls
    }

    fn has_end_on(&self, date: NaiveDate, except: Option<EventId>) -> bool {
        self.events
            .iter()
            .any(|e| e.kind == EventKind::End && e.date == date && Some(e.id) != except)
    }
}

impl EventStore for MemoryStore {
    fn events_on(&self, date: NaiveDate) -> Result<Vec<TaskEvent>, StoreError> {
        Ok(self.events.iter().filter(|e| e.date == date).cloned().collect())
    }

    fn insert_event(&mut self, event: &NewTaskEvent) -> Result<TaskEvent, StoreError> {
        self.insert_calls += 1;
        if event.kind == EventKind::End && self.has_end_on(event.date, None) {
            return Err(StoreError::DuplicateEndOfDay { date: event.date });
        }
        self.next_id += 1;
        let stored = TaskEvent {
            id: EventId::new(self.next_id),
            category: event.category.clone(),
            label: event.label.clone(),
            start_time: event.start_time.to_string(),
            date: event.date,
            kind: event.kind,
            created_at: None,
        };
        self.events.push(stored.clone());
        Ok(stored)
    }

    fn update_event(&mut self, id: EventId, changes: &EventChanges) -> Result<TaskEvent, StoreError> {
        let index = self
            .events
            .iter()
            .position(|e| e.id == id)
            .ok_or(StoreError::NotFound(id))?;
        let mut updated = self.events[index].clone();
        changes.apply_to(&mut updated);
        if updated.kind == EventKind::End && self.has_end_on(updated.date, Some(id)) {
            return Err(StoreError::DuplicateEndOfDay { date: updated.date });
        }
        self.events[index] = updated.clone();
        Ok(updated)
    }

    fn delete_event(&mut self, id: EventId) -> Result<(), StoreError> {
        let before = self.events.len();
        self.events.retain(|e| e.id != id);
        if self.events.len() == before {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    fn delete_events_before(&mut self, cutoff: NaiveDate) -> Result<usize, StoreError> {
        self.bulk_delete_calls += 1;
        if self.fail_bulk_delete {
            return Err(StoreError::Backend("bulk delete failed".to_string()));
        }
        let before = self.events.len();
        self.events.retain(|e| e.date >= cutoff);
        Ok(before - self.events.len())
    }
}

/// A store lacking the bulk-delete capability.
#[derive(Debug, Default)]
pub struct WithoutBulkDelete(pub MemoryStore);

impl EventStore for WithoutBulkDelete {
    fn events_on(&self, date: NaiveDate) -> Result<Vec<TaskEvent>, StoreError> {
        self.0.events_on(date)
    }

    fn insert_event(&mut self, event: &NewTaskEvent) -> Result<TaskEvent, StoreError> {
        self.0.insert_event(event)
    }

    fn update_event(&mut self, id: EventId, changes: &EventChanges) -> Result<TaskEvent, StoreError> {
        self.0.update_event(id, changes)
    }

    fn delete_event(&mut self, id: EventId) -> Result<(), StoreError> {
        self.0.delete_event(id)
    }
}
