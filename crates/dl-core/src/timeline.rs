//! Chronological ordering of a single day's events.
//!
//! The timeline is a pure function of its input: events with a blank start
//! time are dropped, the rest are sorted by minute of day with unparsable
//! times last, and every surviving event is linked to its successor.
//! Lookups are keyed by [`EventId`], so callers may pass any copy of a record.

use std::collections::HashMap;

use crate::event::TaskEvent;
use crate::types::EventId;

/// Position of an event relative to the rest of its day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Successor<'a> {
    /// The event that starts next.
    Next(&'a TaskEvent),
    /// Last event of the day: an open interval.
    Last,
}

/// A day's events in chronological order.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    ordered: Vec<TaskEvent>,
    positions: HashMap<EventId, usize>,
}

impl Timeline {
    /// Orders the events of one calendar date.
    ///
    /// Never fails: malformed start times sort after every parseable one and
    /// keep their input order, as do ties.
    pub fn build(events: &[TaskEvent]) -> Self {
        let mut ordered: Vec<TaskEvent> = events
            .iter()
            .filter(|event| !event.start_time.trim().is_empty())
            .cloned()
            .collect();
        // Stable sort: ties and unparsable entries keep input order.
        ordered.sort_by_key(|event| event.start_minutes().map_or((1, 0), |minutes| (0, minutes)));

        let mut positions = HashMap::with_capacity(ordered.len());
        for (index, event) in ordered.iter().enumerate() {
            positions.entry(event.id).or_insert(index);
        }

        tracing::trace!(events = ordered.len(), "built timeline");
        Self { ordered, positions }
    }

    /// Events in chronological order.
    pub fn events(&self) -> &[TaskEvent] {
        &self.ordered
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// The timeline's copy of the event with `id`, if present.
    pub fn get(&self, id: EventId) -> Option<&TaskEvent> {
        self.positions.get(&id).map(|&index| &self.ordered[index])
    }

    /// Successor link for `id`, or `None` when the event is not part of
    /// this timeline (stale or foreign reference).
    pub fn successor(&self, id: EventId) -> Option<Successor<'_>> {
        let index = *self.positions.get(&id)?;
        Some(
            self.ordered
                .get(index + 1)
                .map_or(Successor::Last, Successor::Next),
        )
    }
}
