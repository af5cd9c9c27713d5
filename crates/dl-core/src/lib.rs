//! Core domain logic for the day log.
//!
//! A day is logged as start-time-stamped events; durations are derived from
//! each event's successor rather than stored. This crate contains:
//! - Timeline: chronological ordering of one day's events
//! - Durations: per-event durations including the open last interval
//! - Aggregation: totals and per-category breakdown
//! - Guard and journal: the write path with the one-end-marker-per-day rule
//! - Retention: eviction of old history after a day is closed
//! - Backup: snapshot export and import normalization

mod aggregate;
pub mod backup;
mod duration;
mod error;
pub mod event;
pub mod event_type;
pub mod guard;
pub mod journal;
#[cfg(test)]
mod memory;
pub mod report;
pub mod retention;
pub mod store;
pub mod time;
pub mod timeline;
pub mod types;

pub use aggregate::CategoryTotal;
pub use duration::{NO_DURATION, format_minutes};
pub use error::EngineError;
pub use event::{Category, EventChanges, NewCategory, NewTaskEvent, TaskEvent};
pub use event_type::{EventKind, SPECIAL_CATEGORY, UnknownEventKind};
pub use journal::DayContext;
pub use report::DayReport;
pub use retention::{EvictionFailure, RetentionSettings};
pub use store::{EventStore, StoreError};
pub use time::StartTime;
pub use timeline::{Successor, Timeline};
pub use types::{CategoryId, EventId, ValidationError};
