//! Errors returned by the write path.

use chrono::NaiveDate;
use thiserror::Error;

use crate::store::StoreError;
use crate::types::{EventId, ValidationError};

/// Errors surfaced to callers of the engine.
///
/// A duplicate end-of-day marker reports the same variant and message
/// whether the in-memory pre-check or the store constraint caught it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A required field was missing or malformed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The date already has an `end` marker.
    #[error("an end-of-day marker already exists for {date}")]
    DuplicateEndOfDay { date: NaiveDate },

    /// The event is not part of the currently loaded day.
    #[error("event {id} is not part of the loaded day")]
    StaleReference { id: EventId },

    /// The record store is missing or failed.
    #[error("record store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEndOfDay { date } => Self::DuplicateEndOfDay { date },
            StoreError::NotFound(id) => Self::StaleReference { id },
            StoreError::Unsupported(_) | StoreError::Backend(_) => {
                Self::StoreUnavailable(err.to_string())
            }
        }
    }
}
