//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::event_type::EventKind;

/// Maximum length of a category short code, in characters.
pub const MAX_CATEGORY_CODE_LEN: usize = 10;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty or blank.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// A normal task tried to use the category reserved for markers.
    #[error("category name {name:?} is reserved for pause and end markers")]
    ReservedCategory { name: String },

    /// The start time is not a valid 24-hour `H:mm` / `HH:mm` value.
    #[error("invalid start time {value:?}, expected HH:mm")]
    InvalidStartTime { value: String },

    /// The date is not an ISO `YYYY-MM-DD` value.
    #[error("invalid date {value:?}, expected YYYY-MM-DD")]
    InvalidDate { value: String },

    /// The category short code is longer than allowed.
    #[error("category code must be at most {MAX_CATEGORY_CODE_LEN} characters, got {len}")]
    CodeTooLong { len: usize },

    /// A marker constructor was given a kind that is not a marker.
    #[error("{kind} is not a marker kind")]
    NotAMarker { kind: EventKind },

    /// Marker categories are fixed.
    #[error("cannot change the category of {kind} markers")]
    MarkerCategory { kind: EventKind },
}

/// Generates a store-assigned integer ID newtype with common trait implementations.
macro_rules! define_int_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw store identifier.
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Returns the raw identifier.
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

define_int_id!(
    /// Identifier of a stored task event, assigned by the record store.
    EventId
);

define_int_id!(
    /// Identifier of a stored category, assigned by the record store.
    CategoryId
);

/// Trims `value` and rejects it when nothing is left.
pub(crate) fn non_blank(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(trimmed.to_string())
}
