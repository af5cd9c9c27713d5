//! Task events and categories.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event_type::{EventKind, SPECIAL_CATEGORY};
use crate::time::{StartTime, parse_start_time};
use crate::types::{CategoryId, EventId, MAX_CATEGORY_CODE_LEN, ValidationError, non_blank};

/// One dated, start-time-stamped entry of a day.
///
/// Durations are never stored; they are derived from the next event of the
/// same date. `start_time` is kept as text so that rows written by older
/// versions or foreign tools stay readable even when they do not parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskEvent {
    pub id: EventId,
    pub category: String,
    pub label: String,
    pub start_time: String,
    pub date: NaiveDate,
    pub kind: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl TaskEvent {
    /// Minute of day of the start time, or `None` if it does not parse.
    pub fn start_minutes(&self) -> Option<u16> {
        parse_start_time(&self.start_time)
    }
}

/// A validated event ready to be handed to the record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskEvent {
    pub category: String,
    pub label: String,
    pub start_time: StartTime,
    pub date: NaiveDate,
    pub kind: EventKind,
}

impl NewTaskEvent {
    /// A normal tracked task.
    pub fn task(
        category: &str,
        label: &str,
        start_time: StartTime,
        date: NaiveDate,
    ) -> Result<Self, ValidationError> {
        let category = task_category(category)?;
        let label = non_blank(label, "task name")?;
        Ok(Self {
            category,
            label,
            start_time,
            date,
            kind: EventKind::Normal,
        })
    }

    /// A pause or end marker stamped with `at` (local wall clock).
    ///
    /// A blank label falls back to a kind-specific default.
    pub fn marker(kind: EventKind, label: &str, at: NaiveDateTime) -> Result<Self, ValidationError> {
        if !kind.is_special() {
            return Err(ValidationError::NotAMarker { kind });
        }
        let label = match label.trim() {
            "" => default_marker_label(kind).to_string(),
            trimmed => trimmed.to_string(),
        };
        Ok(Self {
            category: SPECIAL_CATEGORY.to_string(),
            label,
            start_time: StartTime::from_time(at.time()),
            date: at.date(),
            kind,
        })
    }
}

const fn default_marker_label(kind: EventKind) -> &'static str {
    match kind {
        EventKind::End => "End of day",
        EventKind::Pause | EventKind::Normal => "Pause",
    }
}

fn task_category(category: &str) -> Result<String, ValidationError> {
    let category = non_blank(category, "category")?;
    if category == SPECIAL_CATEGORY {
        return Err(ValidationError::ReservedCategory { name: category });
    }
    Ok(category)
}

/// Partial update of an event's mutable fields. The kind is immutable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventChanges {
    pub category: Option<String>,
    pub label: Option<String>,
    pub start_time: Option<StartTime>,
    pub date: Option<NaiveDate>,
}

impl EventChanges {
    pub const fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.label.is_none()
            && self.start_time.is_none()
            && self.date.is_none()
    }

    /// Trims text fields and checks them against the rules for `kind`.
    pub fn validated_for(&self, kind: EventKind) -> Result<Self, ValidationError> {
        let category = match self.category.as_deref() {
            Some(_) if kind.is_special() => return Err(ValidationError::MarkerCategory { kind }),
            Some(category) => Some(task_category(category)?),
            None => None,
        };
        let label = self
            .label
            .as_deref()
            .map(|label| non_blank(label, "task name"))
            .transpose()?;
        Ok(Self {
            category,
            label,
            start_time: self.start_time,
            date: self.date,
        })
    }

    /// Applies the changes to an in-memory copy of an event.
    pub fn apply_to(&self, event: &mut TaskEvent) {
        if let Some(category) = &self.category {
            event.category.clone_from(category);
        }
        if let Some(label) = &self.label {
            event.label.clone_from(label);
        }
        if let Some(start_time) = self.start_time {
            event.start_time = start_time.to_string();
        }
        if let Some(date) = self.date {
            event.date = date;
        }
    }
}

/// A user-defined grouping for tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

/// A validated category ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
    pub code: Option<String>,
}

impl NewCategory {
    pub fn new(name: &str, code: Option<&str>) -> Result<Self, ValidationError> {
        let name = non_blank(name, "category name")?;
        if name == SPECIAL_CATEGORY {
            return Err(ValidationError::ReservedCategory { name });
        }
        let code = code.map(str::trim).filter(|code| !code.is_empty());
        if let Some(code) = code {
            let len = code.chars().count();
            if len > MAX_CATEGORY_CODE_LEN {
                return Err(ValidationError::CodeTooLong { len });
            }
        }
        Ok(Self {
            name,
            code: code.map(str::to_string),
        })
    }
}
