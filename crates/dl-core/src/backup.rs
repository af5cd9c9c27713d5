//! Backup snapshots: export format, validation, and import normalization.
//!
//! An import replaces the whole dataset, so the normalizers never fail on
//! individual rows: anything unusable is dropped and the rest is cleaned up
//! to satisfy the same invariants the write path enforces.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::event::{Category, TaskEvent};
use crate::event_type::{EventKind, SPECIAL_CATEGORY};
use crate::time::{StartTime, format_date, parse_date};
use crate::types::MAX_CATEGORY_CODE_LEN;

/// Snapshot format version written by export and accepted by import.
pub const SNAPSHOT_VERSION: u64 = 1;

/// Errors that reject a snapshot before normalization.
#[derive(Debug, Error)]
pub enum BackupError {
    #[error("backup is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("backup must be a JSON object")]
    NotAnObject,

    #[error("unsupported backup version: {0}")]
    UnsupportedVersion(String),

    #[error("backup is missing the {0:?} section")]
    MissingSection(&'static str),
}

/// Exported document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub version: u64,
    pub exported_at: String,
    pub categories: Vec<SnapshotCategory>,
    pub task_records: Vec<SnapshotTaskRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotCategory {
    pub name: String,
    pub code: Option<String>,
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotTaskRecord {
    pub category_name: String,
    pub task_name: String,
    pub start_time: String,
    pub date: String,
    pub task_type: EventKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Snapshot {
    /// Builds a snapshot of the full dataset. Records are ordered by date,
    /// then start time (unparsable times last), then ID.
    pub fn build(categories: &[Category], events: &[TaskEvent], exported_at: DateTime<Utc>) -> Self {
        let mut events: Vec<&TaskEvent> = events.iter().collect();
        events.sort_by_key(|event| {
            (
                event.date,
                event.start_minutes().map_or((1, 0), |minutes| (0, minutes)),
                event.id,
            )
        });

        Self {
            version: SNAPSHOT_VERSION,
            exported_at: exported_at.to_rfc3339(),
            categories: categories
                .iter()
                .map(|category| SnapshotCategory {
                    name: category.name.clone(),
                    code: category.code.clone(),
                    is_default: category.is_default,
                })
                .collect(),
            task_records: events
                .into_iter()
                .map(|event| SnapshotTaskRecord {
                    category_name: event.category.clone(),
                    task_name: event.label.clone(),
                    start_time: event.start_time.clone(),
                    date: format_date(event.date),
                    task_type: event.kind,
                    created_at: event.created_at.map(|at| at.to_rfc3339()),
                })
                .collect(),
        }
    }
}

/// Unvalidated category row from a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawCategory {
    pub name: Value,
    pub code: Value,
    pub is_default: Value,
}

/// Unvalidated task row from a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawTaskRecord {
    pub category_name: Value,
    pub task_name: Value,
    pub start_time: Value,
    pub date: Value,
    pub task_type: Value,
    pub created_at: Value,
}

/// A snapshot that passed the top-level checks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSnapshot {
    pub categories: Vec<RawCategory>,
    pub task_records: Vec<RawTaskRecord>,
}

/// Parses a snapshot document, rejecting unknown versions and missing
/// sections. Rows that are not objects become empty rows, which the
/// normalizers then drop.
pub fn parse_snapshot(json: &str) -> Result<RawSnapshot, BackupError> {
    let document: Value = serde_json::from_str(json)?;
    let Value::Object(document) = document else {
        return Err(BackupError::NotAnObject);
    };

    match document.get("version") {
        Some(Value::Number(version)) if version.as_u64() == Some(SNAPSHOT_VERSION) => {}
        Some(other) => return Err(BackupError::UnsupportedVersion(other.to_string())),
        None => return Err(BackupError::UnsupportedVersion("missing".to_string())),
    }

    let categories = section(&document, "categories")?;
    let task_records = section(&document, "task_records")?;

    Ok(RawSnapshot {
        categories: categories.iter().map(row).collect(),
        task_records: task_records.iter().map(row).collect(),
    })
}

fn section<'a>(
    document: &'a serde_json::Map<String, Value>,
    name: &'static str,
) -> Result<&'a Vec<Value>, BackupError> {
    match document.get(name) {
        Some(Value::Array(rows)) => Ok(rows),
        _ => Err(BackupError::MissingSection(name)),
    }
}

fn row<T: for<'de> Deserialize<'de> + Default>(value: &Value) -> T {
    T::deserialize(value).unwrap_or_default()
}

/// A category ready for a full replacement import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportCategory {
    pub name: String,
    pub code: Option<String>,
    pub is_default: bool,
}

/// A task record ready for a full replacement import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportTaskRecord {
    pub category: String,
    pub label: String,
    pub start_time: String,
    pub date: NaiveDate,
    pub kind: EventKind,
    pub created_at: Option<DateTime<Utc>>,
}

/// Trims and deduplicates categories and settles on exactly one default.
///
/// Blank names are dropped; among case-sensitive duplicates the first
/// trimmed occurrence wins. Codes are trimmed and cut to
/// [`MAX_CATEGORY_CODE_LEN`] characters. The first row flagged default
/// becomes the default, otherwise the first surviving row does.
pub fn normalize_categories(raw: &[RawCategory]) -> Vec<ImportCategory> {
    let mut seen = HashSet::new();
    let mut categories = Vec::with_capacity(raw.len());
    let mut default_index = None;

    for row in raw {
        let name = text(&row.name);
        if name.is_empty() || !seen.insert(name.clone()) {
            tracing::debug!(name = %name, "dropping category row");
            continue;
        }
        let code = text(&row.code);
        let code = (!code.is_empty()).then(|| code.chars().take(MAX_CATEGORY_CODE_LEN).collect());
        if default_index.is_none() && truthy(&row.is_default) {
            default_index = Some(categories.len());
        }
        categories.push(ImportCategory {
            name,
            code,
            is_default: false,
        });
    }

    if let Some(default) = categories.get_mut(default_index.unwrap_or(0)) {
        default.is_default = true;
    }
    categories
}

/// Drops incomplete rows and re-applies the one-end-per-date rule.
///
/// Rows missing a category, task name, start time or date are dropped, as
/// are rows whose date is not `YYYY-MM-DD`. Unknown kinds become `normal`.
/// Markers are filed under [`SPECIAL_CATEGORY`]; normal rows using it are
/// dropped. Only the first `end` row per date survives. Parseable start times are
/// rewritten as `HH:mm`; an unparsable `created_at` is discarded.
pub fn normalize_task_records(raw: &[RawTaskRecord]) -> Vec<ImportTaskRecord> {
    let mut closed_dates = HashSet::new();
    let mut records = Vec::with_capacity(raw.len());

    for (index, row) in raw.iter().enumerate() {
        let category = text(&row.category_name);
        let label = text(&row.task_name);
        let start_time = text(&row.start_time);
        let date = text(&row.date);
        if category.is_empty() || label.is_empty() || start_time.is_empty() || date.is_empty() {
            tracing::debug!(index, "dropping incomplete task row");
            continue;
        }
        let Some(date) = parse_date(&date) else {
            tracing::debug!(index, date = %date, "dropping task row with invalid date");
            continue;
        };

        let kind = EventKind::parse_lenient(&text(&row.task_type));
        let category = if kind.is_special() {
            SPECIAL_CATEGORY.to_string()
        } else if category == SPECIAL_CATEGORY {
            tracing::debug!(index, "dropping task row filed under the marker category");
            continue;
        } else {
            category
        };
        if kind == EventKind::End && !closed_dates.insert(date) {
            tracing::debug!(index, %date, "dropping extra end-of-day marker");
            continue;
        }

        let start_time = start_time
            .parse::<StartTime>()
            .map_or(start_time, |parsed| parsed.to_string());
        let created_at = Some(text(&row.created_at))
            .filter(|at| !at.is_empty())
            .and_then(|at| DateTime::parse_from_rfc3339(&at).ok())
            .map(|at| at.with_timezone(&Utc));

        records.push(ImportTaskRecord {
            category,
            label,
            start_time,
            date,
            kind,
            created_at,
        });
    }
    records
}

/// Coerces a scalar JSON value to trimmed text. Missing, null and
/// compound values become empty.
fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n.abs() > 0.0),
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1"),
        Value::Null | Value::Array(_) | Value::Object(_) => false,
    }
}
