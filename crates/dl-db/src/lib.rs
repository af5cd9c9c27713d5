//! Storage layer for the day log.
//!
//! Provides persistence for task events and categories using `rusqlite`.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! A `Database` instance can be moved between threads but cannot be shared
//! across threads without external synchronization.
//!
//! # Schema
//!
//! Dates are stored as local `YYYY-MM-DD` TEXT and start times as `HH:mm`
//! TEXT, so lexicographic ordering matches chronological ordering for valid
//! rows. Creation timestamps are RFC 3339 UTC.
//!
//! The partial unique index `idx_task_records_one_end_per_day` enforces at
//! most one `end` row per date. Violations surface as
//! [`DbError::DuplicateEndOfDay`], never as a raw `SQLite` error.

mod categories;
mod violation;

use std::path::Path;

use chrono::{DateTime, NaiveDate, SecondsFormat, SubsecRound, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use thiserror::Error;

use dl_core::backup::{ImportCategory, ImportTaskRecord};
use dl_core::time::{format_date, parse_date};
use dl_core::{
    CategoryId, EventChanges, EventId, EventKind, EventStore, NewTaskEvent, StoreError, TaskEvent,
    ValidationError,
};

pub use violation::is_end_of_day_violation;

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// The one-end-marker-per-day index rejected a write.
    #[error("an end-of-day marker already exists for {date}")]
    DuplicateEndOfDay { date: NaiveDate },
    /// No task event with this ID.
    #[error("event {0} not found")]
    EventNotFound(EventId),
    /// No category with this ID.
    #[error("category {0} not found")]
    CategoryNotFound(CategoryId),
    /// A category with this name already exists.
    #[error("category {name:?} already exists")]
    DuplicateCategory { name: String },
    /// Input failed domain validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// A stored row could not be read back.
    #[error("invalid task record {id}: {message}")]
    InvalidRow { id: i64, message: String },
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::DuplicateEndOfDay { date } => Self::DuplicateEndOfDay { date },
            DbError::EventNotFound(id) => Self::NotFound(id),
            other => Self::Backend(other.to_string()),
        }
    }
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

/// Row counts written by [`Database::replace_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportStats {
    pub categories: usize,
    pub task_records: usize,
}

const TASK_COLUMNS: &str = "id, category_name, task_name, start_time, date, task_type, created_at";

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                code TEXT,
                is_default INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            );

            CREATE UNIQUE INDEX IF NOT EXISTS idx_categories_single_default
                ON categories(is_default) WHERE is_default = 1;

            -- task_records: one row per logged event
            -- start_time: 'HH:mm' local wall clock
            -- date: 'YYYY-MM-DD' local calendar date
            -- task_type: 'normal' | 'pause' | 'end'
            CREATE TABLE IF NOT EXISTS task_records (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                category_name TEXT NOT NULL,
                task_name TEXT NOT NULL,
                start_time TEXT NOT NULL,
                date TEXT NOT NULL,
                task_type TEXT NOT NULL DEFAULT 'normal'
                    CHECK (task_type IN ('normal', 'pause', 'end')),
                created_at TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_task_records_date ON task_records(date);
            CREATE UNIQUE INDEX IF NOT EXISTS idx_task_records_one_end_per_day
                ON task_records(date) WHERE task_type = 'end';
            ",
        )?;
        Ok(())
    }

    /// Lists events for one date, ordered by start time then ID.
    pub fn events_on(&self, date: NaiveDate) -> Result<Vec<TaskEvent>, DbError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM task_records WHERE date = ? ORDER BY start_time ASC, id ASC"
        ))?;
        let rows = stmt.query_map([format_date(date)], TaskRow::from_row)?;
        collect_events(rows)
    }

    /// Lists every event, ordered by date, start time, then ID.
    pub fn list_events(&self) -> Result<Vec<TaskEvent>, DbError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM task_records ORDER BY date ASC, start_time ASC, id ASC"
        ))?;
        let rows = stmt.query_map([], TaskRow::from_row)?;
        collect_events(rows)
    }

    /// Looks up one event by ID.
    pub fn get_event(&self, id: EventId) -> Result<Option<TaskEvent>, DbError> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM task_records WHERE id = ?"),
                [id.get()],
                TaskRow::from_row,
            )
            .optional()?;
        row.map(TaskRow::into_event).transpose()
    }

    /// Inserts an event, stamping its creation time.
    pub fn insert_event(&mut self, event: &NewTaskEvent) -> Result<TaskEvent, DbError> {
        let created_at = stored_now();
        self.conn
            .execute(
                "
                INSERT INTO task_records (category_name, task_name, start_time, date, task_type, created_at)
                VALUES (?, ?, ?, ?, ?, ?)
                ",
                params![
                    event.category,
                    event.label,
                    event.start_time.to_string(),
                    format_date(event.date),
                    event.kind.as_str(),
                    format_timestamp(created_at),
                ],
            )
            .map_err(|err| write_error(err, event.kind, event.date))?;
        let id = EventId::new(self.conn.last_insert_rowid());
        tracing::debug!(%id, kind = %event.kind, date = %event.date, "inserted task record");

        Ok(TaskEvent {
            id,
            category: event.category.clone(),
            label: event.label.clone(),
            start_time: event.start_time.to_string(),
            date: event.date,
            kind: event.kind,
            created_at: Some(created_at),
        })
    }

    /// Applies changes to an event's mutable fields.
    pub fn update_event(&mut self, id: EventId, changes: &EventChanges) -> Result<TaskEvent, DbError> {
        let mut event = self.get_event(id)?.ok_or(DbError::EventNotFound(id))?;
        let changes = changes.validated_for(event.kind)?;
        changes.apply_to(&mut event);

        self.conn
            .execute(
                "
                UPDATE task_records
                SET category_name = ?, task_name = ?, start_time = ?, date = ?
                WHERE id = ?
                ",
                params![
                    event.category,
                    event.label,
                    event.start_time,
                    format_date(event.date),
                    id.get(),
                ],
            )
            .map_err(|err| write_error(err, event.kind, event.date))?;
        tracing::debug!(%id, "updated task record");
        Ok(event)
    }

    /// Deletes one event.
    pub fn delete_event(&mut self, id: EventId) -> Result<(), DbError> {
        let deleted = self
            .conn
            .execute("DELETE FROM task_records WHERE id = ?", [id.get()])?;
        if deleted == 0 {
            return Err(DbError::EventNotFound(id));
        }
        Ok(())
    }

    /// Deletes every event dated strictly before `cutoff`.
    pub fn delete_events_before(&mut self, cutoff: NaiveDate) -> Result<usize, DbError> {
        let deleted = self
            .conn
            .execute("DELETE FROM task_records WHERE date < ?", [format_date(cutoff)])?;
        tracing::debug!(%cutoff, deleted, "bulk deleted task records");
        Ok(deleted)
    }

    /// Replaces every category and event in a single transaction.
    ///
    /// Input is expected to be normalized already. If any row is rejected
    /// the transaction rolls back and the previous data stays untouched.
    pub fn replace_all(
        &mut self,
        categories: &[ImportCategory],
        records: &[ImportTaskRecord],
    ) -> Result<ImportStats, DbError> {
        let now = format_timestamp(Utc::now());
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM task_records", [])?;
        tx.execute("DELETE FROM categories", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO categories (name, code, is_default, created_at) VALUES (?, ?, ?, ?)",
            )?;
            for category in categories {
                stmt.execute(params![category.name, category.code, category.is_default, now])?;
            }
        }
        {
            let mut stmt = tx.prepare(
                "
                INSERT INTO task_records (category_name, task_name, start_time, date, task_type, created_at)
                VALUES (?, ?, ?, ?, ?, ?)
                ",
            )?;
            for record in records {
                let created_at = record.created_at.map_or_else(|| now.clone(), format_timestamp);
                stmt.execute(params![
                    record.category,
                    record.label,
                    record.start_time,
                    format_date(record.date),
                    record.kind.as_str(),
                    created_at,
                ])
                .map_err(|err| write_error(err, record.kind, record.date))?;
            }
        }
        tx.commit()?;

        Ok(ImportStats {
            categories: categories.len(),
            task_records: records.len(),
        })
    }
}

impl EventStore for Database {
    fn events_on(&self, date: NaiveDate) -> Result<Vec<TaskEvent>, StoreError> {
        Ok(Self::events_on(self, date)?)
    }

    fn insert_event(&mut self, event: &NewTaskEvent) -> Result<TaskEvent, StoreError> {
        Ok(Self::insert_event(self, event)?)
    }

    fn update_event(&mut self, id: EventId, changes: &EventChanges) -> Result<TaskEvent, StoreError> {
        Ok(Self::update_event(self, id, changes)?)
    }

    fn delete_event(&mut self, id: EventId) -> Result<(), StoreError> {
        Ok(Self::delete_event(self, id)?)
    }

    fn delete_events_before(&mut self, cutoff: NaiveDate) -> Result<usize, StoreError> {
        Ok(Self::delete_events_before(self, cutoff)?)
    }
}

/// Maps a failed task write to the domain error when it hit the
/// end-of-day index.
fn write_error(err: rusqlite::Error, kind: EventKind, date: NaiveDate) -> DbError {
    if is_end_of_day_violation(&err, kind == EventKind::End) {
        tracing::debug!(%date, "end-of-day index rejected write");
        return DbError::DuplicateEndOfDay { date };
    }
    DbError::Sqlite(err)
}

#[derive(Debug)]
struct TaskRow {
    id: i64,
    category: String,
    label: String,
    start_time: String,
    date: String,
    kind: String,
    created_at: Option<String>,
}

impl TaskRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            category: row.get(1)?,
            label: row.get(2)?,
            start_time: row.get(3)?,
            date: row.get(4)?,
            kind: row.get(5)?,
            created_at: row.get(6)?,
        })
    }

    fn into_event(self) -> Result<TaskEvent, DbError> {
        let date = parse_date(&self.date).ok_or_else(|| DbError::InvalidRow {
            id: self.id,
            message: format!("invalid date {:?}", self.date),
        })?;
        let created_at = self
            .created_at
            .as_deref()
            .map(|at| parse_timestamp(at, self.id))
            .transpose()?;
        Ok(TaskEvent {
            id: EventId::new(self.id),
            category: self.category,
            label: self.label,
            start_time: self.start_time,
            date,
            kind: EventKind::parse_lenient(&self.kind),
            created_at,
        })
    }
}

fn collect_events(
    rows: impl Iterator<Item = rusqlite::Result<TaskRow>>,
) -> Result<Vec<TaskEvent>, DbError> {
    let mut events = Vec::new();
    for row in rows {
        events.push(row?.into_event()?);
    }
    Ok(events)
}

fn parse_timestamp(timestamp: &str, id: i64) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|err| DbError::InvalidRow {
            id,
            message: format!("invalid timestamp {timestamp:?}: {err}"),
        })
}

/// Current time at the precision timestamps are stored with.
fn stored_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}
