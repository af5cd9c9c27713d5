//! Recognizing writes rejected by the end-of-day index.
//!
//! Depending on the `SQLite` build and the statement that failed, the same
//! violation can show up as a constraint result code, as the extended
//! `SQLITE_CONSTRAINT_UNIQUE` code, or only as message text naming the index
//! or its column. All three map to one answer here.

use std::sync::LazyLock;

use regex::Regex;
use rusqlite::ErrorCode;
use rusqlite::ffi;

/// Matches `SQLite` messages produced by the one-end-per-day index.
static END_OF_DAY_INDEX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(one_end_per_day|unique constraint failed:\s*task_records\.date)").unwrap()
});

/// Whether `err` is a violation of the one-end-marker-per-day index.
///
/// Only call this for writes to `task_records`, where the index is the only
/// unique constraint besides the row ID. `writing_end` says whether the
/// failed statement wrote an `end` row; a bare constraint code only counts
/// for those.
pub fn is_end_of_day_violation(err: &rusqlite::Error, writing_end: bool) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(failure, message) => {
            let structured = writing_end
                && failure.code == ErrorCode::ConstraintViolation
                && failure.extended_code != ffi::SQLITE_CONSTRAINT_CHECK
                && failure.extended_code != ffi::SQLITE_CONSTRAINT_NOTNULL;
            let numeric = failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE;
            let textual = message
                .as_deref()
                .is_some_and(|message| END_OF_DAY_INDEX_RE.is_match(message));
            structured || numeric || textual
        }
        other => END_OF_DAY_INDEX_RE.is_match(&other.to_string()),
    }
}
