//! Shared utilities for CLI commands.

use anyhow::{Context, Result};
use chrono::NaiveDate;

use dl_core::time::parse_date;
use dl_core::{EventKind, SPECIAL_CATEGORY, TaskEvent, ValidationError};
use dl_db::Database;

use crate::Config;

/// Opens the configured database, creating its parent directory first.
pub fn open_database(config: &Config) -> Result<Database> {
    let parent = config
        .database_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty());
    if let Some(parent) = parent {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("failed to create database directory {}", parent.display())
        })?;
    }
    Database::open(&config.database_path)
        .with_context(|| format!("failed to open {}", config.database_path.display()))
}

/// Clap value parser for `YYYY-MM-DD` arguments.
pub fn parse_date_arg(value: &str) -> Result<NaiveDate, ValidationError> {
    parse_date(value).ok_or_else(|| ValidationError::InvalidDate {
        value: value.to_string(),
    })
}

/// Category column text: markers show their kind instead of the sentinel.
pub fn display_category(kind: EventKind, category: &str) -> String {
    if kind.is_special() || category == SPECIAL_CATEGORY {
        format!("({kind})")
    } else {
        category.to_string()
    }
}

/// One-line summary used in command confirmations.
pub fn describe_event(event: &TaskEvent) -> String {
    format!(
        "#{} {} {} {} / {}",
        event.id,
        event.date,
        event.start_time,
        display_category(event.kind, &event.category),
        event.label
    )
}
