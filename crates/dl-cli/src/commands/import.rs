//! Import command: replaces all data with a backup snapshot.
//!
//! Rows are normalized first; the replacement itself is one transaction, so a
//! failed import leaves the previous data untouched.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use dl_core::backup::{normalize_categories, normalize_task_records, parse_snapshot};

use crate::Config;
use crate::commands::util::open_database;

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Snapshot file written by `dl export`.
    pub path: PathBuf,
}

pub fn run<W: Write>(writer: &mut W, args: &ImportArgs, config: &Config) -> Result<()> {
    let json = std::fs::read_to_string(&args.path)
        .with_context(|| format!("failed to read {}", args.path.display()))?;
    let raw = parse_snapshot(&json).with_context(|| format!("cannot import {}", args.path.display()))?;

    let categories = normalize_categories(&raw.categories);
    let records = normalize_task_records(&raw.task_records);
    let dropped_categories = raw.categories.len() - categories.len();
    let dropped_records = raw.task_records.len() - records.len();
    if dropped_categories > 0 || dropped_records > 0 {
        tracing::warn!(
            categories = dropped_categories,
            task_records = dropped_records,
            "dropped unusable rows from snapshot"
        );
    }

    let mut db = open_database(config)?;
    let stats = db
        .replace_all(&categories, &records)
        .context("import failed, existing data was left unchanged")?;
    tracing::info!(
        categories = stats.categories,
        task_records = stats.task_records,
        "imported snapshot"
    );

    writeln!(
        writer,
        "Imported {} categories and {} task records",
        stats.categories, stats.task_records
    )?;
    if dropped_categories > 0 || dropped_records > 0 {
        writeln!(
            writer,
            "Dropped {dropped_categories} category rows and {dropped_records} task rows"
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveDate;
    use dl_core::NewTaskEvent;
    use dl_db::Database;
    use insta::assert_snapshot;

    use crate::RetentionConfig;

    fn config_in(temp: &tempfile::TempDir) -> Config {
        Config {
            database_path: temp.path().join("daylog.db"),
            retention: RetentionConfig::default(),
        }
    }

    fn write_snapshot(temp: &tempfile::TempDir, json: &str) -> ImportArgs {
        let path = temp.path().join("backup.json");
        std::fs::write(&path, json).unwrap();
        ImportArgs { path }
    }

    #[test]
    fn import_replaces_data_and_reports_dropped_rows() {
        let temp = tempfile::tempdir().unwrap();
        let config = config_in(&temp);
        let mut db = Database::open(&config.database_path).unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        db.insert_event(&NewTaskEvent::task("Old", "replaced", "08:00".parse().unwrap(), date).unwrap())
            .unwrap();

        let args = write_snapshot(
            &temp,
            r#"{
                "version": 1,
                "exported_at": "2025-06-16T08:00:00Z",
                "categories": [
                    {"name": " Dev ", "code": "DV", "is_default": false},
                    {"name": "Dev"},
                    {"name": "Ops", "is_default": 1}
                ],
                "task_records": [
                    {"category_name": "Dev", "task_name": "Code review", "start_time": "9:00", "date": "2025-06-15", "task_type": "normal"},
                    {"category_name": "__special__", "task_name": "End of day", "start_time": "17:00", "date": "2025-06-15", "task_type": "end"},
                    {"category_name": "__special__", "task_name": "End of day", "start_time": "18:00", "date": "2025-06-15", "task_type": "end"},
                    {"category_name": "Dev", "task_name": "No date", "start_time": "10:00"},
                    {"category_name": "Dev", "task_name": "Bad date", "start_time": "10:00", "date": "15.06.2025"}
                ]
            }"#,
        );
        let mut output = Vec::new();

        run(&mut output, &args, &config).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output, @r"
        Imported 2 categories and 2 task records
        Dropped 1 category rows and 3 task rows
        ");

        let events = db.list_events().unwrap();
        let summary: Vec<_> = events
            .iter()
            .map(|e| (e.start_time.as_str(), e.kind.as_str()))
            .collect();
        assert_eq!(summary, vec![("09:00", "normal"), ("17:00", "end")]);

        let categories = db.list_categories().unwrap();
        let defaults: Vec<_> = categories
            .iter()
            .filter(|c| c.is_default)
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(defaults, vec!["Ops"]);
    }

    #[test]
    fn unsupported_version_leaves_data_untouched() {
        let temp = tempfile::tempdir().unwrap();
        let config = config_in(&temp);
        let mut db = Database::open(&config.database_path).unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        db.insert_event(&NewTaskEvent::task("Dev", "kept", "08:00".parse().unwrap(), date).unwrap())
            .unwrap();

        let args = write_snapshot(&temp, r#"{"version": 2, "categories": [], "task_records": []}"#);
        let mut output = Vec::new();

        let err = run(&mut output, &args, &config).unwrap_err();
        assert!(format!("{err:#}").contains("unsupported backup version: 2"));
        assert_eq!(db.list_events().unwrap().len(), 1);
    }

    #[test]
    fn malformed_json_is_rejected() {
        let temp = tempfile::tempdir().unwrap();
        let config = config_in(&temp);
        let args = write_snapshot(&temp, "{not json");
        let mut output = Vec::new();

        let err = run(&mut output, &args, &config).unwrap_err();
        assert!(format!("{err:#}").contains("backup is not valid JSON"));
    }

    #[test]
    fn missing_file_is_reported() {
        let temp = tempfile::tempdir().unwrap();
        let config = config_in(&temp);
        let args = ImportArgs {
            path: temp.path().join("missing.json"),
        };
        let mut output = Vec::new();

        let err = run(&mut output, &args, &config).unwrap_err();
        assert!(err.to_string().starts_with("failed to read"));
    }
}
