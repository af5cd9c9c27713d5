//! Add command for logging the start of a task.

use std::io::Write;

use anyhow::Result;
use chrono::{Local, NaiveDate, NaiveDateTime};
use clap::Args;

use dl_core::{DayContext, NewTaskEvent, StartTime, journal};

use crate::Config;
use crate::commands::util::{describe_event, open_database, parse_date_arg};

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Category the task belongs to.
    pub category: String,
    /// What you are starting.
    pub label: String,
    /// Start time (HH:mm). Defaults to now.
    #[arg(long)]
    pub at: Option<StartTime>,
    /// Date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date_arg)]
    pub date: Option<NaiveDate>,
}

pub fn run<W: Write>(writer: &mut W, args: &AddArgs, config: &Config) -> Result<()> {
    run_at(writer, args, config, Local::now().naive_local())
}

pub fn run_at<W: Write>(
    writer: &mut W,
    args: &AddArgs,
    config: &Config,
    now: NaiveDateTime,
) -> Result<()> {
    let date = args.date.unwrap_or_else(|| now.date());
    let start = args.at.unwrap_or_else(|| StartTime::from_time(now.time()));
    let event = NewTaskEvent::task(&args.category, &args.label, start, date)?;

    let mut db = open_database(config)?;
    if db.find_category(&event.category)?.is_none() {
        tracing::debug!(category = %event.category, "task uses a category that is not registered");
    }
    let mut ctx = DayContext::load(&db, date)?;
    let stored = journal::create_event_at(
        &mut db,
        &mut ctx,
        &event,
        &config.retention_settings(),
        now.date(),
    )?;

    writeln!(writer, "Logged {}", describe_event(&stored))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use dl_db::Database;
    use insta::assert_snapshot;

    use crate::RetentionConfig;

    fn config_in(temp: &tempfile::TempDir) -> Config {
        Config {
            database_path: temp.path().join("daylog.db"),
            retention: RetentionConfig::default(),
        }
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 15)
            .unwrap()
            .and_hms_opt(9, 41, 30)
            .unwrap()
    }

    fn args(category: &str, label: &str) -> AddArgs {
        AddArgs {
            category: category.to_string(),
            label: label.to_string(),
            at: None,
            date: None,
        }
    }

    #[test]
    fn add_defaults_to_now() {
        let temp = tempfile::tempdir().unwrap();
        let config = config_in(&temp);
        let mut output = Vec::new();

        run_at(&mut output, &args("Dev", "Code review"), &config, now()).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output, @"Logged #1 2025-06-15 09:41 Dev / Code review");
    }

    #[test]
    fn add_uses_explicit_time_and_date() {
        let temp = tempfile::tempdir().unwrap();
        let config = config_in(&temp);
        let mut output = Vec::new();
        let mut add = args(" Ops ", " Deploy ");
        add.at = Some("7:30".parse().unwrap());
        add.date = Some(NaiveDate::from_ymd_opt(2025, 6, 14).unwrap());

        run_at(&mut output, &add, &config, now()).unwrap();

        let db = Database::open(&config.database_path).unwrap();
        let events = db.events_on(NaiveDate::from_ymd_opt(2025, 6, 14).unwrap()).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].category, "Ops");
        assert_eq!(events[0].label, "Deploy");
        assert_eq!(events[0].start_time, "07:30");
    }

    #[test]
    fn add_rejects_the_marker_category() {
        let temp = tempfile::tempdir().unwrap();
        let config = config_in(&temp);
        let mut output = Vec::new();

        let err = run_at(&mut output, &args("__special__", "x"), &config, now()).unwrap_err();
        assert!(err.to_string().contains("reserved"));
    }

    #[test]
    fn add_rejects_blank_labels() {
        let temp = tempfile::tempdir().unwrap();
        let config = config_in(&temp);
        let mut output = Vec::new();

        let err = run_at(&mut output, &args("Dev", "   "), &config, now()).unwrap_err();
        assert_eq!(err.to_string(), "task name cannot be empty");
    }
}
