//! Edit command for changing an event of a day.

use std::io::Write;

use anyhow::{Result, bail};
use chrono::{Local, NaiveDate};
use clap::Args;

use dl_core::{DayContext, EventChanges, EventId, StartTime, journal};

use crate::Config;
use crate::commands::util::{describe_event, open_database, parse_date_arg};

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Event ID, as shown by `dl show`.
    pub id: i64,
    /// Day the event is currently on (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date_arg)]
    pub date: Option<NaiveDate>,
    /// New category (normal tasks only).
    #[arg(long)]
    pub category: Option<String>,
    /// New label.
    #[arg(long)]
    pub label: Option<String>,
    /// New start time (HH:mm).
    #[arg(long)]
    pub at: Option<StartTime>,
    /// Move the event to another day (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date_arg)]
    pub move_to: Option<NaiveDate>,
}

impl EditArgs {
    fn changes(&self) -> EventChanges {
        EventChanges {
            category: self.category.clone(),
            label: self.label.clone(),
            start_time: self.at,
            date: self.move_to,
        }
    }
}

pub fn run<W: Write>(writer: &mut W, args: &EditArgs, config: &Config) -> Result<()> {
    run_on(writer, args, config, Local::now().date_naive())
}

pub fn run_on<W: Write>(
    writer: &mut W,
    args: &EditArgs,
    config: &Config,
    today: NaiveDate,
) -> Result<()> {
    let changes = args.changes();
    if changes.is_empty() {
        bail!("nothing to change: pass --category, --label, --at or --move-to");
    }

    let date = args.date.unwrap_or(today);
    let mut db = open_database(config)?;
    let mut ctx = DayContext::load(&db, date)?;
    let updated = journal::update_event(&mut db, &mut ctx, EventId::new(args.id), &changes)?;

    writeln!(writer, "Updated {}", describe_event(&updated))?;
    Ok(())
}
