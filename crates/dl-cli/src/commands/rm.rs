//! Rm command for deleting an event of a day.

use std::io::Write;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::Args;

use dl_core::{DayContext, EventId, journal};

use crate::Config;
use crate::commands::util::{open_database, parse_date_arg};

#[derive(Debug, Args)]
pub struct RmArgs {
    /// Event ID, as shown by `dl show`.
    pub id: i64,
    /// Day the event is on (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date_arg)]
    pub date: Option<NaiveDate>,
}

pub fn run<W: Write>(writer: &mut W, args: &RmArgs, config: &Config) -> Result<()> {
    run_on(writer, args, config, Local::now().date_naive())
}

pub fn run_on<W: Write>(writer: &mut W, args: &RmArgs, config: &Config, today: NaiveDate) -> Result<()> {
    let date = args.date.unwrap_or(today);
    let id = EventId::new(args.id);
    let mut db = open_database(config)?;
    let mut ctx = DayContext::load(&db, date)?;
    journal::delete_event(&mut db, &mut ctx, id)?;

    writeln!(writer, "Deleted #{id} from {date}")?;
    Ok(())
}
