//! Pause and end commands: markers stamped with the current time.

use std::io::Write;

use anyhow::Result;
use chrono::{Local, NaiveDateTime};
use clap::Args;

use dl_core::{DayContext, EventKind, NewTaskEvent, journal};

use crate::Config;
use crate::commands::util::open_database;

#[derive(Debug, Args)]
pub struct MarkerArgs {
    /// Label shown in the timeline.
    pub label: Option<String>,
}

pub fn run<W: Write>(writer: &mut W, kind: EventKind, args: &MarkerArgs, config: &Config) -> Result<()> {
    run_at(writer, kind, args, config, Local::now().naive_local())
}

/// Logs a `pause` or `end` marker at `now`.
///
/// Closing a day runs retention eviction when it is enabled, after the new
/// marker has been reported.
pub fn run_at<W: Write>(
    writer: &mut W,
    kind: EventKind,
    args: &MarkerArgs,
    config: &Config,
    now: NaiveDateTime,
) -> Result<()> {
    let event = NewTaskEvent::marker(kind, args.label.as_deref().unwrap_or_default(), now)?;

    let mut db = open_database(config)?;
    let mut ctx = DayContext::load(&db, event.date)?;
    let recorded = journal::record_event(&mut db, &mut ctx, &event)?;

    let stored = &recorded.event;
    match stored.kind {
        EventKind::End => writeln!(
            writer,
            "Closed {} at {} (#{})",
            stored.date, stored.start_time, stored.id
        )?,
        EventKind::Pause | EventKind::Normal => writeln!(
            writer,
            "{} at {} (#{})",
            stored.label, stored.start_time, stored.id
        )?,
    }
    writer.flush()?;

    recorded.finish(&mut db, &mut ctx, &config.retention_settings(), now.date());
    Ok(())
}
