//! Show command: a day's timeline with durations and totals.
//!
//! Renders a [`DayReport`] either as a text table or as JSON (`--json`).
//! Percentages are rounded to one decimal in the output only.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime};
use clap::Args;
use serde::Serialize;

use dl_core::report::ReportRow;
use dl_core::{DayReport, format_minutes};

use crate::Config;
use crate::commands::util::{display_category, open_database, parse_date_arg};

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Date to show (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date_arg)]
    pub date: Option<NaiveDate>,
    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn run<W: Write>(writer: &mut W, args: &ShowArgs, config: &Config) -> Result<()> {
    run_at(writer, args, config, Local::now().naive_local())
}

pub fn run_at<W: Write>(
    writer: &mut W,
    args: &ShowArgs,
    config: &Config,
    now: NaiveDateTime,
) -> Result<()> {
    let date = args.date.unwrap_or_else(|| now.date());
    let db = open_database(config)?;
    let events = db
        .events_on(date)
        .with_context(|| format!("failed to load events for {date}"))?;
    let report = DayReport::build_at(date, &events, now);

    if args.json {
        let timezone = iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string());
        writeln!(writer, "{}", format_report_json(&report, &timezone)?)?;
    } else {
        write_report(writer, &report)?;
    }
    Ok(())
}

// ========== Text Output ==========

fn write_row<W: Write>(
    writer: &mut W,
    id: &str,
    time: &str,
    category: &str,
    label: &str,
    duration: &str,
) -> std::io::Result<()> {
    writeln!(writer, "{id:>4}  {time:<5}  {category:<14}  {label:<24}  {duration}")
}

/// Writes the human-readable day view.
pub fn write_report<W: Write>(writer: &mut W, report: &DayReport) -> std::io::Result<()> {
    let closed = if report.is_closed() { " (closed)" } else { "" };
    writeln!(writer, "Day log for {}{closed}", report.date.format("%A, %b %-d, %Y"))?;
    writeln!(writer)?;

    if report.rows.is_empty() {
        writeln!(writer, "No events logged.")?;
        return Ok(());
    }

    write_row(writer, "ID", "TIME", "CATEGORY", "LABEL", "DURATION")?;
    for row in &report.rows {
        write_row(
            writer,
            &row.id.to_string(),
            &row.start_time,
            &display_category(row.kind, &row.category),
            &row.label,
            &row.duration,
        )?;
    }

    writeln!(writer)?;
    writeln!(writer, "Total tracked: {}", format_minutes(report.total_minutes))?;

    if !report.categories.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "By category")?;
        for total in &report.categories {
            writeln!(
                writer,
                "  {:<14}  {:>8}  {:>5.1}%",
                total.category,
                format_minutes(total.minutes),
                total.percentage
            )?;
        }
    }
    Ok(())
}

// ========== JSON Output ==========

#[derive(Debug, Serialize)]
pub struct JsonDay<'a> {
    pub date: NaiveDate,
    pub timezone: &'a str,
    pub closed: bool,
    pub total_minutes: u32,
    pub total: String,
    pub events: &'a [ReportRow],
    pub categories: Vec<JsonCategory<'a>>,
}

#[derive(Debug, Serialize)]
pub struct JsonCategory<'a> {
    pub category: &'a str,
    pub minutes: u32,
    pub duration: String,
    pub percentage: f64,
}

/// Formats the day view as pretty-printed JSON.
pub fn format_report_json(report: &DayReport, timezone: &str) -> Result<String> {
    let day = JsonDay {
        date: report.date,
        timezone,
        closed: report.is_closed(),
        total_minutes: report.total_minutes,
        total: format_minutes(report.total_minutes),
        events: &report.rows,
        categories: report
            .categories
            .iter()
            .map(|total| JsonCategory {
                category: &total.category,
                minutes: total.minutes,
                duration: format_minutes(total.minutes),
                percentage: (total.percentage * 10.0).round() / 10.0,
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&day)?)
}
