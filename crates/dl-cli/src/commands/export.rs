//! Export command: writes a backup snapshot of every category and event.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;

use dl_core::backup::Snapshot;

use crate::Config;
use crate::commands::util::open_database;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Write the snapshot to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run<W: Write>(writer: &mut W, args: &ExportArgs, config: &Config) -> Result<()> {
    run_at(writer, args, config, Utc::now())
}

pub fn run_at<W: Write>(
    writer: &mut W,
    args: &ExportArgs,
    config: &Config,
    exported_at: DateTime<Utc>,
) -> Result<()> {
    let db = open_database(config)?;
    let categories = db.list_categories()?;
    let events = db.list_events()?;
    let snapshot = Snapshot::build(&categories, &events, exported_at);
    let json = serde_json::to_string_pretty(&snapshot).context("failed to serialize snapshot")?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, format!("{json}\n"))
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "exported snapshot");
            writeln!(
                writer,
                "Exported {} categories and {} task records to {}",
                snapshot.categories.len(),
                snapshot.task_records.len(),
                path.display()
            )?;
        }
        None => writeln!(writer, "{json}")?,
    }
    Ok(())
}
