//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::add::AddArgs;
use crate::commands::categories::CategoriesAction;
use crate::commands::edit::EditArgs;
use crate::commands::export::ExportArgs;
use crate::commands::import::ImportArgs;
use crate::commands::marker::MarkerArgs;
use crate::commands::rm::RmArgs;
use crate::commands::show::ShowArgs;

/// Day log: record what you start, when you start it.
///
/// Each entry is a start time; durations run until the next entry, a pause,
/// or the end of the day.
#[derive(Debug, Parser)]
#[command(name = "dl", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Log the start of a task.
    Add(AddArgs),

    /// Log a pause starting now.
    Pause(MarkerArgs),

    /// Close today with an end-of-day marker.
    End(MarkerArgs),

    /// Show a day's timeline with durations and totals.
    Show(ShowArgs),

    /// Change an event of a day.
    Edit(EditArgs),

    /// Delete an event of a day.
    Rm(RmArgs),

    /// Manage categories.
    #[command(subcommand)]
    Categories(CategoriesAction),

    /// Write a backup snapshot of all data.
    Export(ExportArgs),

    /// Replace all data with a backup snapshot.
    Import(ImportArgs),
}
