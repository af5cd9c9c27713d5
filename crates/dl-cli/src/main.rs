use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use dl_cli::commands::{add, categories, edit, export, import, marker, rm, show};
use dl_cli::{Cli, Commands, Config};
use dl_core::EventKind;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let stdout = io::stdout();
    let mut writer = stdout.lock();
    match command {
        Commands::Add(args) => add::run(&mut writer, args, &config)?,
        Commands::Pause(args) => marker::run(&mut writer, EventKind::Pause, args, &config)?,
        Commands::End(args) => marker::run(&mut writer, EventKind::End, args, &config)?,
        Commands::Show(args) => show::run(&mut writer, args, &config)?,
        Commands::Edit(args) => edit::run(&mut writer, args, &config)?,
        Commands::Rm(args) => rm::run(&mut writer, args, &config)?,
        Commands::Categories(action) => categories::run(&mut writer, action, &config)?,
        Commands::Export(args) => export::run(&mut writer, args, &config)?,
        Commands::Import(args) => import::run(&mut writer, args, &config)?,
    }
    writer.flush()?;

    Ok(())
}
