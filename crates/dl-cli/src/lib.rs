//! Day log CLI library.
//!
//! This crate provides the CLI interface for the day log.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::{Config, RetentionConfig};
