//! CLI subcommand implementations.

pub mod add;
pub mod categories;
pub mod edit;
pub mod export;
pub mod import;
pub mod marker;
pub mod rm;
pub mod show;
pub mod util;
