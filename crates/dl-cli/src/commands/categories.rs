//! Category management commands.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Subcommand;
use serde::Serialize;

use dl_core::{Category, CategoryId, NewCategory};

use crate::Config;
use crate::commands::util::open_database;

#[derive(Debug, Subcommand)]
pub enum CategoriesAction {
    /// List categories.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Add a category. The first category becomes the default.
    Add {
        /// Category name.
        name: String,
        /// Short code (at most 10 characters).
        #[arg(long)]
        code: Option<String>,
    },
    /// Rename a category or change its code.
    Edit {
        /// Category ID.
        id: i64,
        /// New name.
        #[arg(long)]
        name: Option<String>,
        /// New short code; an empty value clears it.
        #[arg(long)]
        code: Option<String>,
    },
    /// Remove a category. Logged events keep their category text.
    Remove {
        /// Category ID.
        id: i64,
    },
    /// Make a category the default.
    Default {
        /// Category ID.
        id: i64,
    },
}

#[derive(Debug, Serialize)]
struct JsonCategory<'a> {
    id: CategoryId,
    name: &'a str,
    code: Option<&'a str>,
    is_default: bool,
}

pub fn run<W: Write>(writer: &mut W, action: &CategoriesAction, config: &Config) -> Result<()> {
    let mut db = open_database(config)?;
    match action {
        CategoriesAction::List { json } => {
            let categories = db.list_categories()?;
            if *json {
                let rows: Vec<_> = categories
                    .iter()
                    .map(|category| JsonCategory {
                        id: category.id,
                        name: &category.name,
                        code: category.code.as_deref(),
                        is_default: category.is_default,
                    })
                    .collect();
                writeln!(writer, "{}", serde_json::to_string_pretty(&rows)?)?;
            } else if categories.is_empty() {
                writeln!(writer, "No categories. Add one with `dl categories add <name>`.")?;
            } else {
                for category in &categories {
                    writeln!(writer, "{}", describe(category))?;
                }
            }
        }
        CategoriesAction::Add { name, code } => {
            let category = NewCategory::new(name, code.as_deref())?;
            let added = db.add_category(&category)?;
            writeln!(writer, "Added {}", describe(&added))?;
        }
        CategoriesAction::Edit { id, name, code } => {
            let id = CategoryId::new(*id);
            let existing = db
                .get_category(id)?
                .with_context(|| format!("category {id} not found"))?;
            let name = name.as_deref().unwrap_or(&existing.name);
            let code = code.as_deref().or(existing.code.as_deref());
            let updated = db.update_category(id, &NewCategory::new(name, code)?)?;
            writeln!(writer, "Updated {}", describe(&updated))?;
        }
        CategoriesAction::Remove { id } => {
            let id = CategoryId::new(*id);
            db.delete_category(id)?;
            writeln!(writer, "Removed category {id}")?;
        }
        CategoriesAction::Default { id } => {
            let category = db.set_default_category(CategoryId::new(*id))?;
            writeln!(writer, "Default category is now {}", category.name)?;
        }
    }
    Ok(())
}

fn describe(category: &Category) -> String {
    let mut line = format!("{:>3}  {}", category.id, category.name);
    if let Some(code) = &category.code {
        line.push_str(&format!(" [{code}]"));
    }
    if category.is_default {
        line.push_str(" (default)");
    }
    line
}
