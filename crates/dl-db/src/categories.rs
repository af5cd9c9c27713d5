//! Category storage.

use chrono::{DateTime, Utc};
use rusqlite::{ErrorCode, OptionalExtension, Row, params};

use dl_core::{Category, CategoryId, NewCategory};

use crate::{Database, DbError, format_timestamp, stored_now};

const CATEGORY_COLUMNS: &str = "id, name, code, is_default, created_at";

impl Database {
    /// Lists categories in creation order.
    pub fn list_categories(&self) -> Result<Vec<Category>, DbError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY id ASC"))?;
        let rows = stmt.query_map([], CategoryRow::from_row)?;
        let mut categories = Vec::new();
        for row in rows {
            categories.push(row?.into_category()?);
        }
        Ok(categories)
    }

    pub fn get_category(&self, id: CategoryId) -> Result<Option<Category>, DbError> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = ?"),
                [id.get()],
                CategoryRow::from_row,
            )
            .optional()?;
        row.map(CategoryRow::into_category).transpose()
    }

    /// Looks up a category by its (trimmed) name.
    pub fn find_category(&self, name: &str) -> Result<Option<Category>, DbError> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE name = ?"),
                [name.trim()],
                CategoryRow::from_row,
            )
            .optional()?;
        row.map(CategoryRow::into_category).transpose()
    }

    /// The category flagged as default, if any.
    pub fn default_category(&self) -> Result<Option<Category>, DbError> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE is_default = 1"),
                [],
                CategoryRow::from_row,
            )
            .optional()?;
        row.map(CategoryRow::into_category).transpose()
    }

    /// Adds a category. The first category ever added becomes the default.
    pub fn add_category(&mut self, category: &NewCategory) -> Result<Category, DbError> {
        if self.find_category(&category.name)?.is_some() {
            return Err(DbError::DuplicateCategory {
                name: category.name.clone(),
            });
        }
        let is_default = self.default_category()?.is_none();
        let created_at = stored_now();
        self.conn
            .execute(
                "INSERT INTO categories (name, code, is_default, created_at) VALUES (?, ?, ?, ?)",
                params![
                    category.name,
                    category.code,
                    is_default,
                    format_timestamp(created_at)
                ],
            )
            .map_err(|err| name_conflict(err, &category.name))?;
        let id = CategoryId::new(self.conn.last_insert_rowid());
        tracing::debug!(%id, name = %category.name, "added category");

        Ok(Category {
            id,
            name: category.name.clone(),
            code: category.code.clone(),
            is_default,
            created_at,
        })
    }

    /// Renames a category and replaces its code.
    pub fn update_category(
        &mut self,
        id: CategoryId,
        category: &NewCategory,
    ) -> Result<Category, DbError> {
        let mut existing = self.get_category(id)?.ok_or(DbError::CategoryNotFound(id))?;
        if self
            .find_category(&category.name)?
            .is_some_and(|other| other.id != id)
        {
            return Err(DbError::DuplicateCategory {
                name: category.name.clone(),
            });
        }
        self.conn
            .execute(
                "UPDATE categories SET name = ?, code = ? WHERE id = ?",
                params![category.name, category.code, id.get()],
            )
            .map_err(|err| name_conflict(err, &category.name))?;
        existing.name.clone_from(&category.name);
        existing.code.clone_from(&category.code);
        Ok(existing)
    }

    /// Deletes a category. Events keep their category name as text.
    pub fn delete_category(&mut self, id: CategoryId) -> Result<(), DbError> {
        let deleted = self
            .conn
            .execute("DELETE FROM categories WHERE id = ?", [id.get()])?;
        if deleted == 0 {
            return Err(DbError::CategoryNotFound(id));
        }
        Ok(())
    }

    /// Makes `id` the only default category, in one transaction.
    pub fn set_default_category(&mut self, id: CategoryId) -> Result<Category, DbError> {
        let tx = self.conn.transaction()?;
        tx.execute("UPDATE categories SET is_default = 0 WHERE is_default = 1", [])?;
        let updated = tx.execute("UPDATE categories SET is_default = 1 WHERE id = ?", [id.get()])?;
        if updated == 0 {
            return Err(DbError::CategoryNotFound(id));
        }
        tx.commit()?;
        tracing::debug!(%id, "set default category");

        self.get_category(id)?.ok_or(DbError::CategoryNotFound(id))
    }
}

fn name_conflict(err: rusqlite::Error, name: &str) -> DbError {
    if err.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) {
        return DbError::DuplicateCategory {
            name: name.to_string(),
        };
    }
    DbError::Sqlite(err)
}

#[derive(Debug)]
struct CategoryRow {
    id: i64,
    name: String,
    code: Option<String>,
    is_default: bool,
    created_at: String,
}

impl CategoryRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            code: row.get(2)?,
            is_default: row.get(3)?,
            created_at: row.get(4)?,
        })
    }

    fn into_category(self) -> Result<Category, DbError> {
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map(|at| at.with_timezone(&Utc))
            .map_err(|err| DbError::InvalidRow {
                id: self.id,
                message: format!("invalid category timestamp {:?}: {err}", self.created_at),
            })?;
        Ok(Category {
            id: CategoryId::new(self.id),
            name: self.name,
            code: self.code,
            is_default: self.is_default,
            created_at,
        })
    }
}
