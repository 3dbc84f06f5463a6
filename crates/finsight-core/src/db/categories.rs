//! Category operations

use rusqlite::{params, Connection, OptionalExtension};
use tracing::info;

use super::{parse_enum, Database};
use crate::error::{Error, Result};
use crate::models::{Category, NewCategory, TransactionType};

/// Global categories created by `seed_default_categories`
pub const DEFAULT_CATEGORIES: &[(&str, TransactionType)] = &[
    ("Salary", TransactionType::Income),
    ("Bonus", TransactionType::Income),
    ("Investment Returns", TransactionType::Income),
    ("Other Income", TransactionType::Income),
    ("Food & Drinks", TransactionType::Expense),
    ("Transportation", TransactionType::Expense),
    ("Shopping", TransactionType::Expense),
    ("Bills & Utilities", TransactionType::Expense),
    ("Entertainment", TransactionType::Expense),
    ("Health", TransactionType::Expense),
    ("Education", TransactionType::Expense),
    ("Other Expense", TransactionType::Expense),
];

pub(super) fn query_categories(conn: &Connection, user_id: i64) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, name, kind FROM categories
         WHERE user_id IS NULL OR user_id = ?
         ORDER BY kind, name",
    )?;

    let categories = stmt
        .query_map(params![user_id], |row| {
            let kind: String = row.get(3)?;
            Ok(Category {
                id: row.get(0)?,
                user_id: row.get(1)?,
                name: row.get(2)?,
                kind: parse_enum(3, &kind)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(categories)
}

impl Database {
    /// Create a category (global when `user_id` is `None`)
    pub fn create_category(&self, category: &NewCategory) -> Result<i64> {
        let name = category.name.trim();
        if name.is_empty() {
            return Err(Error::InvalidData("Category name is required".to_string()));
        }

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO categories (user_id, name, kind) VALUES (?, ?, ?)",
            params![category.user_id, name, category.kind.as_str()],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Insert any missing global default categories. Returns how many were
    /// added, so a second run reports 0.
    pub fn seed_default_categories(&self) -> Result<usize> {
        let conn = self.conn()?;
        let mut added = 0;

        for (name, kind) in DEFAULT_CATEGORIES {
            let existing: Option<i64> = conn
                .query_row(
                    "SELECT id FROM categories WHERE user_id IS NULL AND name = ? AND kind = ?",
                    params![name, kind.as_str()],
                    |row| row.get(0),
                )
                .optional()?;

            if existing.is_none() {
                conn.execute(
                    "INSERT INTO categories (user_id, name, kind) VALUES (NULL, ?, ?)",
                    params![name, kind.as_str()],
                )?;
                added += 1;
            }
        }

        if added > 0 {
            info!(added, "Seeded default categories");
        }
        Ok(added)
    }
}
