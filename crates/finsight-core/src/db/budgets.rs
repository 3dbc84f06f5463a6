//! Budget operations

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{parse_date, Database};
use crate::error::{Error, Result};
use crate::models::{Budget, NewBudget};

const BUDGET_COLUMNS: &str =
    "id, user_id, category_id, wallet_id, allocated_amount, start_date, end_date";

fn budget_from_row(row: &Row<'_>) -> rusqlite::Result<Budget> {
    let start_date: String = row.get(5)?;
    let end_date: String = row.get(6)?;

    Ok(Budget {
        id: row.get(0)?,
        user_id: row.get(1)?,
        category_id: row.get(2)?,
        wallet_id: row.get(3)?,
        allocated_amount: row.get(4)?,
        start_date: parse_date(5, &start_date)?,
        end_date: parse_date(6, &end_date)?,
    })
}

pub(super) fn query_budgets(conn: &Connection, user_id: i64) -> Result<Vec<Budget>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM budgets WHERE user_id = ? ORDER BY start_date, id",
        BUDGET_COLUMNS
    ))?;

    let budgets = stmt
        .query_map(params![user_id], budget_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(budgets)
}

impl Database {
    pub fn create_budget(&self, user_id: i64, budget: &NewBudget) -> Result<i64> {
        if budget.end_date < budget.start_date {
            return Err(Error::InvalidData(format!(
                "Budget ends ({}) before it starts ({})",
                budget.end_date, budget.start_date
            )));
        }
        if budget.allocated_amount < 0.0 {
            return Err(Error::InvalidData(
                "Budget allocation cannot be negative".to_string(),
            ));
        }

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO budgets (user_id, category_id, wallet_id, allocated_amount, start_date, end_date)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                user_id,
                budget.category_id,
                budget.wallet_id,
                budget.allocated_amount,
                budget.start_date.to_string(),
                budget.end_date.to_string(),
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Get a budget by ID, if it belongs to the user
    pub fn get_budget(&self, user_id: i64, id: i64) -> Result<Option<Budget>> {
        let conn = self.conn()?;
        let budget = conn
            .query_row(
                &format!(
                    "SELECT {} FROM budgets WHERE id = ? AND user_id = ?",
                    BUDGET_COLUMNS
                ),
                params![id, user_id],
                budget_from_row,
            )
            .optional()?;

        Ok(budget)
    }
}
