//! Transaction operations
//!
//! Posting or removing a transaction and the matching wallet balance change
//! happen in one SQLite transaction; neither is ever visible without the other.

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use super::{parse_date, parse_enum, Database};
use crate::error::{Error, Result};
use crate::models::{NewTransaction, Transaction, TransactionType};

pub(super) fn query_transactions(conn: &Connection, user_id: i64) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, wallet_id, category_id, amount, kind, date, description
         FROM transactions WHERE user_id = ? ORDER BY date, id",
    )?;

    let transactions = stmt
        .query_map(params![user_id], |row| {
            let kind: String = row.get(5)?;
            let date: String = row.get(6)?;
            Ok(Transaction {
                id: row.get(0)?,
                user_id: row.get(1)?,
                wallet_id: row.get(2)?,
                category_id: row.get(3)?,
                amount: row.get(4)?,
                kind: parse_enum(5, &kind)?,
                date: parse_date(6, &date)?,
                description: row.get(7)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(transactions)
}

fn adjust_balance(conn: &Connection, wallet_id: i64, delta: f64) -> Result<()> {
    conn.execute(
        "UPDATE wallets SET balance = balance + ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
        params![delta, wallet_id],
    )?;
    Ok(())
}

impl Database {
    /// Record a transaction and apply it to its wallet's balance
    pub fn create_transaction(&self, user_id: i64, tx: &NewTransaction) -> Result<i64> {
        if tx.amount.is_nan() || tx.amount <= 0.0 {
            return Err(Error::InvalidData(format!(
                "Transaction amount must be positive, got {}",
                tx.amount
            )));
        }

        let mut conn = self.conn()?;
        let db_tx = conn.transaction()?;

        let owner: Option<i64> = db_tx
            .query_row(
                "SELECT user_id FROM wallets WHERE id = ?",
                params![tx.wallet_id],
                |row| row.get(0),
            )
            .optional()?;
        if owner != Some(user_id) {
            return Err(Error::NotFound(format!("Wallet {}", tx.wallet_id)));
        }

        db_tx.execute(
            "INSERT INTO transactions (user_id, wallet_id, category_id, amount, kind, date, description)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                user_id,
                tx.wallet_id,
                tx.category_id,
                tx.amount,
                tx.kind.as_str(),
                tx.date.to_string(),
                tx.description,
            ],
        )?;
        let id = db_tx.last_insert_rowid();

        adjust_balance(&db_tx, tx.wallet_id, tx.kind.balance_sign() * tx.amount)?;
        db_tx.commit()?;

        debug!(id, wallet_id = tx.wallet_id, kind = %tx.kind, "Transaction recorded");
        Ok(id)
    }

    /// Delete a transaction and reverse its effect on the wallet balance
    pub fn delete_transaction(&self, user_id: i64, id: i64) -> Result<()> {
        let mut conn = self.conn()?;
        let db_tx = conn.transaction()?;

        let existing: Option<(i64, f64, String)> = db_tx
            .query_row(
                "SELECT wallet_id, amount, kind FROM transactions WHERE id = ? AND user_id = ?",
                params![id, user_id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        let Some((wallet_id, amount, kind)) = existing else {
            return Err(Error::NotFound(format!("Transaction {}", id)));
        };
        let kind: TransactionType = kind.parse().map_err(Error::InvalidData)?;

        db_tx.execute("DELETE FROM transactions WHERE id = ?", params![id])?;
        adjust_balance(&db_tx, wallet_id, -kind.balance_sign() * amount)?;
        db_tx.commit()?;

        debug!(id, wallet_id, "Transaction deleted");
        Ok(())
    }
}
