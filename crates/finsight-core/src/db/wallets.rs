//! Wallet operations

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{parse_datetime, parse_enum, Database};
use crate::error::{Error, Result};
use crate::models::{NewWallet, Wallet};

const WALLET_COLUMNS: &str = "id, user_id, name, wallet_type, balance, is_active, updated_at";

fn wallet_from_row(row: &Row<'_>) -> rusqlite::Result<Wallet> {
    let wallet_type: String = row.get(3)?;
    let updated_at: String = row.get(6)?;

    Ok(Wallet {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        wallet_type: parse_enum(3, &wallet_type)?,
        balance: row.get(4)?,
        is_active: row.get(5)?,
        updated_at: parse_datetime(&updated_at),
    })
}

pub(super) fn query_wallets(conn: &Connection, user_id: i64) -> Result<Vec<Wallet>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM wallets WHERE user_id = ? ORDER BY id",
        WALLET_COLUMNS
    ))?;

    let wallets = stmt
        .query_map(params![user_id], wallet_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(wallets)
}

impl Database {
    /// Create a wallet with an opening balance
    pub fn create_wallet(&self, user_id: i64, wallet: &NewWallet) -> Result<i64> {
        let name = wallet.name.trim();
        if name.is_empty() {
            return Err(Error::InvalidData("Wallet name is required".to_string()));
        }

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO wallets (user_id, name, wallet_type, balance) VALUES (?, ?, ?, ?)",
            params![user_id, name, wallet.wallet_type.as_str(), wallet.balance],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Get a wallet by ID, if it belongs to the user
    pub fn get_wallet(&self, user_id: i64, id: i64) -> Result<Option<Wallet>> {
        let conn = self.conn()?;
        let wallet = conn
            .query_row(
                &format!(
                    "SELECT {} FROM wallets WHERE id = ? AND user_id = ?",
                    WALLET_COLUMNS
                ),
                params![id, user_id],
                wallet_from_row,
            )
            .optional()?;

        Ok(wallet)
    }

    /// Mark a wallet active or inactive. Balances are untouched.
    pub fn set_wallet_active(&self, user_id: i64, id: i64, active: bool) -> Result<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE wallets SET is_active = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ? AND user_id = ?",
            params![active, id, user_id],
        )?;

        if updated == 0 {
            return Err(Error::NotFound(format!("Wallet {}", id)));
        }
        Ok(())
    }
}
