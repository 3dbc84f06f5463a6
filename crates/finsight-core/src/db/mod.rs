//! Database access layer with connection pooling and migrations
//!
//! This module is organized by domain:
//! - `wallets` - Wallet creation and lookup
//! - `categories` - Global and per-user categories, default seeding
//! - `transactions` - Posting and reversing transactions (keeps wallet balances in step)
//! - `budgets` - Budget creation and lookup
//!
//! Reads the insight engine needs go through the [`LedgerStore`] trait.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::models::{Budget, Category, Snapshot, Transaction, Wallet};

mod budgets;
mod categories;
mod transactions;
mod wallets;

pub use categories::DEFAULT_CATEGORIES;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Parse a SQLite datetime string into a DateTime<Utc>
pub(crate) fn parse_datetime(s: &str) -> DateTime<Utc> {
    // SQLite stores as "YYYY-MM-DD HH:MM:SS" format
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.and_utc())
        .unwrap_or_else(|_| Utc::now())
}

/// Parse a stored "YYYY-MM-DD" column, surfacing bad rows as conversion errors
pub(crate) fn parse_date(idx: usize, s: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Parse a stored enum column (wallet type, transaction kind); unknown values
/// are conversion errors rather than a silent fallback
pub(crate) fn parse_enum<T>(idx: usize, s: &str) -> rusqlite::Result<T>
where
    T: FromStr<Err = String>,
{
    s.parse().map_err(|e: String| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, e.into())
    })
}

/// Read access to one user's ledger
///
/// Each `list_*` returns only rows visible to `user_id`. The provided
/// `load_snapshot` composes them; stores that can read atomically should
/// override it.
pub trait LedgerStore {
    fn list_wallets(&self, user_id: i64) -> Result<Vec<Wallet>>;

    /// Global defaults plus the user's own categories
    fn list_categories(&self, user_id: i64) -> Result<Vec<Category>>;

    fn list_transactions(&self, user_id: i64) -> Result<Vec<Transaction>>;

    fn list_budgets(&self, user_id: i64) -> Result<Vec<Budget>>;

    /// Load everything the insight engine needs. Any read failure is
    /// reported as [`Error::DataUnavailable`].
    fn load_snapshot(&self, user_id: i64) -> Result<Snapshot> {
        let load = || -> Result<Snapshot> {
            Ok(Snapshot {
                user_id,
                wallets: self.list_wallets(user_id)?,
                categories: self.list_categories(user_id)?,
                transactions: self.list_transactions(user_id)?,
                budgets: self.list_budgets(user_id)?,
            })
        };

        load().map_err(|e| unavailable(user_id, e))
    }
}

fn unavailable(user_id: i64, e: Error) -> Error {
    match e {
        Error::DataUnavailable(_) => e,
        other => {
            warn!(user_id, error = %other, "Failed to load ledger snapshot");
            Error::DataUnavailable(other.to_string())
        }
    }
}

/// Database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    /// Path to the database file
    db_path: String,
}

impl Database {
    /// Open (or create) the database at `path` and run migrations
    pub fn new(path: &str) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path).with_init(|conn| {
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
            Ok(())
        });
        let pool = Pool::builder().max_size(10).build(manager)?;

        let db = Self {
            pool,
            db_path: path.to_string(),
        };
        db.run_migrations()?;

        Ok(db)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Create a throwaway database (for testing)
    ///
    /// Note: Uses a temporary file rather than `:memory:` so every pooled
    /// connection sees the same data.
    pub fn in_memory() -> Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "finsight_test_{}_{}.db",
            std::process::id(),
            id
        ));
        let path = path.to_string_lossy().to_string();

        // Remove any existing file
        let _ = std::fs::remove_file(&path);

        Self::new(&path)
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            -- WAL mode: readers don't block the writer
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;

            -- Wallets (bank accounts, e-wallets, cash)
            CREATE TABLE IF NOT EXISTS wallets (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                wallet_type TEXT NOT NULL DEFAULT 'other',
                balance REAL NOT NULL DEFAULT 0,
                is_active BOOLEAN NOT NULL DEFAULT 1,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_wallets_user ON wallets(user_id);

            -- Categories (user_id NULL = global default)
            CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY,
                user_id INTEGER,
                name TEXT NOT NULL,
                kind TEXT NOT NULL CHECK (kind IN ('income', 'expense')),
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_categories_user ON categories(user_id);

            -- Transactions (amount always positive, direction in kind)
            CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                wallet_id INTEGER NOT NULL REFERENCES wallets(id),
                category_id INTEGER NOT NULL REFERENCES categories(id),
                amount REAL NOT NULL CHECK (amount > 0),
                kind TEXT NOT NULL CHECK (kind IN ('income', 'expense')),
                date DATE NOT NULL,
                description TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_transactions_user_date ON transactions(user_id, date);
            CREATE INDEX IF NOT EXISTS idx_transactions_wallet ON transactions(wallet_id);

            -- Budgets (inclusive date window per category)
            CREATE TABLE IF NOT EXISTS budgets (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                category_id INTEGER NOT NULL REFERENCES categories(id),
                wallet_id INTEGER REFERENCES wallets(id),
                allocated_amount REAL NOT NULL CHECK (allocated_amount >= 0),
                start_date DATE NOT NULL,
                end_date DATE NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                CHECK (end_date >= start_date)
            );

            CREATE INDEX IF NOT EXISTS idx_budgets_user ON budgets(user_id);
            "#,
        )?;

        info!(path = %self.db_path, "Database migrations complete");
        Ok(())
    }
}

impl LedgerStore for Database {
    fn list_wallets(&self, user_id: i64) -> Result<Vec<Wallet>> {
        let conn = self.conn()?;
        wallets::query_wallets(&conn, user_id)
    }

    fn list_categories(&self, user_id: i64) -> Result<Vec<Category>> {
        let conn = self.conn()?;
        categories::query_categories(&conn, user_id)
    }

    fn list_transactions(&self, user_id: i64) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        transactions::query_transactions(&conn, user_id)
    }

    fn list_budgets(&self, user_id: i64) -> Result<Vec<Budget>> {
        let conn = self.conn()?;
        budgets::query_budgets(&conn, user_id)
    }

    /// Reads all four tables inside one SQLite transaction so the snapshot
    /// never mixes states from before and after a concurrent write.
    fn load_snapshot(&self, user_id: i64) -> Result<Snapshot> {
        let load = || -> Result<Snapshot> {
            let mut conn = self.conn()?;
            let tx = conn.transaction()?;
            let snapshot = read_snapshot(&tx, user_id)?;
            tx.commit()?;
            Ok(snapshot)
        };

        let snapshot = load().map_err(|e| unavailable(user_id, e))?;
        tracing::debug!(
            user_id,
            wallets = snapshot.wallets.len(),
            transactions = snapshot.transactions.len(),
            budgets = snapshot.budgets.len(),
            "Loaded ledger snapshot"
        );
        Ok(snapshot)
    }
}

fn read_snapshot(conn: &Connection, user_id: i64) -> Result<Snapshot> {
    Ok(Snapshot {
        user_id,
        wallets: wallets::query_wallets(conn, user_id)?,
        categories: categories::query_categories(conn, user_id)?,
        transactions: transactions::query_transactions(conn, user_id)?,
        budgets: budgets::query_budgets(conn, user_id)?,
    })
}

#[cfg(test)]
mod tests;
