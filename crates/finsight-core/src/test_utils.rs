//! Fixture builders for tests
//!
//! Enabled with `#[cfg(test)]` inside this crate and with the `test-utils`
//! feature for the server and CLI test suites.

use chrono::{NaiveDate, TimeZone, Utc};

use crate::models::{Budget, Category, Snapshot, Transaction, TransactionType, Wallet, WalletType};

/// User id used by every fixture
pub const TEST_USER: i64 = 1;

/// Wallet id used by transaction fixtures
pub const TEST_WALLET: i64 = 1;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date")
}

/// Empty snapshot for the test user
pub fn snapshot() -> Snapshot {
    Snapshot {
        user_id: TEST_USER,
        ..Default::default()
    }
}

pub fn category(id: i64, name: &str, kind: TransactionType) -> Category {
    Category {
        id,
        user_id: None,
        name: name.to_string(),
        kind,
    }
}

pub fn wallet(id: i64, name: &str, balance: f64) -> Wallet {
    Wallet {
        id,
        user_id: TEST_USER,
        name: name.to_string(),
        wallet_type: WalletType::Bank,
        balance,
        is_active: true,
        updated_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
}

fn transaction(
    id: i64,
    category_id: i64,
    amount: f64,
    date: NaiveDate,
    kind: TransactionType,
) -> Transaction {
    Transaction {
        id,
        user_id: TEST_USER,
        wallet_id: TEST_WALLET,
        category_id,
        amount,
        kind,
        date,
        description: None,
    }
}

pub fn expense(id: i64, category_id: i64, amount: f64, date: NaiveDate) -> Transaction {
    transaction(id, category_id, amount, date, TransactionType::Expense)
}

pub fn income(id: i64, category_id: i64, amount: f64, date: NaiveDate) -> Transaction {
    transaction(id, category_id, amount, date, TransactionType::Income)
}

pub fn budget(
    id: i64,
    category_id: i64,
    allocated_amount: f64,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Budget {
    Budget {
        id,
        user_id: TEST_USER,
        category_id,
        wallet_id: None,
        allocated_amount,
        start_date,
        end_date,
    }
}

/// Snapshot with the usual categories: 1 Salary (income), 10 Food,
/// 11 Transport, 12 Entertainment (expense)
pub fn snapshot_with_categories() -> Snapshot {
    let mut s = snapshot();
    s.categories = vec![
        category(1, "Salary", TransactionType::Income),
        category(10, "Food", TransactionType::Expense),
        category(11, "Transport", TransactionType::Expense),
        category(12, "Entertainment", TransactionType::Expense),
    ];
    s
}
