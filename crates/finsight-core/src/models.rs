//! Data models for FinSight

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Kind of wallet a balance is held in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WalletType {
    Bank,
    EWallet,
    Cash,
    Investment,
    #[default]
    Other,
}

impl WalletType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bank => "bank",
            Self::EWallet => "e_wallet",
            Self::Cash => "cash",
            Self::Investment => "investment",
            Self::Other => "other",
        }
    }
}

impl std::str::FromStr for WalletType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bank" => Ok(Self::Bank),
            "e_wallet" | "ewallet" | "e-wallet" => Ok(Self::EWallet),
            "cash" => Ok(Self::Cash),
            "investment" => Ok(Self::Investment),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown wallet type: {}", s)),
        }
    }
}

impl std::fmt::Display for WalletType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Direction of money flow, shared by categories and transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Sign applied to a wallet balance when a transaction of this type is posted
    pub fn balance_sign(&self) -> f64 {
        match self {
            Self::Income => 1.0,
            Self::Expense => -1.0,
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A place money is kept (bank account, e-wallet, cash, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wallet {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub wallet_type: WalletType,
    /// Signed balance; only transaction posting/reversal mutates it
    pub balance: f64,
    pub is_active: bool,
    pub updated_at: DateTime<Utc>,
}

/// Income or expense category. `user_id == None` marks a global default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub user_id: Option<i64>,
    pub name: String,
    pub kind: TransactionType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub wallet_id: i64,
    pub category_id: i64,
    /// Always positive; direction comes from `kind`
    pub amount: f64,
    pub kind: TransactionType,
    pub date: NaiveDate,
    pub description: Option<String>,
}

impl Transaction {
    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }
}

/// Spending limit for one category over an inclusive date window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub user_id: i64,
    pub category_id: i64,
    pub wallet_id: Option<i64>,
    pub allocated_amount: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Budget {
    /// Whether `date` falls inside the inclusive budget window
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// New wallet to insert
#[derive(Debug, Clone, Deserialize)]
pub struct NewWallet {
    pub name: String,
    #[serde(default)]
    pub wallet_type: WalletType,
    #[serde(default)]
    pub balance: f64,
}

/// New category to insert (`user_id == None` creates a global default)
#[derive(Debug, Clone, Deserialize)]
pub struct NewCategory {
    pub user_id: Option<i64>,
    pub name: String,
    pub kind: TransactionType,
}

/// New transaction to post against a wallet
#[derive(Debug, Clone, Deserialize)]
pub struct NewTransaction {
    pub wallet_id: i64,
    pub category_id: i64,
    pub amount: f64,
    pub kind: TransactionType,
    pub date: NaiveDate,
    pub description: Option<String>,
}

/// New budget to insert
#[derive(Debug, Clone, Deserialize)]
pub struct NewBudget {
    pub category_id: i64,
    pub wallet_id: Option<i64>,
    pub allocated_amount: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Everything the insight engine knows about one user at a point in time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub user_id: i64,
    pub wallets: Vec<Wallet>,
    pub categories: Vec<Category>,
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<Budget>,
}

impl Snapshot {
    /// Resolve a category name, if the reference is known
    pub fn category_name(&self, category_id: i64) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.id == category_id)
            .map(|c| c.name.as_str())
    }

    /// Sum of all wallet balances
    pub fn total_balance(&self) -> f64 {
        self.wallets.iter().map(|w| w.balance).sum()
    }
}
