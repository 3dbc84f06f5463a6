//! FinSight Core Library
//!
//! Shared functionality for the FinSight personal finance tracker:
//! - Ledger store (wallets, categories, transactions, budgets) on SQLite
//! - Budget consumption calculator
//! - Rule-based insight engine with severity ranking
//! - Financial health score
//! - Monthly income/expense summary
//! - Threshold configuration loaded from TOML

pub mod budget;
pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod insights;
pub mod models;
pub mod summary;

/// Fixture builders for tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use budget::{budget_statuses, compute_budget_status, BudgetStanding, BudgetStatus};
pub use config::InsightConfig;
pub use db::{Database, LedgerStore};
pub use error::{Error, Result};
pub use insights::{
    generate_insights, HealthScore, HealthStatus, Insight, InsightAction, InsightCategory,
    InsightKind, InsightReport, Severity, SeverityCounts,
};
pub use models::Snapshot;
pub use summary::{monthly_summary, MonthlySummary};
