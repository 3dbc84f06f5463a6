//! Insight Engine - Rule-based Financial Insights
//!
//! Derives short, actionable findings from one user's ledger snapshot. Each
//! rule is a pure function of the snapshot, a reference date and the
//! threshold config; the engine runs the whole catalog and ranks the output
//! by severity so the most urgent findings come first.
//!
//! ## Rule Groups
//!
//! - **Budget** - Over budget, near limit, spending pace, well managed
//! - **Spending** - Month-over-month trend, category spikes, expense ratio, top category
//! - **Tips** - Small purchases, weekend habits, missing income
//! - **Wallet** - Low and negative balances, emergency fund coverage
//!
//! ## Usage
//!
//! ```rust,ignore
//! use finsight_core::insights::{generate_insights, InsightReport};
//!
//! let snapshot = db.load_snapshot(user_id)?;
//! let insights = generate_insights(&snapshot, today, &config);
//! let report = InsightReport::build(&snapshot, today, &config);
//! ```

pub mod budget_rules;
pub mod engine;
pub mod health;
pub mod ranking;
pub mod spending_rules;
pub mod tips_rules;
pub mod types;
pub mod wallet_rules;

pub use engine::{generate_insights, AnalysisContext, InsightEngine, MonthWindow, Rule, RULES};
pub use health::{HealthScore, HealthStatus};
pub use ranking::{group_by_category, rank, top, InsightReport, SeverityCounts};
pub use types::{ActionTarget, Insight, InsightAction, InsightCategory, InsightKind, Severity};
