//! Budget consumption calculator
//!
//! Computes how much of a budget has been used from the live transaction set.
//! Nothing here is cached: every call sums the transactions it is given, so a
//! transaction added or deleted between calls is always reflected.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Budget, Snapshot, Transaction};

/// Usage above this percentage is over budget
pub const OVER_BUDGET_PERCENT: f64 = 100.0;
const NEAR_LIMIT_BADGE_PERCENT: f64 = 90.0;
const CAUTION_BADGE_PERCENT: f64 = 75.0;

/// Badge shown next to a budget in list views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStanding {
    OnTrack,
    Caution,
    NearLimit,
    OverBudget,
    /// Allocation is zero, so usage cannot be expressed as a percentage
    Unbounded,
}

impl BudgetStanding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnTrack => "on_track",
            Self::Caution => "caution",
            Self::NearLimit => "near_limit",
            Self::OverBudget => "over_budget",
            Self::Unbounded => "unbounded",
        }
    }

    fn from_percentage(percentage: Option<f64>) -> Self {
        match percentage {
            None => Self::Unbounded,
            Some(p) if p > OVER_BUDGET_PERCENT => Self::OverBudget,
            Some(p) if p > NEAR_LIMIT_BADGE_PERCENT => Self::NearLimit,
            Some(p) if p > CAUTION_BADGE_PERCENT => Self::Caution,
            Some(_) => Self::OnTrack,
        }
    }
}

impl std::fmt::Display for BudgetStanding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Derived consumption figures for one budget at a reference date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub budget_id: i64,
    pub category_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    pub allocated_amount: f64,
    pub spent: f64,
    /// `spent / allocated * 100`, or `None` when nothing was allocated
    pub percentage: Option<f64>,
    /// Negative when over budget
    pub remaining: f64,
    /// Whole days until the window ends; negative once past due
    pub days_left: i64,
    /// Window length in days, never less than 1
    pub total_days: i64,
    pub days_elapsed: i64,
    /// Usage expected by now if spending were linear across the window
    pub expected_percentage: f64,
    pub standing: BudgetStanding,
}

impl BudgetStatus {
    /// Fraction of the window that has elapsed
    pub fn days_elapsed_ratio(&self) -> f64 {
        self.days_elapsed as f64 / self.total_days as f64
    }
}

/// Sum of expense transactions in the budget's category within its window
pub fn budget_spent(budget: &Budget, transactions: &[Transaction]) -> f64 {
    transactions
        .iter()
        .filter(|t| t.category_id == budget.category_id && t.is_expense() && budget.covers(t.date))
        .map(|t| t.amount)
        .sum()
}

/// Compute spent, percentage, remaining and pacing for one budget
pub fn compute_budget_status(
    budget: &Budget,
    transactions: &[Transaction],
    today: NaiveDate,
) -> BudgetStatus {
    let spent = budget_spent(budget, transactions);
    let allocated = budget.allocated_amount;

    let percentage = if allocated > 0.0 {
        Some(spent / allocated * 100.0)
    } else {
        None
    };

    let days_left = (budget.end_date - today).num_days();
    let total_days = (budget.end_date - budget.start_date).num_days().max(1);
    let days_elapsed = total_days - days_left;
    let expected_percentage = days_elapsed as f64 / total_days as f64 * 100.0;

    BudgetStatus {
        budget_id: budget.id,
        category_id: budget.category_id,
        category_name: None,
        allocated_amount: allocated,
        spent,
        percentage,
        remaining: allocated - spent,
        days_left,
        total_days,
        days_elapsed,
        expected_percentage,
        standing: BudgetStanding::from_percentage(percentage),
    }
}

/// Status of every budget in a snapshot, with category names resolved
pub fn budget_statuses(snapshot: &Snapshot, today: NaiveDate) -> Vec<BudgetStatus> {
    snapshot
        .budgets
        .iter()
        .map(|budget| {
            let mut status = compute_budget_status(budget, &snapshot.transactions, today);
            status.category_name = snapshot.category_name(budget.category_id).map(String::from);
            status
        })
        .collect()
}
