//! Budget rules
//!
//! - Over budget / near limit / spending pace / well managed (one per budget)
//! - No budgets set

use crate::budget::{compute_budget_status, OVER_BUDGET_PERCENT};

use super::engine::AnalysisContext;
use super::types::{Insight, InsightKind};

/// Evaluate every budget against its live consumption. The four outcomes are
/// checked in order and at most one fires per budget.
pub fn budget_status(ctx: &AnalysisContext<'_>) -> Vec<Insight> {
    let config = ctx.config;
    let mut insights = Vec::new();

    for budget in &ctx.snapshot.budgets {
        if config.active_budgets_only && !budget.covers(ctx.today) {
            continue;
        }

        let status = compute_budget_status(budget, &ctx.snapshot.transactions, ctx.today);
        let Some(percentage) = status.percentage else {
            tracing::debug!(budget_id = budget.id, "Skipping budget with no allocation");
            continue;
        };

        let category_name = ctx.category_label(budget.category_id).to_string();

        let kind = if percentage > OVER_BUDGET_PERCENT {
            InsightKind::OverBudget {
                budget_id: budget.id,
                category_name,
                spent: status.spent,
                allocated: status.allocated_amount,
                overage: status.remaining.abs(),
            }
        } else if percentage > config.near_limit_percent {
            InsightKind::NearBudgetLimit {
                budget_id: budget.id,
                category_name,
                percentage,
                remaining: status.remaining,
                days_left: status.days_left,
            }
        } else if percentage > status.expected_percentage + config.pace_margin_percent
            && status.days_left > config.pace_min_days_left
        {
            InsightKind::FastSpendingPace {
                budget_id: budget.id,
                category_name,
                percentage,
                expected_percentage: status.expected_percentage,
                daily_cap: status.remaining / status.days_left.max(1) as f64,
            }
        } else if percentage < config.well_managed_max_percent
            && status.days_elapsed_ratio() > config.well_managed_min_elapsed
        {
            InsightKind::BudgetWellManaged {
                budget_id: budget.id,
                category_name,
                percentage,
            }
        } else {
            continue;
        };

        insights.push(ctx.insight(kind));
    }

    insights
}

/// Prompt budget creation once the user has started recording transactions
pub fn no_budgets(ctx: &AnalysisContext<'_>) -> Vec<Insight> {
    if ctx.snapshot.budgets.is_empty() && !ctx.snapshot.transactions.is_empty() {
        vec![ctx.insight(InsightKind::NoBudgets)]
    } else {
        vec![]
    }
}
