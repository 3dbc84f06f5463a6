//! Wallet rules
//!
//! Per-wallet balance checks plus overall emergency-fund coverage.

use super::engine::AnalysisContext;
use super::types::{Insight, InsightKind};

/// One warning per wallet running low (zero included, overdrawn excluded)
pub fn low_balance(ctx: &AnalysisContext<'_>) -> Vec<Insight> {
    ctx.snapshot
        .wallets
        .iter()
        .filter(|w| w.balance >= 0.0 && w.balance < ctx.config.low_balance)
        .map(|w| {
            ctx.insight(InsightKind::LowWalletBalance {
                wallet_id: w.id,
                wallet_name: w.name.clone(),
                balance: w.balance,
            })
        })
        .collect()
}

/// One critical insight per overdrawn wallet
pub fn negative_balance(ctx: &AnalysisContext<'_>) -> Vec<Insight> {
    ctx.snapshot
        .wallets
        .iter()
        .filter(|w| w.balance < 0.0)
        .map(|w| {
            ctx.insight(InsightKind::NegativeBalance {
                wallet_id: w.id,
                wallet_name: w.name.clone(),
                deficit: w.balance.abs(),
            })
        })
        .collect()
}

/// How many months of this month's spending the combined balance would cover
pub fn emergency_fund(ctx: &AnalysisContext<'_>) -> Vec<Insight> {
    let total_balance = ctx.snapshot.total_balance();
    let monthly_expense = ctx.this_month_expense;
    if total_balance <= 0.0 || monthly_expense <= 0.0 {
        return vec![];
    }

    let months_covered = total_balance / monthly_expense;
    let target_months = ctx.config.emergency_fund_months;

    vec![ctx.insight(InsightKind::EmergencyFund {
        total_balance,
        monthly_expense,
        months_covered,
        target_months,
        sufficient: months_covered >= target_months,
    })]
}

pub fn no_wallets(ctx: &AnalysisContext<'_>) -> Vec<Insight> {
    if ctx.snapshot.wallets.is_empty() {
        vec![ctx.insight(InsightKind::NoWallets)]
    } else {
        vec![]
    }
}
