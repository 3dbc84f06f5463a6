//! Spending pattern rules
//!
//! Month-over-month trend (overall and per category), expense-to-income
//! ratio and the dominant expense category, all over calendar months.

use super::engine::AnalysisContext;
use super::types::{Insight, InsightKind};

/// Compare this month's expense with last month's
pub fn spending_trend(ctx: &AnalysisContext<'_>) -> Vec<Insight> {
    let this_month = ctx.this_month_expense;
    let last_month = ctx.last_month_expense;
    if last_month <= 0.0 {
        return vec![];
    }

    let mut insights = Vec::new();

    if this_month > last_month * ctx.config.increase_factor {
        insights.push(ctx.insight(InsightKind::SpendingIncreased {
            this_month,
            last_month,
            percent_change: (this_month - last_month) / last_month * 100.0,
        }));
    }

    if this_month < last_month * ctx.config.decrease_factor {
        insights.push(ctx.insight(InsightKind::SpendingDecreased {
            this_month,
            last_month,
            percent_change: (last_month - this_month) / last_month * 100.0,
        }));
    }

    insights
}

/// Compare this month's expense with this month's income
pub fn income_ratio(ctx: &AnalysisContext<'_>) -> Vec<Insight> {
    let income = ctx.this_month_income;
    let expense = ctx.this_month_expense;
    if income <= 0.0 {
        return vec![];
    }

    let mut insights = Vec::new();

    if expense > income * ctx.config.high_expense_ratio {
        insights.push(ctx.insight(InsightKind::HighExpenseRatio {
            income,
            expense,
            ratio_percent: expense / income * 100.0,
            savings_target_percent: (1.0 - ctx.config.high_expense_ratio) * 100.0,
        }));
    }

    if expense < income * ctx.config.good_savings_ratio {
        insights.push(ctx.insight(InsightKind::GoodSavingsRatio {
            income,
            expense,
            savings: income - expense,
        }));
    }

    insights
}

/// Flag expense categories that grew sharply against last calendar month
pub fn category_spike(ctx: &AnalysisContext<'_>) -> Vec<Insight> {
    let last = ctx.expense_by_category(ctx.last_month);
    if last.is_empty() {
        return vec![];
    }

    ctx.expense_by_category(ctx.this_month)
        .into_iter()
        .filter_map(|(name, this_month)| {
            let (_, last_month) = last.iter().find(|(n, _)| *n == name)?;
            if *last_month <= 0.0 {
                return None;
            }
            let percent_change = (this_month - last_month) / last_month * 100.0;
            (percent_change > ctx.config.category_spike_percent).then(|| {
                ctx.insight(InsightKind::CategorySpike {
                    category_name: name.to_string(),
                    this_month,
                    last_month: *last_month,
                    percent_change,
                })
            })
        })
        .collect()
}

/// Flag the expense category taking the largest share of this month's spending
pub fn dominant_category(ctx: &AnalysisContext<'_>) -> Vec<Insight> {
    let total = ctx.this_month_expense;
    if total <= 0.0 {
        return vec![];
    }

    // Strict comparison: ties go to the category seen first
    let Some((category_name, amount)) = ctx
        .expense_by_category(ctx.this_month)
        .into_iter()
        .reduce(|best, next| if next.1 > best.1 { next } else { best })
    else {
        return vec![];
    };

    let share_percent = amount / total * 100.0;
    if share_percent <= ctx.config.dominant_category_percent {
        return vec![];
    }

    vec![ctx.insight(InsightKind::DominantCategory {
        category_name: category_name.to_string(),
        amount,
        share_percent,
    })]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InsightConfig;
    use crate::insights::types::Severity;
    use crate::models::{Snapshot, Transaction, TransactionType};
    use crate::test_utils::*;

    fn snapshot_with(transactions: Vec<Transaction>) -> Snapshot {
        let mut s = snapshot_with_categories();
        s.transactions = transactions;
        s
    }

    fn eval(rule: fn(&AnalysisContext<'_>) -> Vec<Insight>, s: &Snapshot) -> Vec<Insight> {
        let config = InsightConfig::default();
        let ctx = AnalysisContext::new(s, date(2024, 3, 20), &config);
        rule(&ctx)
    }

    #[test]
    fn test_spending_increase_detected() {
        let s = snapshot_with(vec![
            expense(1, 10, 100_000.0, date(2024, 2, 10)),
            expense(2, 10, 140_000.0, date(2024, 3, 10)),
        ]);
        let insights = eval(spending_trend, &s);

        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].severity, Severity::Warning);
        assert!(insights[0].message.contains("40%"));
    }

    #[test]
    fn test_spending_increase_threshold_is_strict() {
        let s = snapshot_with(vec![
            expense(1, 10, 100_000.0, date(2024, 2, 10)),
            expense(2, 10, 130_000.0, date(2024, 3, 10)),
        ]);
        assert!(eval(spending_trend, &s).is_empty());
    }

    #[test]
    fn test_spending_decrease_detected() {
        let s = snapshot_with(vec![
            expense(1, 10, 100_000.0, date(2024, 2, 10)),
            expense(2, 10, 70_000.0, date(2024, 3, 10)),
        ]);
        let insights = eval(spending_trend, &s);

        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].severity, Severity::Success);
        assert!(insights[0].message.contains("30%"));
    }

    #[test]
    fn test_trend_skipped_without_last_month() {
        let s = snapshot_with(vec![expense(1, 10, 70_000.0, date(2024, 3, 10))]);
        assert!(eval(spending_trend, &s).is_empty());
    }

    #[test]
    fn test_high_expense_ratio() {
        let s = snapshot_with(vec![
            income(1, 1, 1_000_000.0, date(2024, 3, 1)),
            expense(2, 10, 850_000.0, date(2024, 3, 5)),
        ]);
        let insights = eval(income_ratio, &s);

        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].kind.as_str(), "high_expense_ratio");
        assert_eq!(insights[0].severity, Severity::Warning);
        assert!(insights[0].message.contains("85%"));
        assert!(insights[0].message.contains("20%"));
    }

    #[test]
    fn test_good_savings_ratio() {
        let s = snapshot_with(vec![
            income(1, 1, 1_000_000.0, date(2024, 3, 1)),
            expense(2, 10, 300_000.0, date(2024, 3, 5)),
        ]);
        let insights = eval(income_ratio, &s);

        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].severity, Severity::Success);
        assert!(insights[0].message.contains("IDR 700,000"));
    }

    #[test]
    fn test_ratio_skipped_without_income() {
        let s = snapshot_with(vec![expense(1, 10, 300_000.0, date(2024, 3, 5))]);
        assert!(eval(income_ratio, &s).is_empty());
    }

    #[test]
    fn test_dominant_category() {
        let s = snapshot_with(vec![
            expense(1, 10, 500_000.0, date(2024, 3, 1)),
            expense(2, 11, 300_000.0, date(2024, 3, 2)),
            expense(3, 12, 200_000.0, date(2024, 3, 3)),
            // Last month's spending doesn't count
            expense(4, 11, 9_000_000.0, date(2024, 2, 3)),
        ]);
        let insights = eval(dominant_category, &s);

        assert_eq!(insights.len(), 1);
        assert!(insights[0].title.contains("Food"));
        assert!(insights[0].message.contains("50%"));
    }

    #[test]
    fn test_no_dominant_category_when_balanced() {
        let s = snapshot_with(vec![
            expense(1, 10, 400_000.0, date(2024, 3, 1)),
            expense(2, 11, 300_000.0, date(2024, 3, 2)),
            expense(3, 12, 300_000.0, date(2024, 3, 3)),
        ]);
        assert!(eval(dominant_category, &s).is_empty());
    }

    #[test]
    fn test_category_spike_detected() {
        let s = snapshot_with(vec![
            expense(1, 10, 100_000.0, date(2024, 2, 10)),
            expense(2, 11, 100_000.0, date(2024, 2, 11)),
            expense(3, 10, 125_000.0, date(2024, 3, 10)),
            // 15% more stays under the threshold
            expense(4, 11, 115_000.0, date(2024, 3, 11)),
            // New this month: nothing to compare against
            expense(5, 12, 500_000.0, date(2024, 3, 12)),
        ]);
        let insights = eval(category_spike, &s);

        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].severity, Severity::Warning);
        assert!(insights[0].title.contains("Food"));
        assert!(insights[0].message.contains("25%"));
        assert!(insights[0].message.contains("IDR 125,000"));
        assert!(insights[0].message.contains("IDR 100,000"));
    }

    #[test]
    fn test_category_spike_uses_calendar_months() {
        // January spending is two months back from March
        let s = snapshot_with(vec![
            expense(1, 10, 10_000.0, date(2024, 1, 31)),
            expense(2, 10, 90_000.0, date(2024, 3, 1)),
        ]);
        assert!(eval(category_spike, &s).is_empty());
    }

    #[test]
    fn test_category_spike_respects_threshold_config() {
        let s = snapshot_with(vec![
            expense(1, 11, 100_000.0, date(2024, 2, 10)),
            expense(2, 11, 110_000.0, date(2024, 3, 10)),
        ]);
        let config = InsightConfig {
            category_spike_percent: 5.0,
            ..Default::default()
        };
        let ctx = AnalysisContext::new(&s, date(2024, 3, 20), &config);
        let insights = category_spike(&ctx);

        assert_eq!(insights.len(), 1);
        assert!(insights[0].title.contains("Transport"));
    }

    #[test]
    fn test_dominant_category_merges_same_name() {
        let mut s = snapshot_with(vec![
            expense(1, 10, 300_000.0, date(2024, 3, 1)),
            expense(2, 20, 200_000.0, date(2024, 3, 2)),
            expense(3, 11, 350_000.0, date(2024, 3, 3)),
            expense(4, 12, 150_000.0, date(2024, 3, 4)),
        ]);
        // The user's own "Food" next to the global one
        let mut own_food = category(20, "Food", TransactionType::Expense);
        own_food.user_id = Some(TEST_USER);
        s.categories.push(own_food);

        let insights = eval(dominant_category, &s);
        assert_eq!(insights.len(), 1);
        assert!(insights[0].title.contains("Food"));
        assert!(insights[0].message.contains("50%"));
    }
}
