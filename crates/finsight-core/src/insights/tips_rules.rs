//! Savings tip rules: small purchases, weekend habits, missing income

use chrono::{Datelike, Weekday};

use super::engine::AnalysisContext;
use super::types::{Insight, InsightKind};

fn is_weekend(date: chrono::NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Many small purchases this month add up
pub fn micro_transactions(ctx: &AnalysisContext<'_>) -> Vec<Insight> {
    let limit = ctx.config.micro_transaction_limit;

    let (count, total) = ctx
        .this_month_expenses()
        .filter(|t| t.amount < limit)
        .fold((0usize, 0.0), |(count, total), t| (count + 1, total + t.amount));

    if count <= ctx.config.micro_transaction_count {
        return vec![];
    }

    vec![ctx.insight(InsightKind::FrequentMicroTransactions {
        count,
        total,
        limit,
    })]
}

/// Weekend purchases are noticeably larger than weekday ones
pub fn weekend_spending(ctx: &AnalysisContext<'_>) -> Vec<Insight> {
    let mut weekend = (0usize, 0.0);
    let mut weekday = (0usize, 0.0);

    for t in ctx.this_month_expenses() {
        let bucket = if is_weekend(t.date) {
            &mut weekend
        } else {
            &mut weekday
        };
        bucket.0 += 1;
        bucket.1 += t.amount;
    }

    if weekend.0 < ctx.config.weekend_min_transactions {
        return vec![];
    }

    let average = |(count, total): (usize, f64)| {
        if count == 0 {
            0.0
        } else {
            total / count as f64
        }
    };
    let weekend_average = average(weekend);
    let weekday_average = average(weekday);

    if weekend_average <= weekday_average * ctx.config.weekend_factor {
        return vec![];
    }

    vec![ctx.insight(InsightKind::WeekendOverspending {
        weekend_average,
        weekday_average,
        weekend_count: weekend.0,
    })]
}

/// Expenses are being recorded this month but no income is
pub fn missing_income(ctx: &AnalysisContext<'_>) -> Vec<Insight> {
    if ctx.this_month_incomes().next().is_some() {
        return vec![];
    }

    let expense_count = ctx.this_month_expenses().count();
    if expense_count == 0 {
        return vec![];
    }

    vec![ctx.insight(InsightKind::NoIncomeRecorded { expense_count })]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InsightConfig;
    use crate::insights::types::{InsightCategory, Severity};
    use crate::models::{Snapshot, Transaction};
    use crate::test_utils::*;

    fn snapshot_with(transactions: Vec<Transaction>) -> Snapshot {
        let mut s = snapshot_with_categories();
        s.transactions = transactions;
        s
    }

    fn eval(rule: fn(&AnalysisContext<'_>) -> Vec<Insight>, s: &Snapshot) -> Vec<Insight> {
        let config = InsightConfig::default();
        let ctx = AnalysisContext::new(s, date(2024, 3, 31), &config);
        rule(&ctx)
    }

    fn small_purchases(n: usize, amount: f64) -> Vec<Transaction> {
        (0..n)
            .map(|i| expense(i as i64 + 1, 10, amount, date(2024, 3, (i % 28) as u32 + 1)))
            .collect()
    }

    #[test]
    fn test_micro_transactions_reports_count() {
        let s = snapshot_with(small_purchases(16, 20_000.0));
        let insights = eval(micro_transactions, &s);

        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].severity, Severity::Info);
        assert_eq!(insights[0].category, InsightCategory::Tips);
        match &insights[0].kind {
            InsightKind::FrequentMicroTransactions { count, total, .. } => {
                assert_eq!(*count, 16);
                assert_eq!(*total, 320_000.0);
            }
            other => panic!("unexpected kind {:?}", other),
        }
        assert!(insights[0].message.contains("16 small purchases"));
    }

    #[test]
    fn test_micro_transactions_threshold_is_strict() {
        let s = snapshot_with(small_purchases(15, 20_000.0));
        assert!(eval(micro_transactions, &s).is_empty());

        // At the limit is not "small"
        let s = snapshot_with(small_purchases(20, 50_000.0));
        assert!(eval(micro_transactions, &s).is_empty());
    }

    #[test]
    fn test_weekend_overspending() {
        // March 2024: 2, 3, 9, 10 are weekend days
        let s = snapshot_with(vec![
            expense(1, 12, 200_000.0, date(2024, 3, 2)),
            expense(2, 12, 200_000.0, date(2024, 3, 3)),
            expense(3, 12, 200_000.0, date(2024, 3, 9)),
            expense(4, 12, 200_000.0, date(2024, 3, 10)),
            expense(5, 10, 50_000.0, date(2024, 3, 4)),
            expense(6, 10, 50_000.0, date(2024, 3, 5)),
        ]);
        let insights = eval(weekend_spending, &s);

        assert_eq!(insights.len(), 1);
        match &insights[0].kind {
            InsightKind::WeekendOverspending {
                weekend_average,
                weekday_average,
                weekend_count,
            } => {
                assert_eq!(*weekend_average, 200_000.0);
                assert_eq!(*weekday_average, 50_000.0);
                assert_eq!(*weekend_count, 4);
            }
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_weekend_needs_enough_transactions() {
        let s = snapshot_with(vec![
            expense(1, 12, 200_000.0, date(2024, 3, 2)),
            expense(2, 12, 200_000.0, date(2024, 3, 3)),
            expense(3, 12, 200_000.0, date(2024, 3, 9)),
            expense(4, 10, 50_000.0, date(2024, 3, 4)),
        ]);
        assert!(eval(weekend_spending, &s).is_empty());
    }

    #[test]
    fn test_weekend_only_spending_fires() {
        let s = snapshot_with(vec![
            expense(1, 12, 10_000.0, date(2024, 3, 2)),
            expense(2, 12, 10_000.0, date(2024, 3, 3)),
            expense(3, 12, 10_000.0, date(2024, 3, 9)),
            expense(4, 12, 10_000.0, date(2024, 3, 10)),
        ]);
        assert_eq!(eval(weekend_spending, &s).len(), 1);
    }

    #[test]
    fn test_similar_weekend_spending_is_quiet() {
        let s = snapshot_with(vec![
            expense(1, 12, 60_000.0, date(2024, 3, 2)),
            expense(2, 12, 60_000.0, date(2024, 3, 3)),
            expense(3, 12, 60_000.0, date(2024, 3, 9)),
            expense(4, 12, 60_000.0, date(2024, 3, 10)),
            expense(5, 10, 50_000.0, date(2024, 3, 4)),
        ]);
        assert!(eval(weekend_spending, &s).is_empty());
    }

    #[test]
    fn test_missing_income() {
        let s = snapshot_with(vec![expense(1, 10, 10_000.0, date(2024, 3, 4))]);
        let insights = eval(missing_income, &s);
        assert_eq!(insights.len(), 1);
        assert!(insights[0].action.is_some());

        let s = snapshot_with(vec![
            expense(1, 10, 10_000.0, date(2024, 3, 4)),
            income(2, 1, 10.0, date(2024, 3, 1)),
        ]);
        assert!(eval(missing_income, &s).is_empty());

        // Income last month doesn't count, but neither does last month's spending
        let s = snapshot_with(vec![expense(1, 10, 10_000.0, date(2024, 2, 4))]);
        assert!(eval(missing_income, &s).is_empty());
    }
}
