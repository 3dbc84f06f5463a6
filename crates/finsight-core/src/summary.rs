//! Monthly income/expense summary

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::insights::MonthWindow;
use crate::models::Snapshot;

/// One expense category's total for the month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub category_id: i64,
    pub category_name: String,
    pub amount: f64,
    /// Share of the month's total expense, in percent
    pub share_percent: f64,
    pub transaction_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub year: i32,
    pub month: u32,
    pub income: f64,
    pub expense: f64,
    pub net: f64,
    /// Percent of income not spent; `None` without income
    pub savings_rate: Option<f64>,
    pub transaction_count: usize,
    /// Largest category first
    pub categories: Vec<CategoryBreakdown>,
}

/// Summarize the calendar month containing `today`
pub fn monthly_summary(snapshot: &Snapshot, today: NaiveDate) -> MonthlySummary {
    let window = MonthWindow::containing(today);

    let mut income = 0.0;
    let mut expense = 0.0;
    let mut transaction_count = 0;
    let mut categories: Vec<CategoryBreakdown> = Vec::new();

    for t in snapshot.transactions.iter().filter(|t| window.contains(t.date)) {
        transaction_count += 1;
        if t.is_income() {
            income += t.amount;
            continue;
        }

        expense += t.amount;
        match categories.iter_mut().find(|c| c.category_id == t.category_id) {
            Some(entry) => {
                entry.amount += t.amount;
                entry.transaction_count += 1;
            }
            None => categories.push(CategoryBreakdown {
                category_id: t.category_id,
                category_name: snapshot
                    .category_name(t.category_id)
                    .unwrap_or("Uncategorized")
                    .to_string(),
                amount: t.amount,
                share_percent: 0.0,
                transaction_count: 1,
            }),
        }
    }

    if expense > 0.0 {
        for entry in &mut categories {
            entry.share_percent = entry.amount / expense * 100.0;
        }
    }
    categories.sort_by(|a, b| b.amount.total_cmp(&a.amount));

    let net = income - expense;
    let savings_rate = (income > 0.0).then(|| net / income * 100.0);

    MonthlySummary {
        year: window.year,
        month: window.month,
        income,
        expense,
        net,
        savings_rate,
        transaction_count,
        categories,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_monthly_summary_totals() {
        let mut s = snapshot_with_categories();
        s.transactions = vec![
            income(1, 1, 2_000_000.0, date(2024, 3, 1)),
            expense(2, 10, 300_000.0, date(2024, 3, 2)),
            expense(3, 11, 500_000.0, date(2024, 3, 3)),
            expense(4, 10, 200_000.0, date(2024, 3, 4)),
            expense(5, 12, 999_000.0, date(2024, 2, 28)),
        ];

        let summary = monthly_summary(&s, date(2024, 3, 15));
        assert_eq!((summary.year, summary.month), (2024, 3));
        assert_eq!(summary.income, 2_000_000.0);
        assert_eq!(summary.expense, 1_000_000.0);
        assert_eq!(summary.net, 1_000_000.0);
        assert_eq!(summary.savings_rate, Some(50.0));
        assert_eq!(summary.transaction_count, 4);

        // Food and Transport tie at 500k; the first seen stays first
        let names: Vec<_> = summary
            .categories
            .iter()
            .map(|c| c.category_name.as_str())
            .collect();
        assert_eq!(names, vec!["Food", "Transport"]);
        assert_eq!(summary.categories[0].transaction_count, 2);
        assert_eq!(summary.categories[0].share_percent, 50.0);
    }

    #[test]
    fn test_savings_rate_undefined_without_income() {
        let mut s = snapshot_with_categories();
        s.transactions = vec![expense(1, 10, 300_000.0, date(2024, 3, 2))];

        let summary = monthly_summary(&s, date(2024, 3, 15));
        assert_eq!(summary.savings_rate, None);
        assert_eq!(summary.net, -300_000.0);
    }

    #[test]
    fn test_empty_month() {
        let summary = monthly_summary(&snapshot(), date(2024, 3, 15));
        assert_eq!(summary.transaction_count, 0);
        assert!(summary.categories.is_empty());
        assert_eq!(summary.savings_rate, None);
    }

    #[test]
    fn test_unknown_category_is_uncategorized() {
        let mut s = snapshot();
        s.transactions = vec![expense(1, 42, 10.0, date(2024, 3, 2))];

        let summary = monthly_summary(&s, date(2024, 3, 15));
        assert_eq!(summary.categories[0].category_name, "Uncategorized");
    }
}
