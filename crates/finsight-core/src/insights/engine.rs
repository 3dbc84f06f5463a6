//! Insight Engine - runs the rule catalog over a ledger snapshot

use chrono::{Datelike, NaiveDate};

use crate::config::InsightConfig;
use crate::models::{Snapshot, Transaction};

use super::ranking::rank;
use super::types::{Insight, InsightKind};
use super::{budget_rules, spending_rules, tips_rules, wallet_rules};

/// Name shown for transactions whose category is not in the snapshot
pub const UNCATEGORIZED: &str = "Uncategorized";

/// A calendar month, identified by year and month number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub year: i32,
    pub month: u32,
}

impl MonthWindow {
    /// The calendar month containing `date`
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The calendar month before this one
    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

/// Everything a rule may look at. Monthly aggregates are computed once here so
/// rules stay cheap and agree on the numbers.
pub struct AnalysisContext<'a> {
    pub snapshot: &'a Snapshot,
    /// Reference date ("now")
    pub today: NaiveDate,
    pub config: &'a InsightConfig,
    pub this_month: MonthWindow,
    pub last_month: MonthWindow,
    pub this_month_income: f64,
    pub this_month_expense: f64,
    pub last_month_expense: f64,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(snapshot: &'a Snapshot, today: NaiveDate, config: &'a InsightConfig) -> Self {
        let this_month = MonthWindow::containing(today);
        let last_month = this_month.previous();

        let mut this_month_income = 0.0;
        let mut this_month_expense = 0.0;
        let mut last_month_expense = 0.0;
        for t in &snapshot.transactions {
            if this_month.contains(t.date) {
                if t.is_income() {
                    this_month_income += t.amount;
                } else {
                    this_month_expense += t.amount;
                }
            } else if last_month.contains(t.date) && t.is_expense() {
                last_month_expense += t.amount;
            }
        }

        Self {
            snapshot,
            today,
            config,
            this_month,
            last_month,
            this_month_income,
            this_month_expense,
            last_month_expense,
        }
    }

    /// Expense transactions dated in the reference month
    pub fn this_month_expenses(&self) -> impl Iterator<Item = &'a Transaction> + '_ {
        self.snapshot
            .transactions
            .iter()
            .filter(move |t| t.is_expense() && self.this_month.contains(t.date))
    }

    /// Income transactions dated in the reference month
    pub fn this_month_incomes(&self) -> impl Iterator<Item = &'a Transaction> + '_ {
        self.snapshot
            .transactions
            .iter()
            .filter(move |t| t.is_income() && self.this_month.contains(t.date))
    }

    /// Display name for a category; unknown references read "Uncategorized"
    pub fn category_label(&self, category_id: i64) -> &'a str {
        let snapshot: &'a Snapshot = self.snapshot;
        match snapshot.category_name(category_id) {
            Some(name) => name,
            None => {
                tracing::debug!(category_id, "Transaction references unknown category");
                UNCATEGORIZED
            }
        }
    }

    /// Expense totals per category name within `window`, in first-seen order.
    /// Categories sharing a name (a global default and a user's own) merge.
    pub fn expense_by_category(&self, window: MonthWindow) -> Vec<(&'a str, f64)> {
        let mut totals: Vec<(&'a str, f64)> = Vec::new();
        for t in &self.snapshot.transactions {
            if !t.is_expense() || !window.contains(t.date) {
                continue;
            }
            let name = self.category_label(t.category_id);
            match totals.iter_mut().find(|(n, _)| *n == name) {
                Some((_, sum)) => *sum += t.amount,
                None => totals.push((name, t.amount)),
            }
        }
        totals
    }

    /// Render a finding with the configured currency
    pub fn insight(&self, kind: InsightKind) -> Insight {
        Insight::new(kind, &self.config.currency)
    }
}

/// One entry in the rule catalog: a pure function of the analysis context
pub struct Rule {
    pub name: &'static str,
    pub evaluate: fn(&AnalysisContext<'_>) -> Vec<Insight>,
}

/// The fixed, ordered rule catalog. Evaluation order is also the tie-break
/// order within a severity after ranking.
pub const RULES: &[Rule] = &[
    Rule {
        name: "budget_status",
        evaluate: budget_rules::budget_status,
    },
    Rule {
        name: "no_budgets",
        evaluate: budget_rules::no_budgets,
    },
    Rule {
        name: "spending_trend",
        evaluate: spending_rules::spending_trend,
    },
    Rule {
        name: "category_spike",
        evaluate: spending_rules::category_spike,
    },
    Rule {
        name: "income_ratio",
        evaluate: spending_rules::income_ratio,
    },
    Rule {
        name: "dominant_category",
        evaluate: spending_rules::dominant_category,
    },
    Rule {
        name: "micro_transactions",
        evaluate: tips_rules::micro_transactions,
    },
    Rule {
        name: "weekend_spending",
        evaluate: tips_rules::weekend_spending,
    },
    Rule {
        name: "missing_income",
        evaluate: tips_rules::missing_income,
    },
    Rule {
        name: "low_balance",
        evaluate: wallet_rules::low_balance,
    },
    Rule {
        name: "negative_balance",
        evaluate: wallet_rules::negative_balance,
    },
    Rule {
        name: "emergency_fund",
        evaluate: wallet_rules::emergency_fund,
    },
    Rule {
        name: "no_wallets",
        evaluate: wallet_rules::no_wallets,
    },
];

/// Stateless insight engine bound to a threshold configuration
#[derive(Debug, Clone, Default)]
pub struct InsightEngine {
    config: InsightConfig,
}

impl InsightEngine {
    pub fn new(config: InsightConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InsightConfig {
        &self.config
    }

    /// Run every rule and return the ranked insight list
    pub fn analyze(&self, snapshot: &Snapshot, today: NaiveDate) -> Vec<Insight> {
        let ctx = AnalysisContext::new(snapshot, today, &self.config);
        let mut all_insights = Vec::new();

        for rule in RULES {
            let insights = (rule.evaluate)(&ctx);
            tracing::debug!(rule = rule.name, count = insights.len(), "Rule evaluated");
            all_insights.extend(insights);
        }

        rank(&mut all_insights);

        tracing::info!(
            user_id = snapshot.user_id,
            %today,
            count = all_insights.len(),
            "Insight generation complete"
        );
        all_insights
    }

    /// Names of the rules in evaluation order
    pub fn rule_names(&self) -> Vec<&'static str> {
        RULES.iter().map(|r| r.name).collect()
    }
}

/// Generate the ranked insight list for one user's snapshot
pub fn generate_insights(
    snapshot: &Snapshot,
    today: NaiveDate,
    config: &InsightConfig,
) -> Vec<Insight> {
    InsightEngine::new(config.clone()).analyze(snapshot, today)
}
