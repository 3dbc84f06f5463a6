//! Core types for the Insight Engine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::format::format_amount;

/// Severity level of an insight, declared in display priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Requires immediate attention
    Critical,
    /// Should be addressed soon
    Warning,
    /// Informational tip
    Info,
    /// Something going well
    Success,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Warning => "warning",
            Severity::Info => "info",
            Severity::Success => "success",
        }
    }

    /// Sort priority (lower = shown first)
    pub fn priority(&self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::Warning => 1,
            Severity::Info => 2,
            Severity::Success => 3,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "critical" => Ok(Severity::Critical),
            "warning" => Ok(Severity::Warning),
            "info" => Ok(Severity::Info),
            "success" => Ok(Severity::Success),
            _ => Err(format!("Unknown severity: {}", s)),
        }
    }
}

/// Topic an insight belongs to, used for grouping on the insights view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightCategory {
    Budget,
    Spending,
    Tips,
    Wallet,
}

impl InsightCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightCategory::Budget => "budget",
            InsightCategory::Spending => "spending",
            InsightCategory::Tips => "tips",
            InsightCategory::Wallet => "wallet",
        }
    }

    /// Human-readable group heading
    pub fn label(&self) -> &'static str {
        match self {
            InsightCategory::Budget => "Budget",
            InsightCategory::Spending => "Spending",
            InsightCategory::Tips => "Savings Tips",
            InsightCategory::Wallet => "Wallet",
        }
    }

    pub fn all() -> &'static [InsightCategory] {
        &[
            InsightCategory::Budget,
            InsightCategory::Spending,
            InsightCategory::Tips,
            InsightCategory::Wallet,
        ]
    }
}

impl fmt::Display for InsightCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InsightCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "budget" => Ok(InsightCategory::Budget),
            "spending" => Ok(InsightCategory::Spending),
            "tips" => Ok(InsightCategory::Tips),
            "wallet" => Ok(InsightCategory::Wallet),
            _ => Err(format!("Unknown insight category: {}", s)),
        }
    }
}

/// Where a call-to-action leads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionTarget {
    Budgets,
    Transactions,
    Wallets,
}

/// Optional call-to-action attached to an insight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightAction {
    pub label: String,
    pub target: ActionTarget,
}

impl InsightAction {
    fn new(label: &str, target: ActionTarget) -> Self {
        Self {
            label: label.to_string(),
            target,
        }
    }
}

/// What a rule found, with the values it computed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InsightKind {
    OverBudget {
        budget_id: i64,
        category_name: String,
        spent: f64,
        allocated: f64,
        overage: f64,
    },
    NearBudgetLimit {
        budget_id: i64,
        category_name: String,
        percentage: f64,
        remaining: f64,
        days_left: i64,
    },
    FastSpendingPace {
        budget_id: i64,
        category_name: String,
        percentage: f64,
        expected_percentage: f64,
        daily_cap: f64,
    },
    BudgetWellManaged {
        budget_id: i64,
        category_name: String,
        percentage: f64,
    },
    NoBudgets,
    SpendingIncreased {
        this_month: f64,
        last_month: f64,
        percent_change: f64,
    },
    SpendingDecreased {
        this_month: f64,
        last_month: f64,
        percent_change: f64,
    },
    CategorySpike {
        category_name: String,
        this_month: f64,
        last_month: f64,
        percent_change: f64,
    },
    HighExpenseRatio {
        income: f64,
        expense: f64,
        ratio_percent: f64,
        savings_target_percent: f64,
    },
    GoodSavingsRatio {
        income: f64,
        expense: f64,
        savings: f64,
    },
    DominantCategory {
        category_name: String,
        amount: f64,
        share_percent: f64,
    },
    FrequentMicroTransactions {
        count: usize,
        total: f64,
        limit: f64,
    },
    WeekendOverspending {
        weekend_average: f64,
        weekday_average: f64,
        weekend_count: usize,
    },
    NoIncomeRecorded {
        expense_count: usize,
    },
    LowWalletBalance {
        wallet_id: i64,
        wallet_name: String,
        balance: f64,
    },
    NegativeBalance {
        wallet_id: i64,
        wallet_name: String,
        deficit: f64,
    },
    EmergencyFund {
        total_balance: f64,
        monthly_expense: f64,
        months_covered: f64,
        target_months: f64,
        sufficient: bool,
    },
    NoWallets,
}

impl InsightKind {
    /// Stable label for this kind of finding
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightKind::OverBudget { .. } => "over_budget",
            InsightKind::NearBudgetLimit { .. } => "near_budget_limit",
            InsightKind::FastSpendingPace { .. } => "fast_spending_pace",
            InsightKind::BudgetWellManaged { .. } => "budget_well_managed",
            InsightKind::NoBudgets => "no_budgets",
            InsightKind::SpendingIncreased { .. } => "spending_increased",
            InsightKind::SpendingDecreased { .. } => "spending_decreased",
            InsightKind::CategorySpike { .. } => "category_spike",
            InsightKind::HighExpenseRatio { .. } => "high_expense_ratio",
            InsightKind::GoodSavingsRatio { .. } => "good_savings_ratio",
            InsightKind::DominantCategory { .. } => "dominant_category",
            InsightKind::FrequentMicroTransactions { .. } => "frequent_micro_transactions",
            InsightKind::WeekendOverspending { .. } => "weekend_overspending",
            InsightKind::NoIncomeRecorded { .. } => "no_income_recorded",
            InsightKind::LowWalletBalance { .. } => "low_wallet_balance",
            InsightKind::NegativeBalance { .. } => "negative_balance",
            InsightKind::EmergencyFund { .. } => "emergency_fund",
            InsightKind::NoWallets => "no_wallets",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            InsightKind::OverBudget { .. } | InsightKind::NegativeBalance { .. } => {
                Severity::Critical
            }
            InsightKind::NearBudgetLimit { .. }
            | InsightKind::FastSpendingPace { .. }
            | InsightKind::SpendingIncreased { .. }
            | InsightKind::CategorySpike { .. }
            | InsightKind::HighExpenseRatio { .. }
            | InsightKind::LowWalletBalance { .. } => Severity::Warning,
            InsightKind::NoBudgets
            | InsightKind::DominantCategory { .. }
            | InsightKind::FrequentMicroTransactions { .. }
            | InsightKind::WeekendOverspending { .. }
            | InsightKind::NoIncomeRecorded { .. }
            | InsightKind::NoWallets => Severity::Info,
            InsightKind::BudgetWellManaged { .. }
            | InsightKind::SpendingDecreased { .. }
            | InsightKind::GoodSavingsRatio { .. } => Severity::Success,
            InsightKind::EmergencyFund { sufficient, .. } => {
                if *sufficient {
                    Severity::Success
                } else {
                    Severity::Info
                }
            }
        }
    }

    pub fn category(&self) -> InsightCategory {
        match self {
            InsightKind::OverBudget { .. }
            | InsightKind::NearBudgetLimit { .. }
            | InsightKind::FastSpendingPace { .. }
            | InsightKind::BudgetWellManaged { .. }
            | InsightKind::NoBudgets => InsightCategory::Budget,
            InsightKind::SpendingIncreased { .. }
            | InsightKind::SpendingDecreased { .. }
            | InsightKind::CategorySpike { .. }
            | InsightKind::HighExpenseRatio { .. }
            | InsightKind::GoodSavingsRatio { .. }
            | InsightKind::DominantCategory { .. } => InsightCategory::Spending,
            InsightKind::FrequentMicroTransactions { .. }
            | InsightKind::WeekendOverspending { .. }
            | InsightKind::NoIncomeRecorded { .. } => InsightCategory::Tips,
            InsightKind::LowWalletBalance { .. }
            | InsightKind::NegativeBalance { .. }
            | InsightKind::EmergencyFund { .. }
            | InsightKind::NoWallets => InsightCategory::Wallet,
        }
    }

    pub fn action(&self) -> Option<InsightAction> {
        match self {
            InsightKind::OverBudget { .. } | InsightKind::NearBudgetLimit { .. } => {
                Some(InsightAction::new("View budget", ActionTarget::Budgets))
            }
            InsightKind::FastSpendingPace { .. }
            | InsightKind::SpendingIncreased { .. }
            | InsightKind::CategorySpike { .. } => Some(InsightAction::new(
                "View transactions",
                ActionTarget::Transactions,
            )),
            InsightKind::NoBudgets => {
                Some(InsightAction::new("Create budget", ActionTarget::Budgets))
            }
            InsightKind::NoIncomeRecorded { .. } => Some(InsightAction::new(
                "Add transaction",
                ActionTarget::Transactions,
            )),
            InsightKind::LowWalletBalance { .. } | InsightKind::NegativeBalance { .. } => {
                Some(InsightAction::new("View wallet", ActionTarget::Wallets))
            }
            InsightKind::NoWallets => {
                Some(InsightAction::new("Create wallet", ActionTarget::Wallets))
            }
            _ => None,
        }
    }

    /// Title and message text with computed values embedded
    pub fn render(&self, currency: &str) -> (String, String) {
        let money = |amount: f64| format_amount(currency, amount);

        match self {
            InsightKind::OverBudget {
                category_name,
                overage,
                ..
            } => (
                format!("{} budget exceeded", category_name),
                format!(
                    "You are over the {} budget by {}. Consider cutting back on spending in this category.",
                    category_name,
                    money(*overage)
                ),
            ),
            InsightKind::NearBudgetLimit {
                category_name,
                percentage,
                remaining,
                days_left,
                ..
            } => (
                format!("{} budget almost used up", category_name),
                format!(
                    "You have used {:.0}% of the {} budget. {} left for the next {} days.",
                    percentage,
                    category_name,
                    money(*remaining),
                    (*days_left).max(0)
                ),
            ),
            InsightKind::FastSpendingPace {
                category_name,
                percentage,
                expected_percentage,
                daily_cap,
                ..
            } => (
                format!("{} spending is running fast", category_name),
                format!(
                    "You have used {:.0}% of the budget while {:.0}% would be on pace. Keep daily spending under {} to stay within budget.",
                    percentage,
                    expected_percentage,
                    money(*daily_cap)
                ),
            ),
            InsightKind::BudgetWellManaged {
                category_name,
                percentage,
                ..
            } => (
                format!("{} budget under control", category_name),
                format!(
                    "Nice work managing this budget. {:.0}% of it is still available.",
                    100.0 - percentage
                ),
            ),
            InsightKind::NoBudgets => (
                "No budgets yet".to_string(),
                "Create budgets for your expense categories to keep spending under control."
                    .to_string(),
            ),
            InsightKind::SpendingIncreased { percent_change, .. } => (
                "Spending is up".to_string(),
                format!(
                    "Spending this month is up {:.0}% from last month. Check which categories grew the most.",
                    percent_change
                ),
            ),
            InsightKind::SpendingDecreased { percent_change, .. } => (
                "Spending is down".to_string(),
                format!(
                    "Spending this month is down {:.0}% from last month. Keep it up!",
                    percent_change
                ),
            ),
            InsightKind::CategorySpike {
                category_name,
                this_month,
                last_month,
                percent_change,
            } => (
                format!("Spending spike: {}", category_name),
                format!(
                    "{} spending is up {:.0}% from last month ({} vs {}).",
                    category_name,
                    percent_change,
                    money(*this_month),
                    money(*last_month)
                ),
            ),
            InsightKind::HighExpenseRatio {
                ratio_percent,
                savings_target_percent,
                ..
            } => (
                "High expense ratio".to_string(),
                format!(
                    "You have spent {:.0}% of this month's income. Try to save at least {:.0}%.",
                    ratio_percent, savings_target_percent
                ),
            ),
            InsightKind::GoodSavingsRatio { savings, .. } => (
                "Healthy savings rate".to_string(),
                format!(
                    "You set aside {} this month. Keep up the good habit!",
                    money(*savings)
                ),
            ),
            InsightKind::DominantCategory {
                category_name,
                amount,
                share_percent,
            } => (
                format!("Top spending: {}", category_name),
                format!(
                    "{:.0}% of this month's spending went to {} ({}). Consider trimming it if you can.",
                    share_percent,
                    category_name,
                    money(*amount)
                ),
            ),
            InsightKind::FrequentMicroTransactions {
                count,
                total,
                limit,
            } => (
                "Savings tip: small purchases".to_string(),
                format!(
                    "You made {} small purchases (under {}) totalling {} this month. Watch out for impulse buys.",
                    count,
                    money(*limit),
                    money(*total)
                ),
            ),
            InsightKind::WeekendOverspending {
                weekend_average,
                weekday_average,
                ..
            } => (
                "Savings tip: weekend spending".to_string(),
                format!(
                    "Weekend purchases average {} versus {} on weekdays. Plan cheaper weekend activities.",
                    money(*weekend_average),
                    money(*weekday_average)
                ),
            ),
            InsightKind::NoIncomeRecorded { .. } => (
                "Record your income".to_string(),
                "No income has been recorded this month. Add your income for a more accurate analysis."
                    .to_string(),
            ),
            InsightKind::LowWalletBalance {
                wallet_name,
                balance,
                ..
            } => (
                format!("Low balance in {}", wallet_name),
                format!(
                    "Wallet \"{}\" only has {} left. Consider topping it up.",
                    wallet_name,
                    money(*balance)
                ),
            ),
            InsightKind::NegativeBalance {
                wallet_name,
                deficit,
                ..
            } => (
                format!("Negative balance in {}", wallet_name),
                format!(
                    "Wallet \"{}\" has a deficit of {}. Rebalance your finances soon.",
                    wallet_name,
                    money(*deficit)
                ),
            ),
            InsightKind::EmergencyFund {
                months_covered,
                target_months,
                sufficient,
                ..
            } => {
                if *sufficient {
                    (
                        "Emergency fund in good shape".to_string(),
                        format!(
                            "Your total balance covers {:.1} months of spending.",
                            months_covered
                        ),
                    )
                } else {
                    (
                        "Emergency fund too small".to_string(),
                        format!(
                            "Your total balance covers only {:.1} months of spending. Aim for at least {:.0} months.",
                            months_covered, target_months
                        ),
                    )
                }
            }
            InsightKind::NoWallets => (
                "Create your first wallet".to_string(),
                "You don't have any wallets yet. Create one to start tracking your finances."
                    .to_string(),
            ),
        }
    }
}

/// A rendered insight, ready for presentation. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub severity: Severity,
    pub category: InsightCategory,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<InsightAction>,
}

impl Insight {
    /// Build an insight from a finding, rendering its text
    pub fn new(kind: InsightKind, currency: &str) -> Self {
        let (title, message) = kind.render(currency);
        Self {
            severity: kind.severity(),
            category: kind.category(),
            action: kind.action(),
            kind,
            title,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_priority() {
        assert!(Severity::Critical.priority() < Severity::Warning.priority());
        assert!(Severity::Warning.priority() < Severity::Info.priority());
        assert!(Severity::Info.priority() < Severity::Success.priority());
        assert_eq!(Severity::from_str("warning").unwrap(), Severity::Warning);
    }

    #[test]
    fn test_emergency_fund_severity_depends_on_coverage() {
        let mut kind = InsightKind::EmergencyFund {
            total_balance: 100.0,
            monthly_expense: 50.0,
            months_covered: 2.0,
            target_months: 3.0,
            sufficient: false,
        };
        assert_eq!(kind.severity(), Severity::Info);

        if let InsightKind::EmergencyFund { sufficient, .. } = &mut kind {
            *sufficient = true;
        }
        assert_eq!(kind.severity(), Severity::Success);
        assert_eq!(kind.category(), InsightCategory::Wallet);
    }

    #[test]
    fn test_insight_serializes_with_tagged_kind() {
        let insight = Insight::new(
            InsightKind::NegativeBalance {
                wallet_id: 3,
                wallet_name: "Cash".to_string(),
                deficit: 50_000.0,
            },
            "IDR",
        );

        let json = serde_json::to_value(&insight).unwrap();
        assert_eq!(json["kind"]["type"], "negative_balance");
        assert_eq!(json["severity"], "critical");
        assert_eq!(json["category"], "wallet");
        assert_eq!(json["action"]["target"], "wallets");
        assert!(json["message"].as_str().unwrap().contains("IDR 50,000"));
    }

    #[test]
    fn test_action_omitted_when_absent() {
        let insight = Insight::new(
            InsightKind::SpendingDecreased {
                this_month: 80.0,
                last_month: 100.0,
                percent_change: 20.0,
            },
            "IDR",
        );
        let json = serde_json::to_value(&insight).unwrap();
        assert!(json.get("action").is_none());
    }
}
