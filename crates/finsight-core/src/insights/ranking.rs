//! Ranking, grouping and the aggregate insight report

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::InsightConfig;
use crate::models::Snapshot;

use super::engine::generate_insights;
use super::health::HealthScore;
use super::types::{Insight, InsightCategory, Severity};

/// Order insights by severity. The sort is stable, so rule evaluation order
/// breaks ties.
pub fn rank(insights: &mut [Insight]) {
    insights.sort_by_key(|i| i.severity.priority());
}

/// The first `n` insights of an already ranked list
pub fn top(insights: &[Insight], n: usize) -> Vec<Insight> {
    insights.iter().take(n).cloned().collect()
}

/// Split a ranked list into the four categories, in fixed category order.
/// Every category is present, possibly empty.
pub fn group_by_category(insights: &[Insight]) -> Vec<(InsightCategory, Vec<Insight>)> {
    InsightCategory::all()
        .iter()
        .map(|category| {
            let members = insights
                .iter()
                .filter(|i| i.category == *category)
                .cloned()
                .collect();
            (*category, members)
        })
        .collect()
}

/// Number of insights at each severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub critical: usize,
    pub warning: usize,
    pub info: usize,
    pub success: usize,
}

impl SeverityCounts {
    pub fn from_insights(insights: &[Insight]) -> Self {
        let mut counts = Self::default();
        for insight in insights {
            match insight.severity {
                Severity::Critical => counts.critical += 1,
                Severity::Warning => counts.warning += 1,
                Severity::Info => counts.info += 1,
                Severity::Success => counts.success += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.critical + self.warning + self.info + self.success
    }
}

/// Everything the dashboard needs in one response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightReport {
    pub date: NaiveDate,
    pub insights: Vec<Insight>,
    pub counts: SeverityCounts,
    pub health: HealthScore,
}

impl InsightReport {
    pub fn build(snapshot: &Snapshot, today: NaiveDate, config: &InsightConfig) -> Self {
        let insights = generate_insights(snapshot, today, config);
        Self::from_insights(today, insights)
    }

    /// Wrap an already ranked list
    pub fn from_insights(date: NaiveDate, insights: Vec<Insight>) -> Self {
        let counts = SeverityCounts::from_insights(&insights);
        let health = HealthScore::from_counts(&counts);
        Self {
            date,
            insights,
            counts,
            health,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::types::InsightKind;
    use crate::test_utils::*;

    fn insight(kind: InsightKind) -> Insight {
        Insight::new(kind, "IDR")
    }

    fn negative(id: i64) -> Insight {
        insight(InsightKind::NegativeBalance {
            wallet_id: id,
            wallet_name: format!("W{}", id),
            deficit: 1.0,
        })
    }

    fn mixed() -> Vec<Insight> {
        vec![
            insight(InsightKind::NoWallets),
            insight(InsightKind::SpendingDecreased {
                this_month: 1.0,
                last_month: 2.0,
                percent_change: 50.0,
            }),
            negative(1),
            insight(InsightKind::NoBudgets),
            negative(2),
            insight(InsightKind::LowWalletBalance {
                wallet_id: 3,
                wallet_name: "W3".to_string(),
                balance: 10.0,
            }),
        ]
    }

    #[test]
    fn test_rank_orders_by_severity_stably() {
        let mut insights = mixed();
        rank(&mut insights);

        let kinds: Vec<_> = insights.iter().map(|i| i.kind.as_str()).collect();
        assert_eq!(
            kinds,
            vec![
                "negative_balance",
                "negative_balance",
                "low_wallet_balance",
                "no_wallets",
                "no_budgets",
                "spending_decreased",
            ]
        );
        // Ties keep their input order
        assert_eq!(insights[0], negative(1));
        assert_eq!(insights[1], negative(2));
    }

    #[test]
    fn test_top_is_a_prefix() {
        let mut insights = mixed();
        rank(&mut insights);

        assert_eq!(top(&insights, 3), insights[..3].to_vec());
        assert_eq!(top(&insights, 100).len(), insights.len());
        assert!(top(&insights, 0).is_empty());
    }

    #[test]
    fn test_group_by_category_keeps_every_group() {
        let mut insights = mixed();
        rank(&mut insights);
        let groups = group_by_category(&insights);

        let order: Vec<_> = groups.iter().map(|(c, _)| *c).collect();
        assert_eq!(order, InsightCategory::all().to_vec());

        let tips = &groups[2];
        assert_eq!(tips.0, InsightCategory::Tips);
        assert!(tips.1.is_empty());

        let wallet = &groups[3].1;
        assert_eq!(wallet.len(), 4);
        assert_eq!(wallet[0].severity, Severity::Critical);
    }

    #[test]
    fn test_severity_counts() {
        let counts = SeverityCounts::from_insights(&mixed());
        assert_eq!(
            counts,
            SeverityCounts {
                critical: 2,
                warning: 1,
                info: 2,
                success: 1,
            }
        );
        assert_eq!(counts.total(), 6);
    }

    #[test]
    fn test_report_for_empty_snapshot() {
        let report = InsightReport::build(&snapshot(), date(2024, 3, 15), &InsightConfig::default());

        assert_eq!(report.insights.len(), 1);
        assert_eq!(report.counts.info, 1);
        assert_eq!(report.health.score, 100);
    }
}
