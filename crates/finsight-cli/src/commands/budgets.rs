//! Budget status command

use std::fmt::Write as _;

use anyhow::{Context as _, Result};
use finsight_core::format::format_amount;
use finsight_core::{budget_statuses, BudgetStanding, BudgetStatus};

use super::Context;

fn standing_icon(standing: BudgetStanding) -> &'static str {
    match standing {
        BudgetStanding::OnTrack => "🟢",
        BudgetStanding::Caution => "🟡",
        BudgetStanding::NearLimit => "🟠",
        BudgetStanding::OverBudget => "🔴",
        BudgetStanding::Unbounded => "⚪",
    }
}

/// One line per budget: name, spent/allocated, usage and days left
pub fn render_budgets(statuses: &[BudgetStatus], currency: &str) -> String {
    let mut out = String::new();

    for status in statuses {
        let name = status.category_name.as_deref().unwrap_or("Uncategorized");
        let usage = match status.percentage {
            Some(p) => format!("{:.0}%", p),
            None => "n/a".to_string(),
        };
        let timing = if status.days_left < 0 {
            "ended".to_string()
        } else {
            format!("{} days left", status.days_left)
        };

        let _ = writeln!(
            out,
            "   {} {:<20} {} / {}  {:>5}  {}",
            standing_icon(status.standing),
            name,
            format_amount(currency, status.spent),
            format_amount(currency, status.allocated_amount),
            usage,
            timing
        );
    }

    out
}

pub fn cmd_budgets(ctx: &Context, json: bool) -> Result<()> {
    let snapshot = ctx.snapshot()?;
    let statuses = budget_statuses(&snapshot, ctx.today);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&statuses).context("Failed to serialize budgets")?
        );
        return Ok(());
    }

    if statuses.is_empty() {
        println!("No budgets found. Create one to start tracking category spending.");
        return Ok(());
    }

    println!();
    println!("📊 Budgets as of {}", ctx.today);
    println!("   ─────────────────────────────");
    print!("{}", render_budgets(&statuses, &ctx.config.currency));
    Ok(())
}
