//! Monthly summary command

use std::fmt::Write as _;

use anyhow::{Context as _, Result};
use finsight_core::format::format_amount;
use finsight_core::{monthly_summary, MonthlySummary};

use super::Context;

pub fn render_summary(summary: &MonthlySummary, currency: &str) -> String {
    let mut out = String::new();
    let money = |amount: f64| format_amount(currency, amount);

    let _ = writeln!(out, "   Income:        {}", money(summary.income));
    let _ = writeln!(out, "   Expense:       {}", money(summary.expense));
    let _ = writeln!(out, "   Net:           {}", money(summary.net));
    match summary.savings_rate {
        Some(rate) => {
            let _ = writeln!(out, "   Savings rate:  {:.0}%", rate);
        }
        None => out.push_str("   Savings rate:  n/a (no income recorded)\n"),
    }
    let _ = writeln!(out, "   Transactions:  {}", summary.transaction_count);

    if !summary.categories.is_empty() {
        out.push('\n');
        out.push_str("   Spending by category:\n");
        for category in &summary.categories {
            let _ = writeln!(
                out,
                "     {:<20} {:>16}  {:>3.0}%",
                category.category_name,
                money(category.amount),
                category.share_percent
            );
        }
    }

    out
}

pub fn cmd_summary(ctx: &Context, json: bool) -> Result<()> {
    let snapshot = ctx.snapshot()?;
    let summary = monthly_summary(&snapshot, ctx.today);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?
        );
        return Ok(());
    }

    println!();
    println!("📅 Summary for {}-{:02}", summary.year, summary.month);
    println!("   ─────────────────────────────");
    print!("{}", render_summary(&summary, &ctx.config.currency));
    Ok(())
}
