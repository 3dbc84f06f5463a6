//! Insight and health score commands

use std::fmt::Write as _;

use anyhow::{Context as _, Result};
use finsight_core::insights::{group_by_category, top};
use finsight_core::{generate_insights, HealthStatus, Insight, InsightReport, Severity};

use super::Context;

fn severity_icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "🔴",
        Severity::Warning => "🟠",
        Severity::Info => "🔵",
        Severity::Success => "🟢",
    }
}

fn write_insight(out: &mut String, insight: &Insight) {
    let _ = writeln!(out, "   {} {}", severity_icon(insight.severity), insight.title);
    let _ = writeln!(out, "      {}", insight.message);
    if let Some(action) = &insight.action {
        let _ = writeln!(out, "      → {}", action.label);
    }
}

/// Text rendering of a ranked insight list, flat or grouped by category
pub fn render_insights(insights: &[Insight], grouped: bool) -> String {
    let mut out = String::new();

    if insights.is_empty() {
        out.push_str("✨ Nothing to report right now.\n");
        return out;
    }

    if grouped {
        for (category, members) in group_by_category(insights) {
            if members.is_empty() {
                continue;
            }
            let _ = writeln!(out, "📂 {} ({})", category.label(), members.len());
            for insight in &members {
                write_insight(&mut out, insight);
            }
            out.push('\n');
        }
    } else {
        for insight in insights {
            write_insight(&mut out, insight);
        }
    }

    out
}

pub fn cmd_insights(ctx: &Context, limit: Option<usize>, grouped: bool, json: bool) -> Result<()> {
    let snapshot = ctx.snapshot()?;
    let mut insights = generate_insights(&snapshot, ctx.today, &ctx.config);
    if let Some(n) = limit {
        insights = top(&insights, n);
    }

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&insights).context("Failed to serialize insights")?
        );
        return Ok(());
    }

    println!();
    println!("💡 Insights for {}", ctx.today);
    println!("   ─────────────────────────────");
    print!("{}", render_insights(&insights, grouped));
    Ok(())
}

fn status_label(status: HealthStatus) -> &'static str {
    match status {
        HealthStatus::Excellent => "Excellent",
        HealthStatus::Good => "Good",
        HealthStatus::NeedsAttention => "Needs attention",
        HealthStatus::Critical => "Critical",
    }
}

/// Text rendering of the health score and severity counts
pub fn render_health(report: &InsightReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "   Score:     {}/100 ({})",
        report.health.score,
        status_label(report.health.status)
    );
    let _ = writeln!(
        out,
        "   Findings:  {} critical, {} warning, {} info, {} positive",
        report.counts.critical, report.counts.warning, report.counts.info, report.counts.success
    );
    out
}

pub fn cmd_health(ctx: &Context, json: bool) -> Result<()> {
    let snapshot = ctx.snapshot()?;
    let report = InsightReport::build(&snapshot, ctx.today, &ctx.config);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        );
        return Ok(());
    }

    println!();
    println!("❤️  Financial Health");
    println!("   ─────────────────────────────");
    print!("{}", render_health(&report));
    if report.counts.critical > 0 {
        println!();
        println!("  Run 'finsight insights' to see what needs attention.");
    }
    Ok(())
}
