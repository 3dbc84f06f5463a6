//! FinSight CLI - Personal finance insights
//!
//! Usage:
//!   finsight init                  Initialize database
//!   finsight insights --top 3      Show the most important insights
//!   finsight budgets               Show budget consumption
//!   finsight serve --port 3000     Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let open = || {
        commands::Context::open(
            &cli.db,
            cli.config.as_deref(),
            cli.user,
            cli.date.as_deref(),
        )
    };

    match &cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Insights { top, grouped, json } => {
            commands::cmd_insights(&open()?, *top, *grouped, *json)
        }
        Commands::Budgets { json } => commands::cmd_budgets(&open()?, *json),
        Commands::Health { json } => commands::cmd_health(&open()?, *json),
        Commands::Summary { json } => commands::cmd_summary(&open()?, *json),
        Commands::Serve {
            port,
            host,
            allowed_origins,
        } => commands::cmd_serve(open()?, host, *port, allowed_origins.clone()).await,
    }
}
