//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// FinSight - Turn your ledger into actionable insights
#[derive(Parser)]
#[command(name = "finsight")]
#[command(about = "Personal finance insights, budget tracking and health score", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "finsight.db", global = true)]
    pub db: PathBuf,

    /// Insight threshold config (TOML); defaults apply for missing keys
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// User whose ledger is analyzed
    #[arg(short, long, default_value = "1", global = true)]
    pub user: i64,

    /// Reference date (YYYY-MM-DD), defaults to today
    #[arg(long, global = true)]
    pub date: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and seed default categories
    Init,

    /// Show ranked insights
    Insights {
        /// Only show the N most important insights
        #[arg(short, long)]
        top: Option<usize>,

        /// Group insights by category
        #[arg(short, long)]
        grouped: bool,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show consumption status of every budget
    Budgets {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show the financial health score
    Health {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show this month's income, expense and category breakdown
    Summary {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Allowed CORS origin (repeatable)
        #[arg(long = "allow-origin")]
        allowed_origins: Vec<String>,
    },
}
