//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `load_config` - Insight thresholds from TOML
//! - `Context` - Everything a read command needs
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{Context as _, Result};
use chrono::NaiveDate;
use finsight_core::{Database, InsightConfig, LedgerStore, Snapshot};

pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path is not valid UTF-8")?;
    Database::new(path_str).context("Failed to open database")
}

pub fn load_config(path: Option<&Path>) -> Result<InsightConfig> {
    InsightConfig::load(path).context("Failed to load insight config")
}

/// Parse `--date`, defaulting to today (local time)
pub fn parse_reference_date(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        None => Ok(chrono::Local::now().date_naive()),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s)),
    }
}

/// Database, thresholds, user and reference date for one command run
pub struct Context {
    pub db: Database,
    pub config: InsightConfig,
    pub user_id: i64,
    pub today: NaiveDate,
}

impl Context {
    pub fn open(
        db_path: &Path,
        config_path: Option<&Path>,
        user_id: i64,
        date: Option<&str>,
    ) -> Result<Self> {
        let config = load_config(config_path)?;
        let db = open_db(db_path)?;
        let today = parse_reference_date(date)?;

        tracing::debug!(
            db = %db_path.display(),
            user_id,
            %today,
            currency = %config.currency,
            "Command context ready"
        );
        Ok(Self {
            db,
            config,
            user_id,
            today,
        })
    }

    pub fn snapshot(&self) -> Result<Snapshot> {
        self.db
            .load_snapshot(self.user_id)
            .with_context(|| format!("Failed to load ledger for user {}", self.user_id))
    }
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path)?;

    let added = db
        .seed_default_categories()
        .context("Failed to seed default categories")?;
    println!("   Seeded {} default categories", added);

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. See what stands out: finsight insights");
    println!("  2. Start the API: finsight serve");

    Ok(())
}
