//! Insight threshold configuration
//!
//! Every numeric threshold the rule engine uses lives here so it can be tuned
//! without touching rule code.
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. Explicit path, or the override in the data dir
//!    (~/.local/share/finsight/config/insights.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Override files may be partial; missing keys keep their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/insights.toml");

/// Thresholds and presentation settings for insight generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightConfig {
    /// Currency code used in message text
    pub currency: String,
    /// Number of insights surfaced on the dashboard widget
    pub dashboard_limit: usize,
    /// Only evaluate budgets whose window contains the reference date. When
    /// false, ended and future budgets are evaluated too.
    pub active_budgets_only: bool,

    /// Budget usage above this percentage (and at most 100) is "near limit"
    pub near_limit_percent: f64,
    /// How far usage may run ahead of linear pace before warning
    pub pace_margin_percent: f64,
    /// Pace warnings need strictly more days left than this
    pub pace_min_days_left: i64,
    /// Usage below this percentage counts as well managed...
    pub well_managed_max_percent: f64,
    /// ...once more than this fraction of the window has elapsed
    pub well_managed_min_elapsed: f64,

    pub increase_factor: f64,
    pub decrease_factor: f64,
    /// A category growing by more than this percentage month over month spikes
    pub category_spike_percent: f64,
    pub high_expense_ratio: f64,
    pub good_savings_ratio: f64,
    pub dominant_category_percent: f64,

    /// Expense transactions below this amount are "micro"
    pub micro_transaction_limit: f64,
    /// More micro transactions than this in a month triggers the tip
    pub micro_transaction_count: usize,
    pub weekend_factor: f64,
    pub weekend_min_transactions: usize,

    pub low_balance: f64,
    pub emergency_fund_months: f64,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            currency: "IDR".to_string(),
            dashboard_limit: 3,
            active_budgets_only: true,
            near_limit_percent: 90.0,
            pace_margin_percent: 20.0,
            pace_min_days_left: 5,
            well_managed_max_percent: 50.0,
            well_managed_min_elapsed: 0.5,
            increase_factor: 1.3,
            decrease_factor: 0.8,
            category_spike_percent: 20.0,
            high_expense_ratio: 0.8,
            good_savings_ratio: 0.5,
            dominant_category_percent: 40.0,
            micro_transaction_limit: 50_000.0,
            micro_transaction_count: 15,
            weekend_factor: 1.5,
            weekend_min_transactions: 4,
            low_balance: 100_000.0,
            emergency_fund_months: 3.0,
        }
    }
}

impl InsightConfig {
    /// Load config: explicit path first, then the data-dir override, then
    /// the embedded defaults
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let path = match override_path {
            Some(path) => Some(path.to_path_buf()),
            None => default_config_path(),
        };

        let content = match path {
            Some(path) if path.exists() => {
                tracing::debug!(path = %path.display(), "Loading insight config override");
                fs::read_to_string(&path)
                    .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?
            }
            _ => DEFAULT_CONFIG.to_string(),
        };

        Self::parse(&content)
    }

    /// Parse a (possibly partial) TOML config on top of the defaults
    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

        let mut config = Self::default();

        if let Some(general) = raw.general {
            if let Some(currency) = general.currency {
                config.currency = currency;
            }
            if let Some(limit) = general.dashboard_limit {
                config.dashboard_limit = limit;
            }
            if let Some(active_only) = general.active_budgets_only {
                config.active_budgets_only = active_only;
            }
        }

        if let Some(budget) = raw.budget {
            apply(&mut config.near_limit_percent, budget.near_limit_percent);
            apply(&mut config.pace_margin_percent, budget.pace_margin_percent);
            apply(&mut config.pace_min_days_left, budget.pace_min_days_left);
            apply(
                &mut config.well_managed_max_percent,
                budget.well_managed_max_percent,
            );
            apply(
                &mut config.well_managed_min_elapsed,
                budget.well_managed_min_elapsed,
            );
        }

        if let Some(spending) = raw.spending {
            apply(&mut config.increase_factor, spending.increase_factor);
            apply(&mut config.decrease_factor, spending.decrease_factor);
            apply(
                &mut config.category_spike_percent,
                spending.category_spike_percent,
            );
            apply(&mut config.high_expense_ratio, spending.high_expense_ratio);
            apply(&mut config.good_savings_ratio, spending.good_savings_ratio);
            apply(
                &mut config.dominant_category_percent,
                spending.dominant_category_percent,
            );
        }

        if let Some(tips) = raw.tips {
            apply(
                &mut config.micro_transaction_limit,
                tips.micro_transaction_limit,
            );
            apply(
                &mut config.micro_transaction_count,
                tips.micro_transaction_count,
            );
            apply(&mut config.weekend_factor, tips.weekend_factor);
            apply(
                &mut config.weekend_min_transactions,
                tips.weekend_min_transactions,
            );
        }

        if let Some(wallet) = raw.wallet {
            apply(&mut config.low_balance, wallet.low_balance);
            apply(
                &mut config.emergency_fund_months,
                wallet.emergency_fund_months,
            );
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.near_limit_percent <= 0.0 || self.near_limit_percent > 100.0 {
            return Err(Error::Config(format!(
                "near_limit_percent must be in (0, 100], got {}",
                self.near_limit_percent
            )));
        }
        if !(0.0..=1.0).contains(&self.well_managed_min_elapsed) {
            return Err(Error::Config(format!(
                "well_managed_min_elapsed must be in [0, 1], got {}",
                self.well_managed_min_elapsed
            )));
        }
        Ok(())
    }
}

fn apply<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

/// Get the default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("finsight").join("config").join("insights.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    general: Option<RawGeneral>,
    budget: Option<RawBudget>,
    spending: Option<RawSpending>,
    tips: Option<RawTips>,
    wallet: Option<RawWallet>,
}

#[derive(Debug, Deserialize)]
struct RawGeneral {
    currency: Option<String>,
    dashboard_limit: Option<usize>,
    active_budgets_only: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawBudget {
    near_limit_percent: Option<f64>,
    pace_margin_percent: Option<f64>,
    pace_min_days_left: Option<i64>,
    well_managed_max_percent: Option<f64>,
    well_managed_min_elapsed: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawSpending {
    increase_factor: Option<f64>,
    decrease_factor: Option<f64>,
    category_spike_percent: Option<f64>,
    high_expense_ratio: Option<f64>,
    good_savings_ratio: Option<f64>,
    dominant_category_percent: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawTips {
    micro_transaction_limit: Option<f64>,
    micro_transaction_count: Option<usize>,
    weekend_factor: Option<f64>,
    weekend_min_transactions: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawWallet {
    low_balance: Option<f64>,
    emergency_fund_months: Option<f64>,
}
