//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Init plus shared utilities (open_db, config loading, command context)
//! - `insights` - Insight listing and health score
//! - `budgets` - Budget consumption status
//! - `summary` - Monthly income/expense summary
//! - `serve` - Web server command

pub mod budgets;
pub mod core;
pub mod insights;
pub mod serve;
pub mod summary;

// Re-export command functions for main.rs
pub use budgets::*;
pub use core::*;
pub use insights::*;
pub use serve::*;
pub use summary::*;
