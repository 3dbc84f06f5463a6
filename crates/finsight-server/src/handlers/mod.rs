//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod budgets;
pub mod insights;
pub mod summary;

// Re-export all handlers for use in router
pub use budgets::*;
pub use insights::*;
pub use summary::*;

use finsight_core::{LedgerStore, Snapshot};

use crate::{AppError, AppState};

/// Load the caller's snapshot; read failures surface as 503
pub(crate) fn load_snapshot(state: &AppState, user_id: i64) -> Result<Snapshot, AppError> {
    Ok(state.db.load_snapshot(user_id)?)
}
