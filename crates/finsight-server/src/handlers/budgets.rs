//! Budget status handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;

use super::load_snapshot;
use crate::{get_user_id, reference_date, AppError, AppState};
use finsight_core::{budget_statuses, compute_budget_status, BudgetStatus};

#[derive(Debug, Deserialize)]
pub struct BudgetQuery {
    /// Reference date (YYYY-MM-DD), defaults to today
    pub date: Option<String>,
}

/// GET /api/budgets/status - Consumption status of every budget
pub async fn list_budget_statuses(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BudgetQuery>,
    headers: HeaderMap,
) -> Result<Json<Vec<BudgetStatus>>, AppError> {
    let user_id = get_user_id(&headers)?;
    let today = reference_date(params.date.as_deref())?;

    let snapshot = load_snapshot(&state, user_id)?;
    Ok(Json(budget_statuses(&snapshot, today)))
}

/// GET /api/budgets/:id/status - Consumption status of one budget
pub async fn get_budget_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(params): Query<BudgetQuery>,
    headers: HeaderMap,
) -> Result<Json<BudgetStatus>, AppError> {
    let user_id = get_user_id(&headers)?;
    let today = reference_date(params.date.as_deref())?;

    let snapshot = load_snapshot(&state, user_id)?;
    let budget = snapshot
        .budgets
        .iter()
        .find(|b| b.id == id)
        .ok_or_else(|| AppError::not_found("Budget not found"))?;

    let mut status = compute_budget_status(budget, &snapshot.transactions, today);
    status.category_name = snapshot.category_name(budget.category_id).map(String::from);

    Ok(Json(status))
}
