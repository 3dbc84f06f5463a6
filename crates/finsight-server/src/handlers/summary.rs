//! Summary handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;

use super::load_snapshot;
use crate::{get_user_id, reference_date, AppError, AppState};
use finsight_core::{monthly_summary, MonthlySummary};

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    /// Any date inside the month to summarize (YYYY-MM-DD), defaults to today
    pub date: Option<String>,
}

/// GET /api/summary/monthly - Income, expense and category breakdown for a month
pub async fn get_monthly_summary(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SummaryQuery>,
    headers: HeaderMap,
) -> Result<Json<MonthlySummary>, AppError> {
    let user_id = get_user_id(&headers)?;
    let today = reference_date(params.date.as_deref())?;

    let snapshot = load_snapshot(&state, user_id)?;
    Ok(Json(monthly_summary(&snapshot, today)))
}
