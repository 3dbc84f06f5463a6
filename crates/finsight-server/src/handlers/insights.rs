//! Insight handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::load_snapshot;
use crate::{get_user_id, reference_date, AppError, AppState, MAX_INSIGHT_LIMIT};
use finsight_core::insights::{group_by_category, top};
use finsight_core::{generate_insights, Insight, InsightCategory, InsightReport};

/// Query parameters for insight endpoints
#[derive(Debug, Deserialize)]
pub struct InsightQuery {
    /// Reference date (YYYY-MM-DD), defaults to today
    pub date: Option<String>,
    /// Number of insights for the dashboard widget
    pub limit: Option<usize>,
    /// Filter by category (budget, spending, tips, wallet)
    pub category: Option<String>,
}

/// One category's insights in the grouped view
#[derive(Debug, Serialize)]
pub struct InsightGroup {
    pub category: InsightCategory,
    pub label: &'static str,
    pub insights: Vec<Insight>,
}

/// GET /api/insights - Top N insights for the dashboard
pub async fn get_top_insights(
    State(state): State<Arc<AppState>>,
    Query(params): Query<InsightQuery>,
    headers: HeaderMap,
) -> Result<Json<Vec<Insight>>, AppError> {
    let user_id = get_user_id(&headers)?;
    let today = reference_date(params.date.as_deref())?;
    let limit = params
        .limit
        .unwrap_or(state.insights.dashboard_limit)
        .min(MAX_INSIGHT_LIMIT);

    let snapshot = load_snapshot(&state, user_id)?;
    let insights = generate_insights(&snapshot, today, &state.insights);

    debug!(user_id, limit, total = insights.len(), "Top insights");
    Ok(Json(top(&insights, limit)))
}

/// GET /api/insights/all - Full ranked list, optionally for one category
pub async fn list_insights(
    State(state): State<Arc<AppState>>,
    Query(params): Query<InsightQuery>,
    headers: HeaderMap,
) -> Result<Json<Vec<Insight>>, AppError> {
    let user_id = get_user_id(&headers)?;
    let today = reference_date(params.date.as_deref())?;

    let category = params
        .category
        .as_deref()
        .map(|c| c.parse::<InsightCategory>())
        .transpose()
        .map_err(|e| AppError::bad_request(&e))?;

    let snapshot = load_snapshot(&state, user_id)?;
    let mut insights = generate_insights(&snapshot, today, &state.insights);

    if let Some(category) = category {
        insights.retain(|i| i.category == category);
    }

    Ok(Json(insights))
}

/// GET /api/insights/grouped - Ranked insights split by category
pub async fn get_grouped_insights(
    State(state): State<Arc<AppState>>,
    Query(params): Query<InsightQuery>,
    headers: HeaderMap,
) -> Result<Json<Vec<InsightGroup>>, AppError> {
    let user_id = get_user_id(&headers)?;
    let today = reference_date(params.date.as_deref())?;

    let snapshot = load_snapshot(&state, user_id)?;
    let insights = generate_insights(&snapshot, today, &state.insights);

    let groups = group_by_category(&insights)
        .into_iter()
        .map(|(category, insights)| InsightGroup {
            category,
            label: category.label(),
            insights,
        })
        .collect();

    Ok(Json(groups))
}

/// GET /api/insights/report - Insights with severity counts and health score
pub async fn get_insight_report(
    State(state): State<Arc<AppState>>,
    Query(params): Query<InsightQuery>,
    headers: HeaderMap,
) -> Result<Json<InsightReport>, AppError> {
    let user_id = get_user_id(&headers)?;
    let today = reference_date(params.date.as_deref())?;

    let snapshot = load_snapshot(&state, user_id)?;
    let report = InsightReport::build(&snapshot, today, &state.insights);

    debug!(
        user_id,
        score = report.health.score,
        status = %report.health.status,
        "Insight report"
    );
    Ok(Json(report))
}
