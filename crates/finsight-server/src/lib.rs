//! FinSight Web Server
//!
//! Axum-based REST API exposing insights, budget status and monthly summaries.
//!
//! Authentication happens upstream: the gateway in front of this server sets
//! the `x-user-id` header on every request it forwards. Requests without it
//! are rejected.
//!
//! - Restrictive CORS policy
//! - Security headers on every response
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use tower_http::{
    cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::{error, info, warn};

use finsight_core::{Database, InsightConfig};

mod handlers;

/// Header carrying the authenticated user id, set by the auth gateway
pub const USER_ID_HEADER: &str = "x-user-id";

/// Upper bound for `?limit=` on insight listings
pub const MAX_INSIGHT_LIMIT: usize = 100;

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    /// Thresholds used for every insight request
    pub insights: InsightConfig,
}

/// Extract the authenticated user id from request headers
pub fn get_user_id(headers: &HeaderMap) -> Result<i64, AppError> {
    let value = headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::unauthorized("Missing user identity"))?;

    match value.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => {
            warn!(value, "Rejected malformed user id header");
            Err(AppError::unauthorized("Invalid user identity"))
        }
    }
}

/// Resolve the `?date=` reference date, defaulting to today (local time)
pub fn reference_date(param: Option<&str>) -> Result<NaiveDate, AppError> {
    match param {
        None => Ok(chrono::Local::now().date_naive()),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| AppError::bad_request("Invalid date, expected YYYY-MM-DD")),
    }
}

/// Create the application router
pub fn create_router(db: Database, insights: InsightConfig, config: ServerConfig) -> Router {
    let state = Arc::new(AppState { db, insights });

    let api_routes = Router::new()
        // Insights
        .route("/insights", get(handlers::get_top_insights))
        .route("/insights/all", get(handlers::list_insights))
        .route("/insights/grouped", get(handlers::get_grouped_insights))
        .route("/insights/report", get(handlers::get_insight_report))
        // Budgets
        .route("/budgets/status", get(handlers::list_budget_statuses))
        .route("/budgets/:id/status", get(handlers::get_budget_status))
        // Summary
        .route("/summary/monthly", get(handlers::get_monthly_summary));

    // CORS: only explicitly configured origins
    let cors = if config.allowed_origins.is_empty() {
        CorsLayer::new()
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers([
                header::CONTENT_TYPE,
                header::HeaderName::from_static(USER_ID_HEADER),
            ])
    };

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(health_check))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
}

/// GET /health - Liveness probe
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Start the server
pub async fn serve(
    db: Database,
    insights: InsightConfig,
    host: &str,
    port: u16,
    config: ServerConfig,
) -> anyhow::Result<()> {
    let app = create_router(db, insights, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    fn with_status(status: StatusCode, msg: &str) -> Self {
        Self {
            status,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn bad_request(msg: &str) -> Self {
        Self::with_status(StatusCode::BAD_REQUEST, msg)
    }

    pub fn unauthorized(msg: &str) -> Self {
        Self::with_status(StatusCode::UNAUTHORIZED, msg)
    }

    pub fn not_found(msg: &str) -> Self {
        Self::with_status(StatusCode::NOT_FOUND, msg)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, status = %self.status, "Request failed");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();

        // Core errors that carry meaning for the client keep their status;
        // everything else is a generic 500
        let (status, message) = match err.downcast_ref::<finsight_core::Error>() {
            Some(finsight_core::Error::DataUnavailable(_)) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Financial data is temporarily unavailable".to_string(),
            ),
            Some(finsight_core::Error::NotFound(what)) => {
                return Self::not_found(&format!("{} not found", what));
            }
            Some(finsight_core::Error::InvalidData(msg)) => {
                return Self::bad_request(msg);
            }
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal error occurred".to_string(),
            ),
        };

        Self {
            status,
            message,
            // Keep full error for logging
            internal: Some(err),
        }
    }
}
