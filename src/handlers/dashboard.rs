// handlers/dashboard.rs - GET /dashboard view model

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::{IntoResponse, Json, Redirect, Response},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analytics::{self, HistoricalPoint, PlatformBreakdown, Summary, TimeRange};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::handlers::analytics::parse_range;
use crate::handlers::auth::resolve_user;
use crate::middleware::guard::signin_location;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub range: Option<String>,
}

/// Everything the dashboard page renders.
#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub user: AuthUser,
    pub range: TimeRange,
    pub summary: Option<Summary>,
    pub historical: Vec<HistoricalPoint>,
    pub platforms: Vec<PlatformBreakdown>,
}

/// GET /dashboard?range= - Dashboard view model
///
/// Without a usable session the request goes back to sign-in. The three
/// sections load concurrently; a failing section is logged and left empty.
pub async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let range = parse_range(query.range.as_deref())?;

    let user = match resolve_user(&state, &headers).await {
        Ok(user) => user,
        Err(e) => {
            tracing::debug!("Dashboard without usable session: {}", e);
            let location = signin_location(&state.config.guard.signin_path, "/dashboard");
            return Ok(Redirect::temporary(&location).into_response());
        }
    };

    let user_id = Uuid::parse_str(&user.id)
        .map_err(|_| ApiError::internal_server_error(format!("Unexpected user id format: {}", user.id)))?;
    let today = Utc::now().date_naive();
    let source = state.metrics.as_ref();

    let (summary, historical, platforms) = tokio::join!(
        analytics::load_summary(source, user_id, range, today),
        analytics::load_historical(source, user_id, range, today),
        analytics::load_platforms(source, user_id, range, today),
    );

    let view = DashboardView {
        user,
        range,
        summary: summary
            .map_err(|e| tracing::warn!("Dashboard summary unavailable: {}", e))
            .ok(),
        historical: historical
            .map_err(|e| tracing::warn!("Dashboard history unavailable: {}", e))
            .unwrap_or_default(),
        platforms: platforms
            .map_err(|e| tracing::warn!("Dashboard platforms unavailable: {}", e))
            .unwrap_or_default(),
    };

    Ok(Json(view).into_response())
}
