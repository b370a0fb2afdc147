// handlers/analytics.rs - GET /api/analytics/{summary,historical,platforms}

use axum::{
    extract::{Query, State},
    response::Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::analytics::{self, TimeRange};
use crate::error::ApiError;
use crate::handlers::required_uuid;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    pub range: Option<String>,
}

impl AnalyticsQuery {
    fn resolve(&self) -> Result<(Uuid, TimeRange), ApiError> {
        let user_id = required_uuid(self.user_id.as_deref(), "userId required", "userId")?;
        let range = parse_range(self.range.as_deref())?;
        Ok((user_id, range))
    }
}

/// Missing or empty range means the default window.
pub(crate) fn parse_range(raw: Option<&str>) -> Result<TimeRange, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(TimeRange::default()),
        Some(raw) => raw.parse().map_err(|_| ApiError::bad_request("Invalid range")),
    }
}

/// GET /api/analytics/summary?userId=&range= - Totals and period-over-period changes
pub async fn summary(State(state): State<AppState>, Query(query): Query<AnalyticsQuery>) -> Result<Json<Value>, ApiError> {
    let (user_id, range) = query.resolve()?;
    let today = Utc::now().date_naive();

    let summary = analytics::load_summary(state.metrics.as_ref(), user_id, range, today).await?;
    Ok(Json(json!({ "summary": summary })))
}

/// GET /api/analytics/historical?userId=&range= - Daily spend/revenue series
pub async fn historical(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<Value>, ApiError> {
    let (user_id, range) = query.resolve()?;
    let today = Utc::now().date_naive();

    let data = analytics::load_historical(state.metrics.as_ref(), user_id, range, today).await?;
    Ok(Json(json!({ "data": data })))
}

/// GET /api/analytics/platforms?userId= - Per-platform breakdown
pub async fn platforms(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<Value>, ApiError> {
    let (user_id, range) = query.resolve()?;
    let today = Utc::now().date_naive();

    let platforms = analytics::load_platforms(state.metrics.as_ref(), user_id, range, today).await?;
    Ok(Json(json!({ "platforms": platforms })))
}
