// handlers/service.rs - GET / and GET /health

use axum::{extract::State, http::StatusCode, response::IntoResponse, response::Json};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::state::AppState;

pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "adboard-api",
            "version": version,
            "endpoints": {
                "auth": "/api/auth/signin, /api/auth/me, /api/auth/signout",
                "connections": "/api/connections[?userId|?id], /api/connections/:id",
                "analytics": "/api/analytics/summary, /api/analytics/historical, /api/analytics/platforms",
                "dashboard": "/dashboard (session required)",
            }
        }
    }))
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.connections.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}

/// Fallback for unmatched paths. Registered before the guard layer so that
/// protected prefixes without a page route still redirect.
pub async fn not_found() -> ApiError {
    ApiError::not_found("Not found")
}
