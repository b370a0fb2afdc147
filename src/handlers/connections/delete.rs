// handlers/connections/delete.rs - DELETE /api/connections[/:id] handlers

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::DeletePolicy;
use crate::error::ApiError;
use crate::handlers::required_uuid;
use crate::state::AppState;

const ID_REQUIRED: &str = "Connection ID required";

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    pub id: Option<String>,
}

/// DELETE /api/connections?id=<uuid>
pub async fn delete_by_query(
    State(state): State<AppState>,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<Value>, ApiError> {
    delete_connection(&state, query.id.as_deref()).await
}

/// DELETE /api/connections/:id
pub async fn delete_by_path(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Value>, ApiError> {
    delete_connection(&state, Some(&id)).await
}

/// Hard delete. An absent row is success or 404 depending on the configured policy.
async fn delete_connection(state: &AppState, raw_id: Option<&str>) -> Result<Json<Value>, ApiError> {
    let id = required_uuid(raw_id, ID_REQUIRED, "connection id")?;

    let removed = state.connections.delete(id).await?;
    if removed == 0 {
        match state.config.connections.delete_missing {
            DeletePolicy::NotFound => return Err(ApiError::not_found("Connection not found")),
            DeletePolicy::Idempotent => tracing::debug!("Connection {} already absent", id),
        }
    } else {
        tracing::info!("Deleted connection {}", id);
    }

    Ok(Json(json!({ "success": true })))
}
