// handlers/connections/action.rs - POST /api/connections/:id handler

use axum::{
    body::Bytes,
    extract::{Path, State},
    response::Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::StoreError;
use crate::error::ApiError;
use crate::handlers::required_uuid;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct ActionRequest {
    action: Option<String>,
}

/// POST /api/connections/:id - Connection actions
///
/// Only `{"action": "sync"}` is recognized. It records that a sync was
/// requested by stamping `last_sync_at`; the data pull itself happens elsewhere.
/// An unknown connection is a 500, not a 404.
pub async fn action(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let request: ActionRequest =
        serde_json::from_slice(&body).map_err(|e| ApiError::bad_request(format!("Invalid JSON body: {}", e)))?;

    match request.action.as_deref() {
        Some("sync") => {}
        _ => return Err(ApiError::bad_request("Unknown action")),
    }

    let id = required_uuid(Some(&id), "Connection ID required", "connection id")?;

    let connection = state
        .connections
        .find(id)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("Connection {} not found", id)))?;

    let updated = state.connections.mark_synced(connection.id, Utc::now()).await?;
    if updated == 0 {
        // Deleted between the read and the write.
        return Err(StoreError::NotFound(format!("Connection {} not found", id)).into());
    }

    tracing::info!("Sync requested for connection {} ({})", id, connection.platform);
    Ok(Json(json!({ "success": true, "message": "Sync started" })))
}
