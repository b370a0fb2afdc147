// handlers/connections/list.rs - GET /api/connections handler

use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::handlers::required_uuid;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

/// GET /api/connections?userId=<uuid> - Connections owned by a user
///
/// Returns `{"connections": [...]}` ordered by `connected_at` descending.
pub async fn list(State(state): State<AppState>, Query(query): Query<ListQuery>) -> Result<Json<Value>, ApiError> {
    let user_id = required_uuid(query.user_id.as_deref(), "userId required", "userId")?;

    let connections = state.connections.list_for_user(user_id).await?;
    tracing::debug!("Listed {} connections for user {}", connections.len(), user_id);

    Ok(Json(json!({ "connections": connections })))
}
