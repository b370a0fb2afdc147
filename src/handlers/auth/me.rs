// handlers/auth/me.rs - GET /api/auth/me handler

use axum::{extract::State, http::HeaderMap, response::Json};
use serde_json::{json, Value};

use super::resolve_user;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/auth/me - Current user from the access-token cookie
///
/// 200 `{"user": {"id", "email"}}`; 401 when the cookie is missing or the
/// provider no longer accepts the token.
pub async fn me(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<Value>, ApiError> {
    let user = resolve_user(&state, &headers).await?;
    Ok(Json(json!({ "user": user })))
}
