// handlers/auth/signout.rs - POST /api/auth/signout handler

use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::error::ApiError;
use crate::session::{access_token, apply_cookies};
use crate::state::AppState;

/// POST /api/auth/signout - Revoke the session and clear both cookies
///
/// Revocation is best effort; the cookies are cleared even when the provider
/// call fails.
pub async fn signout(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, ApiError> {
    if let Some(token) = access_token(&headers, state.cookies.naming()) {
        if let Err(e) = state.auth.sign_out(&token).await {
            tracing::warn!("Provider sign out failed: {}", e);
        }
    }

    let mut response = Json(json!({ "success": true })).into_response();
    apply_cookies(response.headers_mut(), &state.cookies.clear())?;
    Ok(response)
}
