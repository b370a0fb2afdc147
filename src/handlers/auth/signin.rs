// handlers/auth/signin.rs - POST /api/auth/signin handler

use axum::{
    body::Bytes,
    extract::State,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::json;

use super::email_fingerprint;
use crate::auth::AuthProviderError;
use crate::error::ApiError;
use crate::session::apply_cookies;
use crate::state::AppState;

pub(crate) const CREDENTIALS_REQUIRED: &str = "Email and password required";
pub(crate) const INVALID_CREDENTIALS: &str = "Invalid login credentials";

#[derive(Debug, Deserialize)]
struct SigninRequest {
    email: Option<String>,
    password: Option<String>,
}

impl SigninRequest {
    /// Both fields present and non-empty; anything else, including a body that
    /// is not a JSON object, is a missing-credentials request. Whitespace is
    /// left for the provider to judge.
    fn credentials(body: &[u8]) -> Option<(String, String)> {
        let request: SigninRequest = serde_json::from_slice(body).ok()?;
        let email = request.email.filter(|e| !e.is_empty())?;
        let password = request.password.filter(|p| !p.is_empty())?;
        Some((email, password))
    }
}

/// POST /api/auth/signin - Exchange email/password for session cookies
///
/// Input: `{"email": "...", "password": "..."}`
///
/// - 400 `{"error": "Email and password required"}` without calling the provider
/// - 401 `{"error": "Invalid login credentials"}` when the provider refuses or
///   returns no session/user (no distinction between unknown user and wrong password)
/// - 200 `{"success": true, "message": "Signed in successfully", "user": {"id", "email"}}`
///   plus access/refresh `Set-Cookie` headers
/// - 500 `{"error": "<message>"}` on transport or response failures
pub async fn signin(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    let (email, password) = SigninRequest::credentials(&body).ok_or_else(|| ApiError::bad_request(CREDENTIALS_REQUIRED))?;
    let fingerprint = email_fingerprint(&email);

    let outcome = match state.auth.sign_in_with_password(&email, &password).await {
        Ok(outcome) => outcome,
        Err(AuthProviderError::Rejected(reason)) => {
            tracing::warn!(email = %fingerprint, "Sign in rejected: {}", reason);
            return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
        }
        Err(e) => {
            tracing::error!(email = %fingerprint, "Sign in error: {}", e);
            let message = e.to_string();
            return Err(ApiError::internal_server_error(if message.is_empty() {
                "Sign in failed".to_string()
            } else {
                message
            }));
        }
    };

    let (Some(user), Some(session)) = (outcome.user, outcome.session) else {
        tracing::warn!(email = %fingerprint, "Sign in returned no session or user");
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    };

    let cookies = state.cookies.issue(&session);
    let mut response = Json(json!({
        "success": true,
        "message": "Signed in successfully",
        "user": {
            "id": user.id,
            "email": user.email,
        }
    }))
    .into_response();
    apply_cookies(response.headers_mut(), &cookies)?;

    let names: Vec<&str> = cookies.iter().map(|c| c.name()).collect();
    tracing::info!(email = %fingerprint, user_id = %user.id, cookies = ?names, "Signed in");

    Ok(response)
}
