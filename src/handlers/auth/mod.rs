// handlers/auth/mod.rs - Session endpoints
//
// POST /api/auth/signin   exchange email/password for session cookies
// GET  /api/auth/me       user behind the access-token cookie
// POST /api/auth/signout  revoke and clear the session cookies

use axum::http::HeaderMap;
use sha2::{Digest, Sha256};

use crate::auth::{AuthProviderError, AuthUser};
use crate::error::ApiError;
use crate::session::access_token;
use crate::state::AppState;

pub mod me;
pub mod signin;
pub mod signout;

pub use me::me;
pub use signin::signin;
pub use signout::signout;

pub(crate) const NOT_AUTHENTICATED: &str = "Not authenticated";

/// Resolves the user behind the request's access-token cookie through the provider.
pub(crate) async fn resolve_user(state: &AppState, headers: &HeaderMap) -> Result<AuthUser, ApiError> {
    let token = access_token(headers, state.cookies.naming()).ok_or_else(|| ApiError::unauthorized(NOT_AUTHENTICATED))?;

    state.auth.get_user(&token).await.map_err(|e| match e {
        AuthProviderError::Rejected(reason) => {
            tracing::debug!("Access token rejected by provider: {}", reason);
            ApiError::unauthorized(NOT_AUTHENTICATED)
        }
        other => other.into(),
    })
}

/// Short SHA-256 fingerprint used in logs in place of an email address.
pub(crate) fn email_fingerprint(email: &str) -> String {
    let digest = Sha256::digest(email.trim().to_lowercase().as_bytes());
    format!("{:x}", digest)[..12].to_string()
}
