use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use url::form_urlencoded;

use crate::auth::verify_access_token;
use crate::config::{GuardConfig, GuardMode};
use crate::session::{request_cookies, CookieNaming};
use crate::state::AppState;

/// Whether `path` falls under one of the protected prefixes.
///
/// A prefix matches the exact path or any path continuing with `/`, so
/// `/dashboard` covers `/dashboard/ads` but not `/dashboards`.
pub fn is_protected(path: &str, prefixes: &[String]) -> bool {
    prefixes.iter().any(|prefix| {
        path == prefix
            || path
                .strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
    })
}

/// Sign-in location carrying the original path as `callbackUrl`.
pub fn signin_location(signin_path: &str, callback: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("callbackUrl", callback)
        .finish();
    format!("{}?{}", signin_path, query)
}

/// Decides whether a request to a protected path carries a session.
///
/// In presence mode any non-empty access-token cookie is accepted and the
/// token itself is only checked by the provider when a handler uses it.
pub fn has_session(
    cookies: &[(String, String)],
    naming: &CookieNaming,
    mode: GuardMode,
    jwt_secret: Option<&str>,
) -> bool {
    cookies
        .iter()
        .filter(|(name, value)| naming.is_access_token(name) && !value.is_empty())
        .any(|(_, value)| match (mode, jwt_secret) {
            (GuardMode::Verify, Some(secret)) => match verify_access_token(value, secret) {
                Ok(_) => true,
                Err(e) => {
                    tracing::debug!("Rejected access-token cookie: {}", e);
                    false
                }
            },
            _ => true,
        })
}

/// Redirects unauthenticated requests for protected paths to the sign-in page.
pub async fn route_guard(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let GuardConfig {
        protected_prefixes,
        signin_path,
        mode,
    } = &state.config.guard;

    let path = request.uri().path().to_string();
    if !is_protected(&path, protected_prefixes) {
        return next.run(request).await;
    }

    let cookies = request_cookies(request.headers());
    let authenticated = has_session(
        &cookies,
        state.cookies.naming(),
        *mode,
        state.config.store.jwt_secret.as_deref(),
    );

    if !authenticated {
        tracing::debug!("No session for protected path {}, redirecting to {}", path, signin_path);
        return Redirect::temporary(&signin_location(signin_path, &path)).into_response();
    }

    next.run(request).await
}
