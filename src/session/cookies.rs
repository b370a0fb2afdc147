use axum::http::{header, HeaderMap, HeaderValue};
use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;
use url::Url;

use crate::auth::Session;
use crate::config::SessionConfig;
use crate::error::ApiError;

const ACCESS_SUFFIX: &str = "-access-token";
const REFRESH_SUFFIX: &str = "-refresh-token";

/// How session cookie names are chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookieNaming {
    /// `sb-<ref>-access-token`, where `<ref>` is the first label of the store host.
    ProjectRef(String),
    /// `<prefix>-access-token`, configured explicitly.
    Explicit(String),
}

impl CookieNaming {
    pub fn from_store_url(url: &Url) -> Option<Self> {
        let host = url.host_str()?;
        let project_ref = host.split('.').next().filter(|label| !label.is_empty())?;
        Some(CookieNaming::ProjectRef(project_ref.to_string()))
    }

    fn prefix(&self) -> String {
        match self {
            CookieNaming::ProjectRef(project_ref) => format!("sb-{}", project_ref),
            CookieNaming::Explicit(prefix) => prefix.clone(),
        }
    }

    pub fn access_token_name(&self) -> String {
        format!("{}{}", self.prefix(), ACCESS_SUFFIX)
    }

    pub fn refresh_token_name(&self) -> String {
        format!("{}{}", self.prefix(), REFRESH_SUFFIX)
    }

    /// Whether a cookie name denotes an access token under this naming.
    ///
    /// Project-ref naming accepts any `sb-*-access-token` cookie, whatever its ref.
    pub fn is_access_token(&self, name: &str) -> bool {
        match self {
            CookieNaming::ProjectRef(_) => {
                name.len() > "sb-".len() + ACCESS_SUFFIX.len()
                    && name.starts_with("sb-")
                    && name.ends_with(ACCESS_SUFFIX)
            }
            CookieNaming::Explicit(_) => name == self.access_token_name(),
        }
    }
}

/// Parses a raw `Cookie` header into name/value pairs.
///
/// Pairs are separated by `"; "` and split at the first `=`; any further `=`
/// stays in the value.
pub fn parse_cookie_header(header: Option<&str>) -> Vec<(String, String)> {
    let Some(header) = header else {
        return Vec::new();
    };

    header
        .split("; ")
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((name, value)) => (name.to_string(), value.to_string()),
            None => (pair.to_string(), String::new()),
        })
        .collect()
}

/// All cookies sent with a request, across every `Cookie` header.
pub fn request_cookies(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| parse_cookie_header(Some(value)))
        .collect()
}

/// Value of the first non-empty access-token cookie on the request.
pub fn access_token(headers: &HeaderMap, naming: &CookieNaming) -> Option<String> {
    request_cookies(headers)
        .into_iter()
        .find(|(name, value)| naming.is_access_token(name) && !value.is_empty())
        .map(|(_, value)| value)
}

/// Appends one `Set-Cookie` header per write, keeping every attribute.
pub fn apply_cookies(headers: &mut HeaderMap, cookies: &[Cookie<'static>]) -> Result<(), ApiError> {
    for cookie in cookies {
        let value = HeaderValue::from_str(&cookie.to_string()).map_err(|e| {
            tracing::error!("Cannot encode cookie '{}' as a header: {}", cookie.name(), e);
            ApiError::internal_server_error(format!("Failed to set cookie {}", cookie.name()))
        })?;
        headers.append(header::SET_COOKIE, value);
    }
    Ok(())
}

/// Builds the session cookie writes for a provider session.
#[derive(Debug, Clone)]
pub struct SessionCookies {
    config: SessionConfig,
}

impl SessionCookies {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    pub fn naming(&self) -> &CookieNaming {
        &self.config.naming
    }

    pub fn issue(&self, session: &Session) -> Vec<Cookie<'static>> {
        vec![
            self.write(
                self.config.naming.access_token_name(),
                session.access_token.clone(),
                self.config.access_max_age_secs,
            ),
            self.write(
                self.config.naming.refresh_token_name(),
                session.refresh_token.clone(),
                self.config.refresh_max_age_secs,
            ),
        ]
    }

    /// Removal writes for both session cookies.
    pub fn clear(&self) -> Vec<Cookie<'static>> {
        vec![
            self.write(self.config.naming.access_token_name(), String::new(), 0),
            self.write(self.config.naming.refresh_token_name(), String::new(), 0),
        ]
    }

    fn write(&self, name: String, value: String, max_age_secs: i64) -> Cookie<'static> {
        let mut cookie = Cookie::build((name, value))
            .http_only(true)
            .secure(self.config.secure)
            .same_site(SameSite::Lax)
            .path("/")
            .max_age(Duration::seconds(max_age_secs))
            .build();
        if let Some(domain) = &self.config.domain {
            cookie.set_domain(domain.clone());
        }
        cookie
    }
}
