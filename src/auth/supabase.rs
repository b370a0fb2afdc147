use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use url::Url;

use super::{AuthProvider, AuthProviderError, AuthUser, Session, SignIn};

/// GoTrue-compatible auth client (`/auth/v1/*`).
pub struct SupabaseAuth {
    base: String,
    anon_key: String,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    token_type: Option<String>,
    user: Option<ProviderUser>,
}

#[derive(Debug, Deserialize)]
struct ProviderUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

impl From<ProviderUser> for AuthUser {
    fn from(user: ProviderUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
        }
    }
}

impl SupabaseAuth {
    pub fn new(url: &Url, anon_key: impl Into<String>) -> Self {
        Self {
            base: url.as_str().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            http: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base, path)
    }

    async fn failure(response: reqwest::Response) -> AuthProviderError {
        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);
        classify_failure(status, &body)
    }
}

/// Maps a non-success provider status: 4xx is a rejection, except rate
/// limiting, which like 5xx is an upstream failure.
fn classify_failure(status: StatusCode, body: &Value) -> AuthProviderError {
    let message = ["error_description", "msg", "message", "error"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error"))
        .to_string();

    if status.is_client_error() && status != StatusCode::TOO_MANY_REQUESTS {
        AuthProviderError::Rejected(message)
    } else {
        AuthProviderError::Upstream {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl AuthProvider for SupabaseAuth {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<SignIn, AuthProviderError> {
        let response = self
            .http
            .post(self.endpoint("token?grant_type=password"))
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::failure(response).await);
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthProviderError::Malformed(e.to_string()))?;

        let session = match (token.access_token, token.refresh_token) {
            (Some(access_token), Some(refresh_token)) => Some(Session {
                access_token,
                refresh_token,
                expires_in: token.expires_in.unwrap_or_default(),
                token_type: token.token_type.unwrap_or_else(|| "bearer".to_string()),
            }),
            _ => None,
        };

        Ok(SignIn {
            user: token.user.map(AuthUser::from),
            session,
        })
    }

    async fn get_user(&self, access_token: &str) -> Result<AuthUser, AuthProviderError> {
        let response = self
            .http
            .get(self.endpoint("user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::failure(response).await);
        }

        let user: ProviderUser = response
            .json()
            .await
            .map_err(|e| AuthProviderError::Malformed(e.to_string()))?;
        Ok(user.into())
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthProviderError> {
        let response = self
            .http
            .post(self.endpoint("logout"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(()),
            // Already-expired tokens cannot be revoked; the cookies are cleared regardless.
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(()),
            _ => Err(Self::failure(response).await),
        }
    }
}
