//! Test doubles for the provider and store seams, and a router harness.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value;
use tower::ServiceExt;
use url::Url;
use uuid::Uuid;

use crate::auth::{AuthProvider, AuthProviderError, AuthUser, Claims, Session, SignIn};
use crate::config::{AppConfig, Environment, StoreConfig};
use crate::database::{Connection, ConnectionStore, DailyMetric, MetricsSource, StoreError};
use crate::session::CookieNaming;
use crate::state::AppState;

pub const TEST_EMAIL: &str = "ada@example.com";
pub const TEST_PASSWORD: &str = "correct-horse";
pub const ACCESS_COOKIE: &str = "sb-proj-access-token";
pub const REFRESH_COOKIE: &str = "sb-proj-refresh-token";

pub fn test_user_id() -> Uuid {
    Uuid::parse_str("7c9e6679-7425-40de-944b-e07fc1f90ae7").unwrap()
}

pub fn test_access_token() -> String {
    format!("access-{}", test_user_id())
}

/// HS256 token for `sub`, expiring `ttl_secs` from now (negative for already expired).
pub fn sign_token(secret: &str, sub: &str, ttl_secs: i64) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: sub.to_string(),
        email: None,
        role: Some("authenticated".to_string()),
        exp: now + ttl_secs,
        iat: Some(now),
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
}

pub fn test_config() -> AppConfig {
    let store = StoreConfig {
        url: Url::parse("https://proj.supabase.co").unwrap(),
        anon_key: "anon-key".to_string(),
        database_url: "postgres://localhost/adboard_test".to_string(),
        jwt_secret: None,
        max_connections: 1,
        connection_timeout: 1,
    };
    AppConfig::preset(Environment::Development, store, CookieNaming::ProjectRef("proj".to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubMode {
    Normal,
    /// Accepts the credentials but hands back no session.
    NoSession,
    /// Fails as if the provider were unreachable.
    Unavailable,
}

/// Auth provider double with one known account.
pub struct StubAuth {
    pub mode: Mutex<StubMode>,
    pub sign_in_calls: AtomicUsize,
    pub signed_out: Mutex<Vec<String>>,
}

impl StubAuth {
    pub fn new() -> Self {
        Self {
            mode: Mutex::new(StubMode::Normal),
            sign_in_calls: AtomicUsize::new(0),
            signed_out: Mutex::new(Vec::new()),
        }
    }

    pub fn set_mode(&self, mode: StubMode) {
        *self.mode.lock().unwrap() = mode;
    }

    pub fn calls(&self) -> usize {
        self.sign_in_calls.load(Ordering::SeqCst)
    }

    fn user() -> AuthUser {
        AuthUser {
            id: test_user_id().to_string(),
            email: Some(TEST_EMAIL.to_string()),
        }
    }
}

#[async_trait]
impl AuthProvider for StubAuth {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<SignIn, AuthProviderError> {
        self.sign_in_calls.fetch_add(1, Ordering::SeqCst);
        let mode = *self.mode.lock().unwrap();

        match mode {
            StubMode::Unavailable => Err(AuthProviderError::Upstream {
                status: 503,
                message: "provider down".to_string(),
            }),
            _ if email != TEST_EMAIL || password != TEST_PASSWORD => {
                Err(AuthProviderError::Rejected("Invalid login credentials".to_string()))
            }
            StubMode::NoSession => Ok(SignIn {
                user: Some(Self::user()),
                session: None,
            }),
            StubMode::Normal => Ok(SignIn {
                user: Some(Self::user()),
                session: Some(Session {
                    access_token: test_access_token(),
                    refresh_token: "refresh-token".to_string(),
                    expires_in: 3600,
                    token_type: "bearer".to_string(),
                }),
            }),
        }
    }

    async fn get_user(&self, access_token: &str) -> Result<AuthUser, AuthProviderError> {
        if access_token == test_access_token() {
            Ok(Self::user())
        } else {
            Err(AuthProviderError::Rejected("invalid JWT".to_string()))
        }
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthProviderError> {
        self.signed_out.lock().unwrap().push(access_token.to_string());
        Ok(())
    }
}

/// In-memory `ad_accounts` table.
pub struct MemoryConnections {
    pub rows: Mutex<Vec<Connection>>,
    pub fail: AtomicBool,
}

impl MemoryConnections {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        }
    }

    pub fn insert(&self, user_id: Uuid, platform: &str, connected_at: DateTime<Utc>) -> Uuid {
        let id = Uuid::new_v4();
        self.rows.lock().unwrap().push(Connection {
            id,
            user_id,
            platform: platform.to_string(),
            connected_at,
            last_sync_at: None,
        });
        id
    }

    pub fn get(&self, id: Uuid) -> Option<Connection> {
        self.rows.lock().unwrap().iter().find(|c| c.id == id).cloned()
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.fail.load(Ordering::SeqCst) {
            Err(StoreError::Sqlx(sqlx::Error::PoolTimedOut))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ConnectionStore for MemoryConnections {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Connection>, StoreError> {
        self.check()?;
        let mut rows: Vec<Connection> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.connected_at.cmp(&a.connected_at));
        Ok(rows)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Connection>, StoreError> {
        self.check()?;
        Ok(self.get(id))
    }

    async fn delete(&self, id: Uuid) -> Result<u64, StoreError> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|c| c.id != id);
        Ok((before - rows.len()) as u64)
    }

    async fn mark_synced(&self, id: Uuid, at: DateTime<Utc>) -> Result<u64, StoreError> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        let mut updated = 0;
        for row in rows.iter_mut().filter(|c| c.id == id) {
            row.last_sync_at = Some(at);
            updated += 1;
        }
        Ok(updated)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.check()
    }
}

/// In-memory `ad_metrics_daily` rows keyed by user.
pub struct MemoryMetrics {
    pub rows: Mutex<Vec<(Uuid, DailyMetric)>>,
    pub fail: AtomicBool,
}

impl MemoryMetrics {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        }
    }

    pub fn insert(&self, user_id: Uuid, day: NaiveDate, platform: &str, spend: f64, revenue: f64, leads: i64) {
        self.rows.lock().unwrap().push((
            user_id,
            DailyMetric {
                day,
                platform: platform.to_string(),
                spend,
                revenue,
                leads,
            },
        ));
    }
}

#[async_trait]
impl MetricsSource for MemoryMetrics {
    async fn daily_metrics(&self, user_id: Uuid, from: NaiveDate, to: NaiveDate) -> Result<Vec<DailyMetric>, StoreError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(StoreError::Sqlx(sqlx::Error::PoolTimedOut));
        }
        let mut rows: Vec<DailyMetric> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|(owner, row)| *owner == user_id && row.day >= from && row.day <= to)
            .map(|(_, row)| row.clone())
            .collect();
        rows.sort_by(|a, b| a.day.cmp(&b.day));
        Ok(rows)
    }
}

/// Response captured from the router.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }

    pub fn location(&self) -> Option<&str> {
        self.headers.get(header::LOCATION).and_then(|v| v.to_str().ok())
    }
}

/// Router wired to fresh doubles.
pub struct TestContext {
    pub config: AppConfig,
    pub auth: Arc<StubAuth>,
    pub connections: Arc<MemoryConnections>,
    pub metrics: Arc<MemoryMetrics>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            auth: Arc::new(StubAuth::new()),
            connections: Arc::new(MemoryConnections::new()),
            metrics: Arc::new(MemoryMetrics::new()),
        }
    }

    pub fn app(&self) -> Router {
        let state = AppState::new(
            self.config.clone(),
            self.auth.clone(),
            self.connections.clone(),
            self.metrics.clone(),
        );
        crate::app(state)
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        TestResponse { status, headers, body }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(request(Method::GET, uri, None, None)).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send(request(Method::DELETE, uri, None, None)).await
    }

    pub async fn post(&self, uri: &str, body: &str) -> TestResponse {
        self.send(request(Method::POST, uri, Some(body), None)).await
    }
}

pub fn request(method: Method, uri: &str, body: Option<&str>, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
    }
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap()
}
