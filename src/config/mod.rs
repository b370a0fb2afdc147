use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use url::Url;

use crate::session::cookies::CookieNaming;

/// Upper bounds for session cookie lifetimes (7 and 30 days).
pub const MAX_ACCESS_MAX_AGE_SECS: i64 = 7 * 24 * 60 * 60;
pub const MAX_REFRESH_MAX_AGE_SECS: i64 = 30 * 24 * 60 * 60;

pub const DEFAULT_PROTECTED_PREFIXES: &[&str] =
    &["/dashboard", "/connections", "/reports", "/automations", "/campaigns"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub store: StoreConfig,
    pub session: SessionConfig,
    pub guard: GuardConfig,
    pub connections: ConnectionsConfig,
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

/// Endpoints and keys for the hosted auth provider and the Postgres store behind it.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub url: Url,
    pub anon_key: String,
    pub database_url: String,
    pub jwt_secret: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub naming: CookieNaming,
    pub domain: Option<String>,
    pub secure: bool,
    pub access_max_age_secs: i64,
    pub refresh_max_age_secs: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardMode {
    /// Any access-token cookie counts as a session.
    Presence,
    /// The access-token cookie must carry a valid, unexpired HS256 JWT.
    Verify,
}

#[derive(Debug, Clone)]
pub struct GuardConfig {
    pub protected_prefixes: Vec<String>,
    pub signin_path: String,
    pub mode: GuardMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletePolicy {
    /// Deleting an absent connection still reports success.
    Idempotent,
    /// Deleting an absent connection responds 404.
    NotFound,
}

#[derive(Debug, Clone)]
pub struct ConnectionsConfig {
    pub delete_missing: DeletePolicy,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub port: u16,
    pub cors_origins: Vec<String>,
}

impl Environment {
    pub fn from_env() -> Self {
        match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        }
    }

    /// Tracing filter used when `RUST_LOG` is not set.
    pub fn default_log_filter(&self) -> &'static str {
        match self {
            Environment::Development => "adboard_api=debug,tower_http=debug",
            Environment::Staging => "adboard_api=info,tower_http=info",
            Environment::Production => "adboard_api=info",
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = Environment::from_env();

        let url = required("SUPABASE_URL")?;
        let url = Url::parse(&url).map_err(|e| ConfigError::Invalid {
            name: "SUPABASE_URL",
            reason: e.to_string(),
        })?;
        let anon_key = required("SUPABASE_ANON_KEY")?;
        let database_url = required("DATABASE_URL")?;

        let naming = match env::var("SESSION_COOKIE_PREFIX") {
            Ok(prefix) if !prefix.trim().is_empty() => CookieNaming::Explicit(prefix.trim().to_string()),
            _ => CookieNaming::from_store_url(&url).ok_or(ConfigError::Invalid {
                name: "SUPABASE_URL",
                reason: "cannot derive a project reference from the host".to_string(),
            })?,
        };

        let store = StoreConfig {
            url,
            anon_key,
            database_url,
            jwt_secret: env::var("SUPABASE_JWT_SECRET").ok().filter(|s| !s.is_empty()),
            max_connections: 10,
            connection_timeout: 30,
        };

        Ok(Self::preset(environment, store, naming).with_env_overrides())
    }

    /// Environment defaults, before per-variable overrides.
    pub fn preset(environment: Environment, store: StoreConfig, naming: CookieNaming) -> Self {
        let (secure, cors_origins, max_connections, timeout) = match environment {
            Environment::Development => (
                false,
                vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
                10,
                30,
            ),
            Environment::Staging => (
                true,
                vec!["https://staging.example.com".to_string()],
                20,
                10,
            ),
            Environment::Production => (
                true,
                vec!["https://app.example.com".to_string()],
                50,
                5,
            ),
        };

        Self {
            environment,
            store: StoreConfig {
                max_connections,
                connection_timeout: timeout,
                ..store
            },
            session: SessionConfig {
                naming,
                domain: None,
                secure,
                access_max_age_secs: MAX_ACCESS_MAX_AGE_SECS,
                refresh_max_age_secs: MAX_REFRESH_MAX_AGE_SECS,
            },
            guard: GuardConfig {
                protected_prefixes: DEFAULT_PROTECTED_PREFIXES.iter().map(|p| p.to_string()).collect(),
                signin_path: "/auth".to_string(),
                mode: GuardMode::Presence,
            },
            connections: ConnectionsConfig {
                delete_missing: DeletePolicy::Idempotent,
            },
            api: ApiConfig {
                port: 3000,
                cors_origins,
            },
        }
    }

    fn with_env_overrides(mut self) -> Self {
        // Store overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.store.max_connections = v.parse().unwrap_or(self.store.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.store.connection_timeout = v.parse().unwrap_or(self.store.connection_timeout);
        }

        // Session overrides
        if let Ok(v) = env::var("SESSION_COOKIE_DOMAIN") {
            self.session.domain = Some(v).filter(|d| !d.is_empty());
        }
        if let Ok(v) = env::var("SESSION_SECURE_COOKIES") {
            self.session.secure = v.parse().unwrap_or(self.session.secure);
        }
        if let Ok(v) = env::var("SESSION_ACCESS_MAX_AGE_SECS") {
            self.session.access_max_age_secs = v.parse().unwrap_or(self.session.access_max_age_secs);
        }
        if let Ok(v) = env::var("SESSION_REFRESH_MAX_AGE_SECS") {
            self.session.refresh_max_age_secs = v.parse().unwrap_or(self.session.refresh_max_age_secs);
        }

        // Guard overrides
        if let Ok(v) = env::var("AUTH_SIGNIN_PATH") {
            if v.starts_with('/') {
                self.guard.signin_path = v;
            }
        }
        if let Ok(v) = env::var("GUARD_PROTECTED_PREFIXES") {
            self.guard.protected_prefixes = v
                .split(',')
                .map(|s| s.trim().trim_end_matches('/').to_string())
                .filter(|s| s.starts_with('/'))
                .collect();
        }
        if let Ok(v) = env::var("GUARD_VERIFY_TOKENS") {
            if v.parse().unwrap_or(false) {
                self.guard.mode = GuardMode::Verify;
            }
        }

        // Connections overrides
        if let Ok(v) = env::var("CONNECTIONS_DELETE_MISSING") {
            self.connections.delete_missing = match v.as_str() {
                "not_found" | "404" => DeletePolicy::NotFound,
                _ => DeletePolicy::Idempotent,
            };
        }

        // API overrides
        if let Some(port) = env::var("ADBOARD_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.api.port = port;
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.api.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        self.clamped()
    }

    /// Applies the lifetime caps and drops verify mode when no secret is configured.
    fn clamped(mut self) -> Self {
        self.session.access_max_age_secs = self.session.access_max_age_secs.clamp(0, MAX_ACCESS_MAX_AGE_SECS);
        self.session.refresh_max_age_secs = self.session.refresh_max_age_secs.clamp(0, MAX_REFRESH_MAX_AGE_SECS);
        if self.guard.mode == GuardMode::Verify && self.store.jwt_secret.is_none() {
            tracing::warn!("GUARD_VERIFY_TOKENS set without SUPABASE_JWT_SECRET; falling back to presence checks");
            self.guard.mode = GuardMode::Presence;
        }
        self
    }

    pub fn is_development(&self) -> bool {
        matches!(self.environment, Environment::Development)
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::Missing(name)),
    }
}
