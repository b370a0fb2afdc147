//! Auth provider seam.
//!
//! Credential checks, token minting and refresh rotation belong to the hosted
//! provider. The application only forwards credentials, reads back the
//! session and user, and keeps the tokens in cookies.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod jwt;
pub mod supabase;

pub use jwt::{verify_access_token, Claims, JwtError};
pub use supabase::SupabaseAuth;

/// Provider-issued token pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

/// The signed-in user as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
}

/// Result of a password sign-in the provider accepted at the transport level.
/// Either half may be missing, which callers treat as a failed sign-in.
#[derive(Debug, Clone, Default)]
pub struct SignIn {
    pub user: Option<AuthUser>,
    pub session: Option<Session>,
}

#[derive(Debug, Error)]
pub enum AuthProviderError {
    /// The provider refused the credentials or token.
    #[error("Rejected by auth provider: {0}")]
    Rejected(String),

    #[error("Auth provider returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Malformed auth provider response: {0}")]
    Malformed(String),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<SignIn, AuthProviderError>;

    /// Resolves the user behind an access token.
    async fn get_user(&self, access_token: &str) -> Result<AuthUser, AuthProviderError>;

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthProviderError>;
}
