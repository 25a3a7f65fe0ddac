pub mod local;
pub mod supabase;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub use local::LocalIdentity;
pub use supabase::SupabaseIdentity;

/// Caller identity resolved from a bearer token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub user: AuthUser,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Result of a signup. Providers that require email confirmation return no session.
#[derive(Debug, Clone, Serialize)]
pub struct SignUp {
    pub user: AuthUser,
    pub session: Option<Session>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// The provider refused the request for a client-side reason
    #[error("{0}")]
    Rejected(String),

    #[error("Identity provider error: {0}")]
    Upstream(String),

    #[error("Identity provider misconfigured: {0}")]
    Config(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Token(#[from] jsonwebtoken::errors::Error),
}

/// Account and token operations delegated to an identity service
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUp, AuthError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    async fn refresh(&self, refresh_token: &str) -> Result<Session, AuthError>;

    /// Resolve the user an access token belongs to
    async fn get_user(&self, access_token: &str) -> Result<AuthUser, AuthError>;

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError>;
}
