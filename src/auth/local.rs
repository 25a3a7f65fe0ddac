use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use super::{AuthError, AuthUser, IdentityProvider, Session, SignUp};
use crate::config::IdentityConfig;

/// Access token claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: Option<String>,
    pub iat: i64,
    pub exp: i64,
    /// Unique per token so a refresh never reissues an identical string
    pub jti: Uuid,
}

struct Account {
    id: Uuid,
    email: String,
    salt: String,
    password_hash: String,
}

struct RefreshGrant {
    user_id: Uuid,
    expires_at: DateTime<Utc>,
}

#[derive(Default)]
struct LocalState {
    /// Keyed by lower-cased email
    accounts: HashMap<String, Account>,
    refresh_tokens: HashMap<String, RefreshGrant>,
}

/// In-process identity provider used when no hosted service is configured.
/// Accounts and refresh tokens are lost on restart.
pub struct LocalIdentity {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
    state: RwLock<LocalState>,
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Token lifetime from config; values chrono cannot represent are a config error
fn ttl(name: &str, secs: u64) -> Result<Duration, AuthError> {
    i64::try_from(secs)
        .ok()
        .and_then(Duration::try_seconds)
        .ok_or_else(|| AuthError::Config(format!("{} is out of range: {}", name, secs)))
}

fn expiry(now: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

impl LocalIdentity {
    pub fn new(config: &IdentityConfig) -> Result<Self, AuthError> {
        let secret = config.jwt_secret.as_bytes();
        if secret.is_empty() {
            return Err(AuthError::Config("JWT_SECRET must be set for local authentication".to_string()));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            access_ttl: ttl("AUTH_ACCESS_TOKEN_TTL_SECS", config.access_token_ttl_secs)?,
            refresh_ttl: ttl("AUTH_REFRESH_TOKEN_TTL_SECS", config.refresh_token_ttl_secs)?,
            state: RwLock::new(LocalState::default()),
        })
    }

    fn issue_access_token(&self, user: &AuthUser) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            iat: now.timestamp(),
            exp: expiry(now, self.access_ttl).timestamp(),
            jti: Uuid::new_v4(),
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?)
    }

    fn decode_access_token(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    /// Issue a fresh session and record its refresh token
    fn open_session(&self, state: &mut LocalState, user: AuthUser) -> Result<Session, AuthError> {
        let access_token = self.issue_access_token(&user)?;
        let refresh_token = Uuid::new_v4().simple().to_string();
        let now = Utc::now();
        state.refresh_tokens.retain(|_, grant| grant.expires_at > now);
        state.refresh_tokens.insert(
            refresh_token.clone(),
            RefreshGrant {
                user_id: user.id,
                expires_at: expiry(now, self.refresh_ttl),
            },
        );

        Ok(Session {
            access_token,
            refresh_token,
            expires_in: self.access_ttl.num_seconds().max(0) as u64,
            token_type: "bearer".to_string(),
            user,
        })
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentity {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUp, AuthError> {
        let key = email.trim().to_lowercase();
        let mut state = self.state.write().await;
        if state.accounts.contains_key(&key) {
            return Err(AuthError::Rejected("User already registered".to_string()));
        }

        let salt = Uuid::new_v4().simple().to_string();
        let account = Account {
            id: Uuid::new_v4(),
            email: key.clone(),
            password_hash: hash_password(&salt, password),
            salt,
        };
        let user = AuthUser {
            id: account.id,
            email: Some(account.email.clone()),
        };
        state.accounts.insert(key, account);

        let session = self.open_session(&mut state, user.clone())?;
        info!("Local account created for {}", user.id);
        Ok(SignUp {
            user,
            session: Some(session),
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let key = email.trim().to_lowercase();
        let mut state = self.state.write().await;
        let user = match state.accounts.get(&key) {
            Some(account) if hash_password(&account.salt, password) == account.password_hash => AuthUser {
                id: account.id,
                email: Some(account.email.clone()),
            },
            _ => return Err(AuthError::InvalidCredentials),
        };
        self.open_session(&mut state, user)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Session, AuthError> {
        let mut state = self.state.write().await;
        let grant = state
            .refresh_tokens
            .remove(refresh_token)
            .ok_or_else(|| AuthError::InvalidToken("unknown refresh token".to_string()))?;
        if grant.expires_at <= Utc::now() {
            return Err(AuthError::InvalidToken("refresh token expired".to_string()));
        }

        let user = state
            .accounts
            .values()
            .find(|a| a.id == grant.user_id)
            .map(|a| AuthUser {
                id: a.id,
                email: Some(a.email.clone()),
            })
            .ok_or_else(|| AuthError::InvalidToken("account no longer exists".to_string()))?;
        self.open_session(&mut state, user)
    }

    async fn get_user(&self, access_token: &str) -> Result<AuthUser, AuthError> {
        let claims = self.decode_access_token(access_token)?;
        Ok(AuthUser {
            id: claims.sub,
            email: claims.email,
        })
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let claims = self.decode_access_token(access_token)?;
        let mut state = self.state.write().await;
        state.refresh_tokens.retain(|_, grant| grant.user_id != claims.sub);
        Ok(())
    }
}
