use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use super::{AuthError, AuthUser, IdentityProvider, Session, SignUp};
use crate::config::IdentityConfig;

/// Supabase GoTrue over REST
pub struct SupabaseIdentity {
    client: Client,
    base_url: String,
    anon_key: String,
}

/// GoTrue answers signup with a session, or with the bare user when email
/// confirmation is pending
#[derive(Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(Session),
    User(AuthUser),
}

/// Pull a readable message out of a GoTrue error body
fn error_message(body: &Value) -> String {
    ["msg", "error_description", "message", "error"]
        .iter()
        .find_map(|k| body.get(*k).and_then(Value::as_str))
        .unwrap_or("Request rejected by identity provider")
        .to_string()
}

impl SupabaseIdentity {
    pub fn new(config: &IdentityConfig) -> Result<Self, AuthError> {
        let (Some(url), Some(key)) = (config.supabase_url.as_deref(), config.supabase_anon_key.as_deref()) else {
            return Err(AuthError::Config("SUPABASE_URL and SUPABASE_ANON_KEY are required".to_string()));
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: url.trim_end_matches('/').to_string(),
            anon_key: key.to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    /// Split a response into its JSON body, or an error body with its status
    async fn read(response: Response) -> Result<Value, (StatusCode, Value)> {
        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);
        if status.is_success() {
            Ok(body)
        } else {
            debug!("GoTrue answered {}: {}", status, body);
            Err((status, body))
        }
    }

    fn upstream(status: StatusCode, body: &Value) -> AuthError {
        AuthError::Upstream(format!("{}: {}", status, error_message(body)))
    }

    fn parse<T: for<'de> Deserialize<'de>>(body: Value) -> Result<T, AuthError> {
        serde_json::from_value(body).map_err(|e| AuthError::Upstream(format!("unexpected response: {}", e)))
    }
}

#[async_trait]
impl IdentityProvider for SupabaseIdentity {
    fn name(&self) -> &'static str {
        "supabase"
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUp, AuthError> {
        let response = self
            .client
            .post(self.endpoint("signup"))
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        match Self::read(response).await {
            Ok(body) => Ok(match Self::parse::<SignUpResponse>(body)? {
                SignUpResponse::Session(session) => SignUp {
                    user: session.user.clone(),
                    session: Some(session),
                },
                SignUpResponse::User(user) => SignUp { user, session: None },
            }),
            Err((status, body)) if status.is_client_error() => Err(AuthError::Rejected(error_message(&body))),
            Err((status, body)) => Err(Self::upstream(status, &body)),
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let response = self
            .client
            .post(self.endpoint("token?grant_type=password"))
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        match Self::read(response).await {
            Ok(body) => Self::parse(body),
            Err((status, _)) if status.is_client_error() => Err(AuthError::InvalidCredentials),
            Err((status, body)) => Err(Self::upstream(status, &body)),
        }
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Session, AuthError> {
        let response = self
            .client
            .post(self.endpoint("token?grant_type=refresh_token"))
            .header("apikey", &self.anon_key)
            .json(&json!({ "refresh_token": refresh_token }))
            .send()
            .await?;

        match Self::read(response).await {
            Ok(body) => Self::parse(body),
            Err((status, body)) if status.is_client_error() => Err(AuthError::InvalidToken(error_message(&body))),
            Err((status, body)) => Err(Self::upstream(status, &body)),
        }
    }

    async fn get_user(&self, access_token: &str) -> Result<AuthUser, AuthError> {
        let response = self
            .client
            .get(self.endpoint("user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        match Self::read(response).await {
            Ok(body) => Self::parse(body),
            Err((status, body)) if status.is_client_error() => Err(AuthError::InvalidToken(error_message(&body))),
            Err((status, body)) => Err(Self::upstream(status, &body)),
        }
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let response = self
            .client
            .post(self.endpoint("logout"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        match Self::read(response).await {
            Ok(_) => Ok(()),
            Err((status, body)) if status.is_client_error() => Err(AuthError::InvalidToken(error_message(&body))),
            Err((status, body)) => Err(Self::upstream(status, &body)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn requires_url_and_key() {
        let config = AppConfig::development().identity;
        assert!(matches!(SupabaseIdentity::new(&config), Err(AuthError::Config(_))));
    }

    #[test]
    fn endpoint_strips_trailing_slash() {
        let mut config = AppConfig::development().identity;
        config.supabase_url = Some("https://abc.supabase.co/".into());
        config.supabase_anon_key = Some("anon".into());
        let identity = SupabaseIdentity::new(&config).unwrap();
        assert_eq!(identity.endpoint("user"), "https://abc.supabase.co/auth/v1/user");
    }

    #[test]
    fn signup_response_distinguishes_session_from_user() {
        let user_only = json!({ "id": "6f1c1b9e-3c0e-4f5e-9a53-0d2b8f7a1e11", "email": "a@b.co", "aud": "authenticated" });
        assert!(matches!(
            serde_json::from_value::<SignUpResponse>(user_only).unwrap(),
            SignUpResponse::User(_)
        ));

        let session = json!({
            "access_token": "a",
            "refresh_token": "r",
            "expires_in": 3600,
            "token_type": "bearer",
            "user": { "id": "6f1c1b9e-3c0e-4f5e-9a53-0d2b8f7a1e11", "email": "a@b.co" }
        });
        assert!(matches!(
            serde_json::from_value::<SignUpResponse>(session).unwrap(),
            SignUpResponse::Session(_)
        ));
    }

    #[test]
    fn error_message_prefers_msg() {
        assert_eq!(error_message(&json!({ "msg": "User already registered" })), "User already registered");
        assert_eq!(
            error_message(&json!({ "error": "invalid_grant", "error_description": "Invalid login credentials" })),
            "Invalid login credentials"
        );
        assert_eq!(error_message(&Value::Null), "Request rejected by identity provider");
    }
}
