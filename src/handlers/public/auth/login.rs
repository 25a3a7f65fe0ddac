// handlers/public/auth/login.rs - POST /api/auth/login handler

use axum::extract::State;
use serde::Serialize;
use tracing::{info, warn};

use super::Credentials;
use crate::auth::{AuthError, AuthUser, Session};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, JsonBody};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: AuthUser,
    pub session: Session,
}

/// POST /api/auth/login - Exchange email and password for a session
///
/// Expected Output (Success):
/// ```json
/// {
///   "success": true,
///   "message": "Login successful",
///   "data": {
///     "user": { "id": "uuid", "email": "ada@example.com" },
///     "session": { "access_token": "...", "refresh_token": "...", "expires_in": 3600, "token_type": "bearer", "user": { } }
///   }
/// }
/// ```
pub async fn login_post(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<Credentials>,
) -> ApiResult<LoginResponse> {
    let (email, password) = body.required()?;

    let session = state.identity.sign_in(&email, &password).await.map_err(|e| match e {
        AuthError::InvalidCredentials => {
            warn!("Failed login attempt");
            ApiError::unauthorized("Invalid email or password")
        }
        other => other.into(),
    })?;
    info!("Login successful: {}", session.user.id);

    Ok(ApiResponse::success(LoginResponse {
        user: session.user.clone(),
        session,
    })
    .with_message("Login successful"))
}
