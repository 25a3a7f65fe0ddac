// handlers/public/auth/refresh.rs - POST /api/auth/refresh handler

use axum::extract::State;
use serde::Deserialize;
use tracing::{info, warn};

use crate::auth::{AuthError, Session};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, JsonBody};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

/// POST /api/auth/refresh - Trade a refresh token for a new session
pub async fn refresh_post(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RefreshRequest>,
) -> ApiResult<Session> {
    let refresh_token = body
        .refresh_token
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Refresh token is required"))?;

    let session = state.identity.refresh(&refresh_token).await.map_err(|e| match e {
        AuthError::InvalidToken(reason) => {
            warn!("Refresh rejected: {}", reason);
            ApiError::unauthorized("Invalid refresh token")
        }
        other => other.into(),
    })?;
    info!("Token refreshed for {}", session.user.id);

    Ok(ApiResponse::success(session))
}
