// handlers/protected/auth.rs - Session management for authenticated users

use axum::{extract::State, Extension};
use tracing::info;

use crate::middleware::{ApiResponse, ApiResult, AuthUser, BearerToken};
use crate::state::AppState;

/// POST /api/auth/logout - End the caller's session at the identity provider
pub async fn logout_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Extension(BearerToken(token)): Extension<BearerToken>,
) -> ApiResult<()> {
    state.identity.sign_out(&token).await?;
    info!("Logout: {}", user.id);

    Ok(ApiResponse::success(()).with_message("Logged out successfully"))
}
