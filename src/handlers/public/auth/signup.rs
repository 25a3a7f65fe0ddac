// handlers/public/auth/signup.rs - POST /api/auth/signup handler

use axum::extract::State;
use tracing::info;

use super::Credentials;
use crate::auth::SignUp;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, JsonBody};
use crate::state::AppState;

/// POST /api/auth/signup - Register a new account
///
/// Expected Input:
/// ```json
/// { "email": "ada@example.com", "password": "at least 8 chars" }
/// ```
///
/// Answers 201 with `{ user, session }`. `session` is null when the identity
/// provider holds the account for email confirmation.
pub async fn signup_post(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<Credentials>,
) -> ApiResult<SignUp> {
    let (email, password) = body.required()?;

    let min = state.config.identity.min_password_length;
    if password.chars().count() < min {
        return Err(ApiError::invalid_field(
            "password",
            format!("Password must be at least {} characters", min),
        ));
    }

    let signup = state.identity.sign_up(&email, &password).await?;
    info!("New signup: {}", signup.user.id);

    Ok(ApiResponse::created(signup).with_message("User registered successfully"))
}
