// handlers/protected/preferences.rs - /api/preferences

use axum::{extract::State, Extension};
use tracing::info;

use crate::database::models::{PreferencesUpdate, UserPreferences};
use crate::middleware::{ApiResponse, ApiResult, AuthUser, JsonBody};
use crate::state::AppState;

/// GET /api/preferences - Stored preferences, or the defaults before the first save
pub async fn preferences_get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<UserPreferences> {
    let prefs = state
        .repo::<UserPreferences>()
        .find(user.id)
        .await?
        .unwrap_or_else(|| UserPreferences::defaults(user.id));
    Ok(ApiResponse::success(prefs))
}

/// PUT /api/preferences - Merge the provided fields and upsert
///
/// ```json
/// { "theme": "light", "currency": "EUR" }
/// ```
pub async fn preferences_put(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    JsonBody(body): JsonBody<PreferencesUpdate>,
) -> ApiResult<UserPreferences> {
    let repo = state.repo::<UserPreferences>();
    let mut prefs = repo
        .find(user.id)
        .await?
        .unwrap_or_else(|| UserPreferences::defaults(user.id));
    body.apply(&mut prefs)?;
    let prefs = repo.upsert(&prefs).await?;
    info!("Preferences updated for {}", user.id);

    Ok(ApiResponse::success(prefs).with_message("Preferences updated"))
}
