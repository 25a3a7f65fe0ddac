// handlers/protected/learning.rs - /api/learning

use axum::{
    extract::{Path, State},
    Extension,
};
use serde_json::{json, Value};
use tracing::info;

use super::utils::load_owned;
use crate::database::models::{LearningModule, LearningUpdate, NewLearningModule};
use crate::middleware::{ApiResponse, ApiResult, AuthUser, JsonBody};
use crate::state::AppState;

pub async fn learning_list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<LearningModule>> {
    let modules = state.repo::<LearningModule>().list_for(user.id).await?;
    Ok(ApiResponse::list(modules))
}

/// POST /api/learning - Track a new learning module
///
/// ```json
/// { "title": "Options basics", "platform": "coursera", "progress": 10, "target_completion": "2024-09-01" }
/// ```
pub async fn learning_create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    JsonBody(body): JsonBody<NewLearningModule>,
) -> ApiResult<LearningModule> {
    let module = body.into_module(user.id)?;
    let module = state.repo::<LearningModule>().create(&module).await?;
    info!("Learning module created: {} ({})", module.title, module.id);

    Ok(ApiResponse::created(module).with_message("Learning module created"))
}

pub async fn learning_get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<LearningModule> {
    let module = load_owned(&state.repo::<LearningModule>(), &id, &user, "Learning module").await?;
    Ok(ApiResponse::success(module))
}

pub async fn learning_update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<LearningUpdate>,
) -> ApiResult<LearningModule> {
    let repo = state.repo::<LearningModule>();
    let mut module = load_owned(&repo, &id, &user, "Learning module").await?;
    body.apply(&mut module)?;
    let module = repo.save(&module).await?;
    info!("Learning module updated: {} ({}%)", module.id, module.progress);

    Ok(ApiResponse::success(module).with_message("Learning module updated"))
}

pub async fn learning_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let repo = state.repo::<LearningModule>();
    let module = load_owned(&repo, &id, &user, "Learning module").await?;
    repo.delete(module.id).await?;
    info!("Learning module deleted: {}", module.id);

    Ok(ApiResponse::success(json!({ "id": module.id })).with_message("Learning module deleted"))
}
