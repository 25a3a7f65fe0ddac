// handlers/protected/campaigns.rs - /api/campaigns

use axum::{
    extract::{Path, State},
    Extension,
};
use serde_json::{json, Value};
use tracing::info;

use super::utils::load_owned;
use crate::database::models::{Campaign, CampaignUpdate, NewCampaign};
use crate::middleware::{ApiResponse, ApiResult, AuthUser, JsonBody};
use crate::state::AppState;

/// GET /api/campaigns - Caller's campaigns, newest first
pub async fn campaigns_list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<Campaign>> {
    let campaigns = state.repo::<Campaign>().list_for(user.id).await?;
    Ok(ApiResponse::list(campaigns))
}

/// POST /api/campaigns - Create a campaign
///
/// Expected Input:
/// ```json
/// {
///   "name": "Spring promo",        // Required
///   "platform": "instagram",       // Required: instagram, facebook, tiktok, twitter, youtube, linkedin, pinterest
///   "affiliate_link": "https://...",
///   "clicks": 0, "conversions": 0, "earnings": 0,
///   "status": "draft",
///   "tags": ["spring"]
/// }
/// ```
pub async fn campaign_create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    JsonBody(body): JsonBody<NewCampaign>,
) -> ApiResult<Campaign> {
    let campaign = body.into_campaign(user.id)?;
    let campaign = state.repo::<Campaign>().create(&campaign).await?;
    info!("Campaign created: {} ({})", campaign.name, campaign.id);

    Ok(ApiResponse::created(campaign).with_message("Campaign created"))
}

/// GET /api/campaigns/:id
pub async fn campaign_get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Campaign> {
    let campaign = load_owned(&state.repo::<Campaign>(), &id, &user, "Campaign").await?;
    Ok(ApiResponse::success(campaign))
}

/// PUT /api/campaigns/:id - Merge the provided fields into the campaign
pub async fn campaign_update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<CampaignUpdate>,
) -> ApiResult<Campaign> {
    let repo = state.repo::<Campaign>();
    let mut campaign = load_owned(&repo, &id, &user, "Campaign").await?;
    body.apply(&mut campaign)?;
    let campaign = repo.save(&campaign).await?;
    info!("Campaign updated: {}", campaign.id);

    Ok(ApiResponse::success(campaign).with_message("Campaign updated"))
}

/// DELETE /api/campaigns/:id
pub async fn campaign_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let repo = state.repo::<Campaign>();
    let campaign = load_owned(&repo, &id, &user, "Campaign").await?;
    repo.delete(campaign.id).await?;
    info!("Campaign deleted: {}", campaign.id);

    Ok(ApiResponse::success(json!({ "id": campaign.id })).with_message("Campaign deleted"))
}
