// handlers/protected/external_stocks.rs - /api/external-stocks
//
// Thin proxy to the configured market-data provider plus stored (never
// dispatched) notification subscriptions.

use axum::{
    extract::{Path, State},
    Extension,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use super::utils::load_owned;
use crate::database::models::{NewSubscription, StockSubscription};
use crate::error::ApiError;
use crate::market::{self, DividendEvent};
use crate::middleware::{ApiResponse, ApiResult, AuthUser, JsonBody};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DividendHistory {
    pub symbol: String,
    pub dividends: Vec<DividendEvent>,
}

fn normalize_symbol(raw: &str) -> Result<String, ApiError> {
    let symbol = raw.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(ApiError::invalid_field("symbol", "Symbol is required"));
    }
    Ok(symbol)
}

/// GET /api/external-stocks/quote/:symbol - Live quote in the provider's shape
pub async fn quote_get(State(state): State<AppState>, Path(symbol): Path<String>) -> ApiResult<Value> {
    let symbol = normalize_symbol(&symbol)?;
    let quote = state.market()?.quote(&symbol).await?;
    Ok(ApiResponse::success(quote))
}

/// GET /api/external-stocks/dividends/:symbol - Up to 30 most recent dividend payouts
pub async fn dividends_get(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> ApiResult<DividendHistory> {
    let symbol = normalize_symbol(&symbol)?;
    let dividends = state.market()?.dividends(&symbol).await?;
    Ok(ApiResponse::success(DividendHistory { symbol, dividends }))
}

/// GET /api/external-stocks/penny-list
pub async fn penny_list() -> ApiResult<Value> {
    Ok(ApiResponse::success(market::penny_list()))
}

/// GET /api/external-stocks/penny-stocks
pub async fn penny_stocks() -> ApiResult<Value> {
    Ok(ApiResponse::success(market::penny_stocks()))
}

/// POST /api/external-stocks/subscribe - Store a price/dividend notification request
///
/// ```json
/// { "symbol": "KO", "frequency": "weekly", "callbackUrl": "https://example.com/hook", "calendar": "google" }
/// ```
pub async fn subscribe_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    JsonBody(body): JsonBody<NewSubscription>,
) -> ApiResult<StockSubscription> {
    let subscription = body.into_subscription(user.id)?;
    let subscription = state.repo::<StockSubscription>().create(&subscription).await?;
    info!("New subscription {} for {}", subscription.id, subscription.symbol);

    Ok(ApiResponse::created(subscription).with_message("Subscription created"))
}

pub async fn subscriptions_list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<StockSubscription>> {
    let subscriptions = state.repo::<StockSubscription>().list_for(user.id).await?;
    Ok(ApiResponse::list(subscriptions))
}

/// POST /api/external-stocks/subscriptions/:id/notify - Log a test notification
pub async fn subscription_notify(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let subscription = load_owned(&state.repo::<StockSubscription>(), &id, &user, "Subscription").await?;
    info!(
        "Test notification for subscription {} (symbol: {})",
        subscription.id, subscription.symbol
    );

    Ok(ApiResponse::success(json!({ "subscription": subscription }))
        .with_message("Notification triggered (demo)"))
}
