// handlers/protected/stocks.rs - /api/stocks

use axum::{
    extract::{Path, State},
    Extension,
};
use serde_json::{json, Value};
use tracing::info;

use super::utils::load_owned;
use crate::database::models::{NewStock, Stock, StockUpdate};
use crate::middleware::{ApiResponse, ApiResult, AuthUser, JsonBody};
use crate::state::AppState;

pub async fn stocks_list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<Stock>> {
    let stocks = state.repo::<Stock>().list_for(user.id).await?;
    Ok(ApiResponse::list(stocks))
}

/// POST /api/stocks - Add a holding
///
/// ```json
/// { "ticker": "aapl", "shares": 3, "purchase_price": 150.25, "broker": "fidelity" }
/// ```
///
/// The ticker is stored upper-cased; `current_price` defaults to the purchase
/// price and `purchase_date` to today.
pub async fn stock_create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    JsonBody(body): JsonBody<NewStock>,
) -> ApiResult<Stock> {
    let stock = body.into_stock(user.id)?;
    let stock = state.repo::<Stock>().create(&stock).await?;
    info!("Stock added: {} x{} ({})", stock.ticker, stock.shares, stock.id);

    Ok(ApiResponse::created(stock).with_message("Stock added"))
}

pub async fn stock_get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Stock> {
    let stock = load_owned(&state.repo::<Stock>(), &id, &user, "Stock").await?;
    Ok(ApiResponse::success(stock))
}

pub async fn stock_update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<StockUpdate>,
) -> ApiResult<Stock> {
    let repo = state.repo::<Stock>();
    let mut stock = load_owned(&repo, &id, &user, "Stock").await?;
    body.apply(&mut stock)?;
    let stock = repo.save(&stock).await?;
    info!("Stock updated: {}", stock.id);

    Ok(ApiResponse::success(stock).with_message("Stock updated"))
}

pub async fn stock_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let repo = state.repo::<Stock>();
    let stock = load_owned(&repo, &id, &user, "Stock").await?;
    repo.delete(stock.id).await?;
    info!("Stock deleted: {}", stock.id);

    Ok(ApiResponse::success(json!({ "id": stock.id })).with_message("Stock deleted"))
}
