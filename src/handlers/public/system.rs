// handlers/public/system.rs - Service banner, health and client configuration

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET / - Service banner with an index of the API
pub async fn root() -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({
        "name": "Affiliate AI Pro Backend API",
        "status": "running",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/api/health (public)",
            "auth": "/api/auth/signup, /api/auth/login, /api/auth/refresh (public); /api/auth/logout (protected)",
            "campaigns": "/api/campaigns[/:id] (protected)",
            "transactions": "/api/transactions[/summary] (protected)",
            "stocks": "/api/stocks[/:id] (protected)",
            "learning": "/api/learning[/:id] (protected)",
            "preferences": "/api/preferences (protected)",
            "payments": "/api/payments[/:id[/verify]] (protected)",
            "external_stocks": "/api/external-stocks/* (protected)",
            "paypal_config": "/api/paypal-config (public)",
        }
    })))
}

/// GET /api/health - Liveness plus a store ping
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();
    let backend = state.store.backend();

    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Backend is running!",
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "store": backend,
                    "identity": state.identity.name(),
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "Service Unavailable",
                    "code": "SERVICE_UNAVAILABLE",
                    "message": "Store unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "store": backend,
                    }
                })),
            )
        }
    }
}

/// GET /api/paypal-config - Receiving account for the frontend checkout
///
/// ```json
/// { "success": true, "data": { "paypalEmail": "billing@example.com", "clientId": "configured" } }
/// ```
pub async fn paypal_config(State(state): State<AppState>) -> ApiResult<Value> {
    let payments = &state.config.payments;
    let client_id = if payments.paypal_client_id.is_some() {
        "configured"
    } else {
        "not-configured"
    };

    Ok(ApiResponse::success(json!({
        "paypalEmail": payments.paypal_email,
        "clientId": client_id,
    })))
}
