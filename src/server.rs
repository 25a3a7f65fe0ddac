use axum::{
    extract::{DefaultBodyLimit, Request},
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::config::SecurityConfig;
use crate::error::ApiError;
use crate::handlers::{protected, public};
use crate::middleware::require_auth;
use crate::state::AppState;

/// Full HTTP surface with global middleware applied
pub fn app(state: AppState) -> Router {
    let max_body = state.config.api.max_request_size_bytes;
    let cors = cors_layer(&state.config.security);

    let router = Router::new()
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .fallback(fallback)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(max_body)),
        );

    match cors {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

fn public_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/", get(public::root))
        .route("/api/health", get(public::health))
        .route("/api/paypal-config", get(public::paypal_config))
        // Token acquisition
        .route("/api/auth/signup", post(auth::signup_post))
        .route("/api/auth/login", post(auth::login_post))
        .route("/api/auth/refresh", post(auth::refresh_post))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use protected::{
        auth, campaigns, external_stocks as ext, learning, payments, preferences, stocks, transactions,
    };

    Router::new()
        .route("/api/auth/logout", post(auth::logout_post))
        // Campaigns
        .route(
            "/api/campaigns",
            get(campaigns::campaigns_list).post(campaigns::campaign_create),
        )
        .route(
            "/api/campaigns/:id",
            get(campaigns::campaign_get)
                .put(campaigns::campaign_update)
                .delete(campaigns::campaign_delete),
        )
        // Transactions
        .route(
            "/api/transactions",
            get(transactions::transactions_list).post(transactions::transaction_create),
        )
        .route("/api/transactions/summary", get(transactions::transactions_summary))
        // Stock holdings
        .route("/api/stocks", get(stocks::stocks_list).post(stocks::stock_create))
        .route(
            "/api/stocks/:id",
            get(stocks::stock_get)
                .put(stocks::stock_update)
                .delete(stocks::stock_delete),
        )
        // Learning modules
        .route(
            "/api/learning",
            get(learning::learning_list).post(learning::learning_create),
        )
        .route(
            "/api/learning/:id",
            get(learning::learning_get)
                .put(learning::learning_update)
                .delete(learning::learning_delete),
        )
        // Preferences
        .route(
            "/api/preferences",
            get(preferences::preferences_get).put(preferences::preferences_put),
        )
        // Payments
        .route(
            "/api/payments",
            get(payments::payments_list).post(payments::payment_create),
        )
        .route(
            "/api/payments/:id",
            get(payments::payment_get)
                .put(payments::payment_update)
                .delete(payments::payment_delete),
        )
        .route("/api/payments/:id/verify", post(payments::payment_verify))
        // External market data
        .route("/api/external-stocks/quote/:symbol", get(ext::quote_get))
        .route("/api/external-stocks/dividends/:symbol", get(ext::dividends_get))
        .route("/api/external-stocks/penny-list", get(ext::penny_list))
        .route("/api/external-stocks/penny-stocks", get(ext::penny_stocks))
        .route("/api/external-stocks/subscribe", post(ext::subscribe_post))
        .route("/api/external-stocks/subscriptions", get(ext::subscriptions_list))
        .route(
            "/api/external-stocks/subscriptions/:id/notify",
            post(ext::subscription_notify),
        )
        .route_layer(from_fn_with_state(state, require_auth))
}

fn cors_layer(security: &SecurityConfig) -> Option<CorsLayer> {
    if !security.enable_cors {
        return None;
    }

    if security.cors_origins.iter().any(|o| o == "*") {
        return Some(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any),
    )
}

async fn fallback(request: Request) -> ApiError {
    ApiError::not_found(format!(
        "Route {} {} not found",
        request.method(),
        request.uri().path()
    ))
}
