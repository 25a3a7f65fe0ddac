pub mod provider;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

pub use provider::HttpMarketData;

/// Most recent dividend events returned per symbol
pub const MAX_DIVIDENDS: usize = 30;

#[derive(Debug, Error)]
pub enum MarketError {
    #[error("market data provider is not configured")]
    NotConfigured,

    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    /// The provider answered with an explicit error message
    #[error("{0}")]
    Provider(String),

    #[error("no quote found for symbol {0}")]
    SymbolNotFound(String),

    #[error(transparent)]
    InvalidUrl(#[from] url::ParseError),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DividendEvent {
    pub date: String,
    pub dividend: f64,
}

/// Read-only access to an external quote provider
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Latest quote, passed through in the provider's own shape
    async fn quote(&self, symbol: &str) -> Result<Value, MarketError>;

    /// Dividend payouts, newest first
    async fn dividends(&self, symbol: &str) -> Result<Vec<DividendEvent>, MarketError>;
}

/// Dividend days from an Alpha Vantage `TIME_SERIES_DAILY_ADJUSTED` payload
pub fn extract_dividends(payload: &Value) -> Vec<DividendEvent> {
    let Some(series) = payload.get("Time Series (Daily)").and_then(Value::as_object) else {
        return Vec::new();
    };

    let mut dates: Vec<&String> = series.keys().collect();
    dates.sort_unstable_by(|a, b| b.cmp(a));

    dates
        .into_iter()
        .filter_map(|date| {
            let amount = series[date]
                .get("7. dividend amount")
                .and_then(|v| match v {
                    Value::String(s) => s.parse::<f64>().ok(),
                    other => other.as_f64(),
                })
                .unwrap_or(0.0);
            (amount > 0.0).then(|| DividendEvent {
                date: date.clone(),
                dividend: amount,
            })
        })
        .take(MAX_DIVIDENDS)
        .collect()
}

/// Static OTC list served by /api/external-stocks/penny-list
pub fn penny_list() -> Value {
    json!({
        "source": "demo",
        "data": [
            { "symbol": "ABCD", "name": "ACME BioTech", "price": 0.42, "exchange": "OTC" },
            { "symbol": "WXYZ", "name": "WinZoom Inc", "price": 0.85, "exchange": "OTC" },
            { "symbol": "PENN", "name": "PennyPlay Ltd", "price": 0.33, "exchange": "OTC" }
        ]
    })
}

/// Static movers served by /api/external-stocks/penny-stocks
pub fn penny_stocks() -> Value {
    json!({
        "penny_stocks": [
            { "symbol": "SNDL", "name": "Sundial Growers Inc.", "price": 1.42, "change": -2.8 },
            { "symbol": "PROG", "name": "Progenity, Inc.", "price": 0.68, "change": 5.2 },
            { "symbol": "BBIG", "name": "Vinco Ventures, Inc.", "price": 0.12, "change": -8.1 }
        ]
    })
}
