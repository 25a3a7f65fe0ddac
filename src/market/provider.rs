use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use super::{extract_dividends, DividendEvent, MarketData, MarketError};
use crate::config::{MarketConfig, MarketProvider};

/// Quote and dividend lookups against Alpha Vantage or Finnhub
pub struct HttpMarketData {
    client: Client,
    provider: Option<MarketProvider>,
    provider_name: String,
    base_url: String,
    api_key: String,
}

impl HttpMarketData {
    pub fn new(config: &MarketConfig) -> Result<Self, MarketError> {
        let (true, Some(base_url), Some(api_key)) =
            (config.is_configured(), config.base_url.clone(), config.api_key.clone())
        else {
            return Err(MarketError::NotConfigured);
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            provider: config.provider(),
            provider_name: config.provider.clone(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn provider(&self) -> Result<MarketProvider, MarketError> {
        self.provider
            .ok_or_else(|| MarketError::UnknownProvider(self.provider_name.clone()))
    }

    fn alpha_vantage_url(&self, function: &str, symbol: &str) -> Result<Url, MarketError> {
        Ok(Url::parse_with_params(
            &self.base_url,
            &[("function", function), ("symbol", symbol), ("apikey", self.api_key.as_str())],
        )?)
    }

    fn finnhub_url(&self, symbol: &str) -> Result<Url, MarketError> {
        Ok(Url::parse_with_params(
            &format!("{}/quote", self.base_url),
            &[("symbol", symbol), ("token", self.api_key.as_str())],
        )?)
    }

    async fn get_json(&self, url: Url) -> Result<Value, MarketError> {
        debug!("Market data request to {}", url.path());
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.json().await?)
    }
}

/// Interpret an Alpha Vantage `GLOBAL_QUOTE` body
fn global_quote(symbol: &str, mut body: Value) -> Result<Value, MarketError> {
    if let Some(message) = body.get("Error Message").and_then(Value::as_str) {
        return Err(MarketError::Provider(message.to_string()));
    }
    // Unknown symbols come back as an empty "Global Quote" object
    match body.get_mut("Global Quote").map(Value::take) {
        Some(quote) if quote.as_object().is_some_and(|q| !q.is_empty()) => Ok(quote),
        _ => Err(MarketError::SymbolNotFound(symbol.to_string())),
    }
}

#[async_trait]
impl MarketData for HttpMarketData {
    async fn quote(&self, symbol: &str) -> Result<Value, MarketError> {
        info!("Fetching live quote for {}", symbol);
        match self.provider()? {
            MarketProvider::AlphaVantage => {
                let body = self.get_json(self.alpha_vantage_url("GLOBAL_QUOTE", symbol)?).await?;
                global_quote(symbol, body)
            }
            MarketProvider::Finnhub => self.get_json(self.finnhub_url(symbol)?).await,
        }
    }

    async fn dividends(&self, symbol: &str) -> Result<Vec<DividendEvent>, MarketError> {
        info!("Fetching dividend history for {}", symbol);
        let body = self
            .get_json(self.alpha_vantage_url("TIME_SERIES_DAILY_ADJUSTED", symbol)?)
            .await?;
        if let Some(message) = body.get("Error Message").and_then(Value::as_str) {
            return Err(MarketError::Provider(message.to_string()));
        }
        Ok(extract_dividends(&body))
    }
}
