#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use affiliate_api::auth::LocalIdentity;
use affiliate_api::config::AppConfig;
use affiliate_api::database::MemoryStore;
use affiliate_api::market::{DividendEvent, MarketData, MarketError};
use affiliate_api::{app, AppState};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};

/// Canned market data so quote/dividend routes never leave the process
pub struct StubMarket;

#[async_trait]
impl MarketData for StubMarket {
    async fn quote(&self, symbol: &str) -> Result<Value, MarketError> {
        if symbol == "NOPE" {
            return Err(MarketError::SymbolNotFound(symbol.to_string()));
        }
        Ok(json!({ "01. symbol": symbol, "05. price": "123.4500" }))
    }

    async fn dividends(&self, _symbol: &str) -> Result<Vec<DividendEvent>, MarketError> {
        Ok(vec![
            DividendEvent { date: "2024-03-15".into(), dividend: 0.24 },
            DividendEvent { date: "2023-12-15".into(), dividend: 0.23 },
        ])
    }
}

pub struct TestApp {
    pub base_url: String,
    pub client: reqwest::Client,
}

/// A signed-up account and its session tokens
pub struct TestUser {
    pub id: String,
    pub email: String,
    pub token: String,
    pub refresh_token: String,
}

impl TestApp {
    /// Serve the real router on a free port, backed by in-memory state
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with_market(Some(Arc::new(StubMarket) as Arc<dyn MarketData>)).await
    }

    pub async fn spawn_with_market(market: Option<Arc<dyn MarketData>>) -> Result<Self> {
        let mut config = AppConfig::development();
        config.payments.paypal_email = Some("billing@example.com".to_string());

        let identity = Arc::new(LocalIdentity::new(&config.identity)?);
        let state = AppState::new(config, identity, Arc::new(MemoryStore::new()), market);

        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app(state)).await;
        });

        let test_app = Self {
            base_url: format!("http://127.0.0.1:{}", port),
            client: reqwest::Client::new(),
        };
        test_app.wait_ready(Duration::from_secs(5)).await?;
        Ok(test_app)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(self.url("/api/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sign up a fresh account and return its session
    pub async fn user(&self) -> Result<TestUser> {
        let email = format!("user-{}@example.com", uuid::Uuid::new_v4().simple());
        let (status, body) = self
            .post("/api/auth/signup", None, json!({ "email": email, "password": "password123" }))
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "signup failed: {} {}", status, body);

        let session = &body["data"]["session"];
        Ok(TestUser {
            id: body["data"]["user"]["id"].as_str().context("user id")?.to_string(),
            email,
            token: session["access_token"].as_str().context("access token")?.to_string(),
            refresh_token: session["refresh_token"].as_str().context("refresh token")?.to_string(),
        })
    }

    async fn send(&self, request: reqwest::RequestBuilder, token: Option<&str>) -> Result<(StatusCode, Value)> {
        let request = match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request.send().await?;
        let status = response.status();
        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        Ok((status, body))
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        self.send(self.client.get(self.url(path)), token).await
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
        self.send(self.client.post(self.url(path)).json(&body), token).await
    }

    /// POST with no body at all
    pub async fn post_empty(&self, path: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        self.send(self.client.post(self.url(path)), token).await
    }

    pub async fn put(&self, path: &str, token: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
        self.send(self.client.put(self.url(path)).json(&body), token).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        self.send(self.client.delete(self.url(path)), token).await
    }
}
