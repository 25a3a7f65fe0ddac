mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn stocks_crud() -> Result<()> {
    let app = TestApp::spawn().await?;
    let user = app.user().await?;

    let (status, body) = app
        .post(
            "/api/stocks",
            Some(&user.token),
            json!({ "ticker": "aapl", "shares": 3, "purchase_price": 150.25 }),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    let stock = &body["data"];
    assert_eq!(stock["ticker"], "AAPL");
    assert_eq!(stock["current_price"], 150.25);
    assert_eq!(stock["broker"], "unknown");
    let path = format!("/api/stocks/{}", stock["id"].as_str().unwrap());

    let (status, body) = app.put(&path, Some(&user.token), json!({ "current_price": 172.5 })).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["current_price"], 172.5);
    assert_eq!(body["data"]["shares"], 3.0);

    let (_, body) = app.get("/api/stocks", Some(&user.token)).await?;
    assert_eq!(body["count"], 1);

    let (status, _) = app.delete(&path, Some(&user.token)).await?;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = app.get("/api/stocks", Some(&user.token)).await?;
    assert_eq!(body["count"], 0);
    Ok(())
}

#[tokio::test]
async fn other_users_stocks_are_forbidden() -> Result<()> {
    let app = TestApp::spawn().await?;
    let owner = app.user().await?;
    let intruder = app.user().await?;

    let (_, body) = app
        .post(
            "/api/stocks",
            Some(&owner.token),
            json!({ "ticker": "KO", "shares": 10, "purchase_price": 60 }),
        )
        .await?;
    let path = format!("/api/stocks/{}", body["data"]["id"].as_str().unwrap());

    let (status, _) = app.get(&path, Some(&intruder.token)).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.put(&path, Some(&intruder.token), json!({ "shares": 1 })).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.delete(&path, Some(&intruder.token)).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.get(&path, Some(&owner.token)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["shares"], 10.0);
    Ok(())
}

#[tokio::test]
async fn stock_requires_positive_shares() -> Result<()> {
    let app = TestApp::spawn().await?;
    let user = app.user().await?;

    let (status, body) = app
        .post(
            "/api/stocks",
            Some(&user.token),
            json!({ "ticker": "KO", "shares": 0, "purchase_price": 60 }),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Shares must be a positive number");
    Ok(())
}

#[tokio::test]
async fn learning_progress_is_bounded() -> Result<()> {
    let app = TestApp::spawn().await?;
    let user = app.user().await?;

    let (status, body) = app
        .post("/api/learning", Some(&user.token), json!({ "title": "Rust basics" }))
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["progress"], 0);
    assert_eq!(body["data"]["platform"], "custom");
    let path = format!("/api/learning/{}", body["data"]["id"].as_str().unwrap());

    let (status, body) = app.put(&path, Some(&user.token), json!({ "progress": 120 })).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Progress must be between 0 and 100");

    let (status, body) = app
        .put(&path, Some(&user.token), json!({ "progress": 100, "status": "completed" }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["progress"], 100);
    assert_eq!(body["data"]["status"], "completed");
    assert_eq!(body["data"]["title"], "Rust basics");

    let other = app.user().await?;
    let (status, _) = app.get(&path, Some(&other.token)).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.put(&path, Some(&other.token), json!({ "progress": 5 })).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.delete(&path, Some(&other.token)).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, body) = app.get(&path, Some(&user.token)).await?;
    assert_eq!(body["data"]["progress"], 100);
    Ok(())
}

#[tokio::test]
async fn preferences_default_then_persist() -> Result<()> {
    let app = TestApp::spawn().await?;
    let user = app.user().await?;

    let (status, body) = app.get("/api/preferences", Some(&user.token)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["theme"], "dark");
    assert_eq!(body["data"]["currency"], "USD");
    assert_eq!(body["data"]["notifications_enabled"], true);

    let (status, body) = app
        .put("/api/preferences", Some(&user.token), json!({ "theme": "light", "currency": "eur" }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["theme"], "light");
    assert_eq!(body["data"]["currency"], "EUR");

    let (status, _) = app
        .put("/api/preferences", Some(&user.token), json!({ "theme": "neon" }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = app.get("/api/preferences", Some(&user.token)).await?;
    assert_eq!(body["data"]["theme"], "light");
    assert_eq!(body["data"]["currency"], "EUR");
    assert_eq!(body["data"]["language"], "en");
    assert_eq!(body["data"]["user_id"], user.id.as_str());

    // A second account still sees defaults
    let other = app.user().await?;
    let (_, body) = app.get("/api/preferences", Some(&other.token)).await?;
    assert_eq!(body["data"]["theme"], "dark");
    Ok(())
}
