mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn health_and_root_respond() -> Result<()> {
    let app = TestApp::spawn().await?;

    let (status, body) = app.get("/api/health", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["store"], "memory");

    let (status, body) = app.get("/", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["endpoints"]["campaigns"].is_string());
    Ok(())
}

#[tokio::test]
async fn unknown_route_is_json_404() -> Result<()> {
    let app = TestApp::spawn().await?;
    let (status, body) = app.get("/api/nope", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Route GET /api/nope not found");
    Ok(())
}

#[tokio::test]
async fn protected_routes_require_bearer_token() -> Result<()> {
    let app = TestApp::spawn().await?;

    for path in [
        "/api/campaigns",
        "/api/transactions",
        "/api/transactions/summary",
        "/api/stocks",
        "/api/learning",
        "/api/preferences",
        "/api/payments",
        "/api/external-stocks/penny-list",
        "/api/external-stocks/subscriptions",
    ] {
        let (status, body) = app.get(path, None).await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", path);
        assert_eq!(body["success"], false);
    }

    let (status, body) = app.get("/api/campaigns", Some("not-a-real-token")).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid or expired token");
    Ok(())
}

#[tokio::test]
async fn signup_validates_input() -> Result<()> {
    let app = TestApp::spawn().await?;

    let (status, body) = app
        .post("/api/auth/signup", None, json!({ "email": "short@example.com", "password": "short" }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Password must be at least 8 characters");

    let (status, body) = app.post("/api/auth/signup", None, json!({ "email": "x@example.com" })).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email and password are required");

    let user = app.user().await?;
    let (status, _) = app
        .post("/api/auth/signup", None, json!({ "email": user.email, "password": "password123" }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn login_accepts_right_password_only() -> Result<()> {
    let app = TestApp::spawn().await?;
    let user = app.user().await?;

    let (status, body) = app
        .post("/api/auth/login", None, json!({ "email": user.email, "password": "wrong-password" }))
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid email or password");

    let (status, body) = app
        .post("/api/auth/login", None, json!({ "email": user.email, "password": "password123" }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["id"], user.id.as_str());
    let token = body["data"]["session"]["access_token"].as_str().unwrap_or_default();

    let (status, _) = app.get("/api/campaigns", Some(token)).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn refresh_issues_new_access_token() -> Result<()> {
    let app = TestApp::spawn().await?;
    let user = app.user().await?;

    let (status, body) = app
        .post("/api/auth/refresh", None, json!({ "refresh_token": user.refresh_token }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    let new_token = body["data"]["access_token"].as_str().unwrap_or_default().to_string();
    assert!(!new_token.is_empty());
    assert_ne!(new_token, user.token);

    let (status, _) = app.get("/api/campaigns", Some(&new_token)).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .post("/api/auth/refresh", None, json!({ "refresh_token": "bogus" }))
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid refresh token");

    let (status, _) = app.post("/api/auth/refresh", None, json!({})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn logout_revokes_refresh_token() -> Result<()> {
    let app = TestApp::spawn().await?;
    let user = app.user().await?;

    let (status, body) = app.post("/api/auth/logout", Some(&user.token), json!({})).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Logged out successfully");

    let (status, _) = app
        .post("/api/auth/refresh", None, json!({ "refresh_token": user.refresh_token }))
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn paypal_config_is_public() -> Result<()> {
    let app = TestApp::spawn().await?;
    let (status, body) = app.get("/api/paypal-config", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["paypalEmail"], "billing@example.com");
    assert_eq!(body["data"]["clientId"], "not-configured");
    Ok(())
}
