mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

use common::{TestApp, TestUser};

async fn open_payment(app: &TestApp, user: &TestUser) -> Result<String> {
    let (status, body) = app
        .post(
            "/api/payments",
            Some(&user.token),
            json!({ "amount": 19.99, "description": "Pro plan", "orderId": "ORDER-1" }),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    Ok(body["data"]["id"].as_str().unwrap().to_string())
}

#[tokio::test]
async fn create_starts_pending_with_receiving_account() -> Result<()> {
    let app = TestApp::spawn().await?;
    let user = app.user().await?;

    let (status, body) = app
        .post("/api/payments", Some(&user.token), json!({ "amount": 5, "description": "Tip" }))
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    let payment = &body["data"];
    assert_eq!(payment["status"], "pending");
    assert_eq!(payment["paypalEmail"], "billing@example.com");
    assert_eq!(payment["userId"], user.id.as_str());
    assert!(payment["transactionId"].is_null());

    let (status, body) = app.get("/api/payments", Some(&user.token)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    Ok(())
}

#[tokio::test]
async fn create_requires_amount_and_description() -> Result<()> {
    let app = TestApp::spawn().await?;
    let user = app.user().await?;

    let (status, body) = app
        .post("/api/payments", Some(&user.token), json!({ "amount": -1 }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["field_errors"].get("amount").is_some());
    assert!(body["field_errors"].get("description").is_some());
    Ok(())
}

#[tokio::test]
async fn verify_completes_the_payment() -> Result<()> {
    let app = TestApp::spawn().await?;
    let user = app.user().await?;
    let id = open_payment(&app, &user).await?;

    let (status, body) = app
        .post(
            &format!("/api/payments/{}/verify", id),
            Some(&user.token),
            json!({ "transactionId": "8MC585209K746392H" }),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "completed");
    assert_eq!(body["data"]["transactionId"], "8MC585209K746392H");
    assert!(body["data"]["verified_at"].is_string());

    let (_, body) = app.get(&format!("/api/payments/{}", id), Some(&user.token)).await?;
    assert_eq!(body["data"]["status"], "completed");
    Ok(())
}

#[tokio::test]
async fn verify_without_body_has_no_transaction_id() -> Result<()> {
    let app = TestApp::spawn().await?;
    let user = app.user().await?;
    let id = open_payment(&app, &user).await?;

    let (status, body) = app
        .post_empty(&format!("/api/payments/{}/verify", id), Some(&user.token))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "completed");
    assert!(body["data"]["transactionId"].is_null());
    Ok(())
}

#[tokio::test]
async fn verify_rejects_malformed_body() -> Result<()> {
    let app = TestApp::spawn().await?;
    let user = app.user().await?;
    let id = open_payment(&app, &user).await?;

    let (status, body) = app
        .post(
            &format!("/api/payments/{}/verify", id),
            Some(&user.token),
            json!({ "transactionId": 12345 }),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_JSON");

    // Payment is left untouched
    let (_, body) = app.get(&format!("/api/payments/{}", id), Some(&user.token)).await?;
    assert_eq!(body["data"]["status"], "pending");
    Ok(())
}

#[tokio::test]
async fn status_update_is_validated() -> Result<()> {
    let app = TestApp::spawn().await?;
    let user = app.user().await?;
    let id = open_payment(&app, &user).await?;
    let path = format!("/api/payments/{}", id);

    let (status, _) = app.put(&path, Some(&user.token), json!({ "status": "refunded" })).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.put(&path, Some(&user.token), json!({ "status": "failed" })).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "failed");
    Ok(())
}

#[tokio::test]
async fn delete_cancels_and_keeps_the_record() -> Result<()> {
    let app = TestApp::spawn().await?;
    let user = app.user().await?;
    let id = open_payment(&app, &user).await?;
    let path = format!("/api/payments/{}", id);

    let (status, body) = app.delete(&path, Some(&user.token)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "cancelled");

    let (status, body) = app.get(&path, Some(&user.token)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "cancelled");
    Ok(())
}

#[tokio::test]
async fn payments_are_private() -> Result<()> {
    let app = TestApp::spawn().await?;
    let owner = app.user().await?;
    let intruder = app.user().await?;
    let id = open_payment(&app, &owner).await?;

    let (status, _) = app.get(&format!("/api/payments/{}", id), Some(&intruder.token)).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app
        .post(&format!("/api/payments/{}/verify", id), Some(&intruder.token), json!({}))
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app
        .put(&format!("/api/payments/{}", id), Some(&intruder.token), json!({ "status": "failed" }))
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.delete(&format!("/api/payments/{}", id), Some(&intruder.token)).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Neither attempt changed the owner's row
    let (status, body) = app.get(&format!("/api/payments/{}", id), Some(&owner.token)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "pending");
    assert!(body["data"]["transactionId"].is_null());

    let (status, _) = app
        .get(&format!("/api/payments/{}", uuid::Uuid::new_v4()), Some(&owner.token))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}
