//! Operator API authentication tests.

mod common;

use crate::common::TestApp;

#[tokio::test]
async fn test_list_orders_without_api_key_returns_401() {
    let app = TestApp::new().await;

    let response = app
        .client
        .get(&app.url("/api/v1/orders"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 401);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["code"], "UNAUTHORIZED");
    assert_eq!(body["error"], "Missing X-Api-Key header");
}

#[tokio::test]
async fn test_update_order_status_without_api_key_returns_401() {
    let app = TestApp::new().await;

    let response = app
        .client
        .patch(&app.url(
            "/api/v1/orders/0198c1f3-0000-7000-8000-000000000001/status",
        ))
        .json(&serde_json::json!({ "status": "CONFIRMED" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 401);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["code"], "UNAUTHORIZED");
}
