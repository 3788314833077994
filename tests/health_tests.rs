//! Health endpoint tests.

mod common;

use crate::common::TestApp;

#[tokio::test]
async fn test_health_returns_200() {
    let app = TestApp::new().await;

    let response = app
        .client
        .get(&app.url("/api/v1/health"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_health_returns_status_ok() {
    let app = TestApp::new().await;

    let response = app
        .client
        .get(&app.url("/api/v1/health"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let app = TestApp::new().await;

    let response = app
        .client
        .get(&app.url("/api/v1/nonexistent"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
}
