//! Integration tests for the session HTTP API.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use moodring_api::AppState;
use moodring_core::config::AppConfig;

/// Test application context
struct TestApp {
    /// The axum router for making test requests
    router: Router,
}

impl TestApp {
    /// Create a test application with a small session cap.
    fn new() -> Self {
        let mut config = AppConfig::default();
        config.session.max_users = 3;

        let state = AppState::new(config);
        let router = moodring_api::build_router(state);
        Self { router }
    }

    /// Make an HTTP request to the test app
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Create a session and return its code.
    async fn create_session(&self, name: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/session/create",
                Some(serde_json::json!({ "name": name })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
        response.body["data"]["code"]
            .as_str()
            .expect("No code in create response")
            .to_string()
    }
}

/// Response from a test request
#[derive(Debug)]
struct TestResponse {
    status: StatusCode,
    body: Value,
}

#[tokio::test]
async fn test_create_session_returns_code_and_user_id() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/session/create",
            Some(serde_json::json!({ "name": "Maya" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);

    let code = response.body["data"]["code"].as_str().unwrap();
    assert_eq!(code.len(), 7);
    assert_eq!(&code[3..4], "-");
    assert!(response.body["data"]["user_id"].as_str().is_some());
}

#[tokio::test]
async fn test_create_session_rejects_blank_name() {
    let app = TestApp::new();

    for name in ["", "   "] {
        let response = app
            .request(
                "POST",
                "/api/session/create",
                Some(serde_json::json!({ "name": name })),
            )
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_join_session_flow() {
    let app = TestApp::new();
    let code = app.create_session("Maya").await;

    let response = app
        .request(
            "POST",
            "/api/session/join",
            Some(serde_json::json!({ "code": code, "name": "Ben" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["session"]["user_count"], 2);
    assert!(response.body["data"]["user_id"].as_str().is_some());
}

#[tokio::test]
async fn test_join_accepts_lowercase_unhyphenated_code() {
    let app = TestApp::new();
    let code = app.create_session("Maya").await;
    let sloppy = code.replace('-', "").to_lowercase();

    let response = app
        .request(
            "POST",
            "/api/session/join",
            Some(serde_json::json!({ "code": sloppy, "name": "Ben" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_join_unknown_session_is_404() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/session/join",
            Some(serde_json::json!({ "code": "ZZZ-999", "name": "Ben" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_join_full_session_is_conflict() {
    let app = TestApp::new();
    let code = app.create_session("Maya").await;

    for name in ["Ben", "Carol"] {
        let response = app
            .request(
                "POST",
                "/api/session/join",
                Some(serde_json::json!({ "code": code, "name": name })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }

    let response = app
        .request(
            "POST",
            "/api/session/join",
            Some(serde_json::json!({ "code": code, "name": "Dave" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_get_session_snapshot() {
    let app = TestApp::new();
    let code = app.create_session("Maya").await;

    let response = app
        .request("GET", &format!("/api/session/{}", code), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["code"], code.as_str());
    assert_eq!(response.body["data"]["user_count"], 1);

    let missing = app.request("GET", "/api/session/QQQ-111", None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_reports_live_sessions() {
    let app = TestApp::new();

    let before = app.request("GET", "/api/health", None).await;
    assert_eq!(before.status, StatusCode::OK);
    assert_eq!(before.body["data"]["sessions"], 0);
    assert_eq!(before.body["data"]["status"], "ok");

    app.create_session("Maya").await;

    let after = app.request("GET", "/api/health", None).await;
    assert_eq!(after.body["data"]["sessions"], 1);
}
