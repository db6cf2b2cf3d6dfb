//! Account endpoints driven through the router without a socket.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use game_server::{AppState, router};
use runtime::Runtime;

fn start() -> (Runtime, Router) {
    let runtime = Runtime::builder().seed(1).build().expect("runtime builds");
    let app = router(AppState::new(runtime.handle()));
    (runtime, app)
}

async fn post(app: &Router, path: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn signup_then_login() {
    let (runtime, app) = start();

    let (status, body) = post(&app, "/signup", r#"{"username":"alice"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"username": "alice", "score": 0, "respawnX": 1000.0, "respawnY": 1000.0})
    );

    let (status, body) = post(&app, "/login", r#"{"username":"alice"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn signup_rejects_taken_username() {
    let (runtime, app) = start();
    post(&app, "/signup", r#"{"username":"alice"}"#).await;

    let (status, body) = post(&app, "/signup", r#"{"username":"alice"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let (runtime, app) = start();

    for (path, body) in [
        ("/login", r#"{"username":"ghost"}"#),
        ("/update-score", r#"{"username":"ghost","score":5}"#),
        ("/update-respawn", r#"{"username":"ghost","respawnX":1,"respawnY":2}"#),
    ] {
        let (status, body) = post(&app, path, body).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{path}");
        assert_eq!(body, json!({"error": "User not found"}));
    }

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn malformed_bodies_are_bad_requests() {
    let (runtime, app) = start();

    for (path, body) in [
        ("/signup", r#"{}"#),
        ("/signup", r#"{"username":""}"#),
        ("/login", "not json"),
        ("/update-score", r#"{"username":"alice","score":-1}"#),
    ] {
        let (status, body) = post(&app, path, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{path}");
        assert!(body["error"].is_string());
    }

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn updates_are_visible_to_login() {
    let (runtime, app) = start();
    post(&app, "/signup", r#"{"username":"alice"}"#).await;

    let (status, body) = post(&app, "/update-score", r#"{"username":"alice","score":70}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"username": "alice", "score": 70}));

    let (status, body) = post(
        &app,
        "/update-respawn",
        r#"{"username":"alice","respawnX":300,"respawnY":375}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["respawnX"], 300.0);

    let (_, body) = post(&app, "/login", r#"{"username":"alice"}"#).await;
    assert_eq!(
        body,
        json!({"username": "alice", "score": 70, "respawnX": 300.0, "respawnY": 375.0})
    );

    runtime.shutdown().await.unwrap();
}

