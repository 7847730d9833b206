use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use radius_portal::{AuthorizationPolicy, Client, ClientConfigBuilder};
use radius_portal_server::{app, AppState};

use radius_portal_mock::{filter_id, Behavior, MockServer, SECRET};

async fn router() -> (Router, MockServer) {
    let server = MockServer::start(|request| match request.user.as_str() {
        "alice" => Behavior::Accept(vec![filter_id("StaffPolicy")]),
        _ => Behavior::Reject(None),
    })
    .await;

    let config = ClientConfigBuilder::new()
        .host("127.0.0.1".to_owned())
        .port(server.port())
        .secret(SECRET)
        .timeout(Duration::from_secs(5))
        .build()
        .expect("client config should be valid");

    let state = AppState::new(Client::new(config), AuthorizationPolicy::default());
    (app(state), server)
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.expect("router is infallible");
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    let body = serde_json::from_slice(&bytes).expect("body should be JSON");

    (status, body)
}

fn post_login(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .expect("request should build")
}

#[tokio::test]
async fn login_through_router() {
    let (router, server) = router().await;

    let body = json!({ "username": "alice", "password": "correct horse" }).to_string();
    let (status, body) = send(router, post_login(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["filterId"], "StaffPolicy");
    assert_eq!(body["validation"]["status"], "authorized");
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn null_credentials_are_bad_request() {
    let (router, server) = router().await;

    let body = json!({ "username": null, "password": "correct horse" }).to_string();
    let (status, body) = send(router, post_login(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Username and password are required.");
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let (router, server) = router().await;

    let (status, body) = send(router, post_login("not json")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn wrong_field_type_is_bad_request() {
    let (router, _server) = router().await;

    let body = json!({ "username": 42, "password": "correct horse" }).to_string();
    let (status, body) = send(router, post_login(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn missing_content_type_is_bad_request() {
    let (router, _server) = router().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/login")
        .body(Body::from(r#"{"username":"alice","password":"correct horse"}"#))
        .expect("request should build");
    let (status, body) = send(router, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn health_through_router() {
    let (router, _server) = router().await;

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .expect("request should build");
    let (status, body) = send(router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}
