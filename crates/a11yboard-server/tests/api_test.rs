//! Route tests for a11yboard-server.

use a11yboard_core::DashboardConfig;
use a11yboard_server::build_router;
use a11yboard_server::state::AppState;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

fn app() -> axum::Router {
    let dashboard = DashboardConfig::default()
        .with_server_url("http://backend:8080/api/")
        .with_project("frontend");
    build_router(AppState::new(dashboard))
}

#[tokio::test]
async fn test_config_endpoint() {
    let response = app()
        .oneshot(Request::builder().uri("/api/config").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["server_url"], "http://backend:8080/api");
    assert_eq!(json["project"], "frontend");
    assert_eq!(json["page_size"], 20);
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_client_routes_fall_back_to_index() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/runs/abc?run_list=abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
    assert!(content_type.to_str().unwrap().starts_with("text/html"));
}

#[tokio::test]
async fn test_index_is_revalidated() {
    let response = app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get(header::CACHE_CONTROL).unwrap(), "no-cache");
}

