//! CORS and request-id behavior, exercised in-process on the router.

use aggregator_proxy::{Credential, HttpServer, ProxyConfig};
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use tower::ServiceExt;

mod common;

fn router(config: ProxyConfig, credential: Credential) -> Router {
    HttpServer::new(config, credential).unwrap().router()
}

fn assert_cors(headers: &axum::http::HeaderMap) {
    assert_eq!(headers["access-control-allow-origin"], "http://localhost:5173");
    assert_eq!(headers["access-control-allow-methods"], "GET, POST, PUT, DELETE, OPTIONS");
    assert_eq!(headers["access-control-allow-headers"], "Content-Type, Authorization");
}

#[tokio::test]
async fn test_preflight_is_empty_200_on_any_path() {
    for path in ["/api/swap/v5.0/1/quote", "/api", "/elsewhere"] {
        let app = router(ProxyConfig::default(), Credential::default());
        let req = Request::builder()
            .method(Method::OPTIONS)
            .uri(path)
            .header("origin", "http://localhost:5173")
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .unwrap();

        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK, "path {}", path);
        assert_cors(res.headers());

        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert!(body.is_empty());
    }
}

#[tokio::test]
async fn test_preflight_answered_without_credential_or_upstream() {
    let (upstream, recorded) = common::start_recording_upstream(|| (200, "{}".into())).await;
    let app = router(common::config_for(upstream), Credential::default());

    let req = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/price/v1.1/1")
        .body(Body::empty())
        .unwrap();
    let res = app.oneshot(req).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert!(recorded.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_cors_headers_on_error_responses() {
    let app = router(ProxyConfig::default(), Credential::default());
    let req = Request::builder().uri("/api/tokens").body(Body::empty()).unwrap();

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_cors(res.headers());
}

#[tokio::test]
async fn test_cors_headers_on_relayed_responses() {
    let (upstream, _) = common::start_recording_upstream(|| (200, r#"{"foo":"bar"}"#.into())).await;
    let app = router(common::config_for(upstream), Credential::bearer("t"));

    let req = Request::builder().uri("/api/foo").body(Body::empty()).unwrap();
    let res = app.oneshot(req).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_cors(res.headers());
}

#[tokio::test]
async fn test_configured_origin_is_used() {
    let mut config = ProxyConfig::default();
    config.cors.allow_origin = "https://donate.example".into();
    let app = router(config, Credential::default());

    let req = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/x")
        .body(Body::empty())
        .unwrap();
    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.headers()["access-control-allow-origin"], "https://donate.example");
}

#[tokio::test]
async fn test_request_id_generated_and_propagated() {
    let (upstream, recorded) = common::start_recording_upstream(|| (200, "{}".into())).await;
    let app = router(common::config_for(upstream), Credential::bearer("t"));

    let req = Request::builder().uri("/api/tokens").body(Body::empty()).unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    let generated = res.headers()["x-request-id"].to_str().unwrap().to_string();
    assert_eq!(generated.len(), 36);

    let req = Request::builder()
        .uri("/api/tokens")
        .header("x-request-id", "donation-42")
        .body(Body::empty())
        .unwrap();
    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.headers()["x-request-id"], "donation-42");

    let requests = recorded.lock().unwrap();
    assert_eq!(requests[0].headers["x-request-id"], generated.as_str());
    assert_eq!(requests[1].headers["x-request-id"], "donation-42");
}
