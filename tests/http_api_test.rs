// ==========================================
// HTTP 路由测试
// ==========================================
// 测试目标: 路由、状态码、JSON 结构
// ==========================================

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use pack_planner::app::{build_router, AppState};
use pack_planner::engine::SolverSettings;
use std::sync::Arc;
use tower::ServiceExt;

fn router() -> Router {
    build_router(Arc::new(AppState::in_memory_with_defaults()))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header("content-type", "application/json");
    }
    let req = builder
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();

    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(&router(), "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_calc_ok() {
    let (status, body) = send(&router(), "GET", "/v1/calc?items=501", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        serde_json::json!({
            "itemsOrdered": 501,
            "totalItemsUsed": 750,
            "packsUsed": { "500": 1, "250": 1 }
        })
    );
}

#[tokio::test]
async fn test_calc_bad_requests() {
    let app = router();
    for uri in [
        "/v1/calc",
        "/v1/calc?items=",
        "/v1/calc?items=abc",
        "/v1/calc?items=-1",
        "/v1/calc?items=1000000000001",
    ] {
        let (status, body) = send(&app, "GET", uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "uri={}", uri);
        assert_eq!(body["code"], "INVALID_INPUT");
    }
}

#[tokio::test]
async fn test_calc_without_sizes_is_conflict() {
    let app = build_router(Arc::new(AppState::in_memory(&[], SolverSettings::default())));
    let (status, body) = send(&app, "GET", "/v1/calc?items=10", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "NO_PACK_SIZES_CONFIGURED");
}

#[tokio::test]
async fn test_pack_sizes_lifecycle() {
    let app = router();

    let (status, body) = send(&app, "GET", "/v1/pack-sizes", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "pack_sizes": [250, 500, 1000, 2000, 5000] }));

    let (status, body) = send(&app, "PUT", "/v1/pack-sizes", Some(r#"{"pack_sizes":[23,31,53]}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(
        body["pack_sizes"],
        serde_json::json!([23, 31, 53, 250, 500, 1000, 2000, 5000])
    );

    let (status, _) = send(&app, "DELETE", "/v1/pack-sizes/31", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "DELETE", "/v1/pack-sizes/31", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, "GET", "/v1/pack-sizes", None).await;
    assert_eq!(body["pack_sizes"], serde_json::json!([23, 53, 250, 500, 1000, 2000, 5000]));
}

#[tokio::test]
async fn test_update_pack_sizes_rejects_bad_payloads() {
    let app = router();
    for body in [
        r#"{"pack_sizes":[]}"#,
        r#"{"pack_sizes":[0]}"#,
        r#"{"pack_sizes":[-250]}"#,
        r#"{"pack_sizes":[1.5]}"#,
        r#"{"sizes":[1]}"#,
        "not json",
    ] {
        let (status, resp) = send(&app, "PUT", "/v1/pack-sizes", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body={}", body);
        assert_eq!(resp["code"], "INVALID_INPUT");
    }
}

#[tokio::test]
async fn test_delete_invalid_size_param() {
    let (status, body) = send(&router(), "DELETE", "/v1/pack-sizes/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");
}

async fn preflight(app: &Router, origin: &str) -> axum::http::HeaderMap {
    let req = Request::builder()
        .method("OPTIONS")
        .uri("/v1/pack-sizes")
        .header("origin", origin)
        .header("access-control-request-method", "PUT")
        .header("access-control-request-headers", "content-type")
        .body(Body::empty())
        .unwrap();

    let resp = app.clone().oneshot(req).await.unwrap();
    assert!(resp.status().is_success());
    resp.headers().clone()
}

#[tokio::test]
async fn test_cors_preflight_allows_frontend_origin() {
    let headers = preflight(&router(), "http://localhost:3000").await;
    assert_eq!(headers["access-control-allow-origin"], "http://localhost:3000");
    assert_eq!(headers["access-control-allow-credentials"], "true");
    assert_eq!(headers["access-control-max-age"], "43200");

    let methods = headers["access-control-allow-methods"].to_str().unwrap();
    for m in ["GET", "PUT", "POST", "DELETE", "OPTIONS"] {
        assert!(methods.contains(m), "methods={}", methods);
    }
    let allow_headers = headers["access-control-allow-headers"].to_str().unwrap();
    assert!(allow_headers.eq_ignore_ascii_case("content-type"));
}

#[tokio::test]
async fn test_cors_rejects_unknown_origin() {
    let headers = preflight(&router(), "http://evil.test").await;
    assert!(headers.get("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn test_cors_configured_origins() {
    let mut state = AppState::in_memory_with_defaults();
    state.cors_origins = vec!["http://shop.test".to_string(), "*".to_string()];
    let app = build_router(Arc::new(state));

    let headers = preflight(&app, "http://shop.test").await;
    assert_eq!(headers["access-control-allow-origin"], "http://shop.test");

    let headers = preflight(&app, "http://localhost:3000").await;
    assert!(headers.get("access-control-allow-origin").is_none());

    // 普通请求同样带上来源头
    let req = Request::builder()
        .uri("/health")
        .header("origin", "http://shop.test")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["access-control-allow-origin"], "http://shop.test");
    assert_eq!(resp.headers()["access-control-expose-headers"], "content-length");
}
