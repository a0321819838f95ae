use crate::config::Config;
use crate::server::build_app;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use scansheet_api::DbState;
use tower::ServiceExt;

fn test_config() -> Config {
    Config {
        host: [127, 0, 0, 1].into(),
        port: 4001,
        database_path: "unused.db".into(),
        max_connections: 1,
        cors_origin: "http://localhost:5173".to_string(),
        static_dir: None,
    }
}

#[tokio::test]
async fn test_health_through_middleware() {
    let app = build_app(DbState::in_memory().await.unwrap(), &test_config()).unwrap();

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/health")
        .header(header::ORIGIN, "http://localhost:5173")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:5173"
    );
}

#[tokio::test]
async fn test_invalid_cors_origin_is_rejected() {
    let mut config = test_config();
    config.cors_origin = "bad\norigin".to_string();

    let result = build_app(DbState::in_memory().await.unwrap(), &config);
    assert!(result.is_err());
}

#[tokio::test]
async fn test_static_client_with_spa_fallback() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<html>scansheet</html>").unwrap();

    let mut config = test_config();
    config.static_dir = Some(dir.path().to_path_buf());
    let app = build_app(DbState::in_memory().await.unwrap(), &config).unwrap();

    for uri in ["/", "/entries/some-client-route"] {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{}", uri);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"<html>scansheet</html>");
    }

    // API misses stay JSON 404s instead of falling through to the client
    let request = Request::builder()
        .uri("/api/nope")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
