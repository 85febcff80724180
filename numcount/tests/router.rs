mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::json;
use tower::ServiceExt;

use common::{app, app_with_frontend, body_json, body_text, ScriptedRecognizer};

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn health_reports_recognizer_backend() {
    let response = app(ScriptedRecognizer::replying(""))
        .oneshot(get("/health"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["ocr"], json!({ "status": "available", "backend": "scripted" }));
}

#[tokio::test]
async fn openapi_document_lists_count_routes() {
    let response = app(ScriptedRecognizer::replying(""))
        .oneshot(get("/openapi.json"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let doc = body_json(response).await;
    assert!(doc["openapi"].as_str().unwrap().starts_with('3'));
    assert!(doc["paths"].get("/count-text").is_some());
    assert!(doc["paths"].get("/count-image").is_some());
}

#[tokio::test]
async fn missing_frontend_is_json_not_found() {
    let response = app(ScriptedRecognizer::replying(""))
        .oneshot(get("/"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Frontend build not found." })
    );
}

#[tokio::test]
async fn frontend_assets_and_client_routes_are_served() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<div id=\"root\"></div>").unwrap();
    std::fs::create_dir(dir.path().join("assets")).unwrap();
    std::fs::write(dir.path().join("assets/app.js"), "console.log(1)").unwrap();

    let app = app_with_frontend(dir.path());

    let response = app.clone().oneshot(get("/assets/app.js")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "console.log(1)");

    let response = app.clone().oneshot(get("/history/42")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "<div id=\"root\"></div>");

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn cors_preflight_is_allowed() {
    let response = app(ScriptedRecognizer::replying(""))
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/count-text")
                .header("origin", "http://localhost:5173")
                .header("access-control-request-method", "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "*"
    );
}
