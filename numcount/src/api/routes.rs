use std::any::Any;

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::{error_response, MSG_SERVER_ERROR};

use super::frontend;
use super::handlers;
use super::openapi;
use super::AppState;

/// Room for multipart boundaries and part headers on top of the image itself.
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    let body_limit = state.config.server.max_body_bytes;
    let image_body_limit = state
        .config
        .upload
        .max_image_bytes
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    let router = Router::new()
        .route("/count-text", post(handlers::count_text))
        .route(
            "/count-image",
            post(handlers::count_image).layer(DefaultBodyLimit::max(image_body_limit)),
        )
        .route("/health", get(handlers::health_check))
        .route("/openapi.json", get(openapi::openapi_json));

    let frontend_dir = &state.config.server.frontend_dir;
    let router = match frontend::bundle_service(frontend_dir) {
        Some(service) => {
            tracing::info!(dir = %frontend_dir.display(), "Serving frontend bundle");
            router.fallback_service(service)
        }
        None => {
            tracing::info!(dir = %frontend_dir.display(), "No frontend bundle found");
            router.fallback(frontend::frontend_not_found)
        }
    };

    router
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };
    tracing::error!(panic = detail, "handler panicked");

    error_response(StatusCode::INTERNAL_SERVER_ERROR, MSG_SERVER_ERROR)
}
