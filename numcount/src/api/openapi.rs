use axum::Json;
use utoipa::OpenApi;

use super::dto;
use super::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Numcount API",
        description = "Counts how often each number appears in text or in an uploaded image.",
    ),
    paths(
        handlers::count_text,
        handlers::count_image,
        handlers::health_check,
    ),
    components(schemas(
        dto::CountTextRequest,
        dto::CountResponse,
        dto::ErrorBody,
        dto::HealthData,
        dto::OcrStatus,
    )),
    tags(
        (name = "count", description = "Number frequency counting"),
        (name = "health", description = "Service status"),
    )
)]
pub struct ApiDoc;

/// `GET /openapi.json`
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
