//! HTTP handlers for the count and health endpoints.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;

use crate::api::dto::{CountResponse, CountTextRequest, ErrorBody, HealthData, OcrStatus};
use crate::api::extractors::{read_image_upload, TextPayload};
use crate::api::AppState;
use crate::error::Result;
use crate::ingest::{ingest_image, ingest_text};

/// `POST /count-text`
///
/// Counts every number in a JSON (`{"text": "..."}`) or form-encoded body.
#[utoipa::path(
    post,
    path = "/count-text",
    tag = "count",
    request_body = CountTextRequest,
    responses(
        (status = 200, description = "Numbers counted", body = CountResponse),
        (status = 400, description = "Missing text, no numbers, or body too large", body = ErrorBody),
    )
)]
pub async fn count_text(TextPayload(input): TextPayload) -> Result<Json<CountResponse>> {
    let result = ingest_text(&input)?;
    Ok(Json(result.into()))
}

/// `POST /count-image`
///
/// Accepts a multipart form whose `image` field is a PNG or JPEG, reads the
/// digits in it, and counts them. A request that is not multipart at all is
/// treated as having no image.
#[utoipa::path(
    post,
    path = "/count-image",
    tag = "count",
    request_body(content_type = "multipart/form-data", content = String, description = "Form with a single `image` file field (PNG or JPEG, max 5 MB)"),
    responses(
        (status = 200, description = "Numbers counted", body = CountResponse),
        (status = 400, description = "Missing image, unsupported type, too large, or no numbers", body = ErrorBody),
        (status = 500, description = "Recognition failed", body = ErrorBody),
    )
)]
pub async fn count_image(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<CountResponse>> {
    let max_bytes = state.config.upload.max_image_bytes;

    let upload = match multipart {
        Ok(multipart) => read_image_upload(multipart, max_bytes).await?,
        Err(rejection) => {
            tracing::debug!(%rejection, "image request is not multipart");
            None
        }
    };

    let result = ingest_image(upload, max_bytes, state.recognizer.as_ref()).await?;
    Ok(Json(result.into()))
}

/// `GET /health`
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service health status", body = HealthData),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthData> {
    let ocr_status = if state.recognizer.is_available() {
        "available"
    } else {
        "unavailable"
    };

    Json(HealthData {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        ocr: OcrStatus {
            status: ocr_status.to_string(),
            backend: state.recognizer.backend_name().to_string(),
        },
    })
}
