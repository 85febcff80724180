use axum::extract::{FromRequest, Multipart, Request};
use axum::http::{header, HeaderValue, StatusCode};
use axum::{Form, Json};
use serde::Deserialize;
use serde_json::Value;

use crate::api::dto::CountTextRequest;
use crate::api::AppState;
use crate::error::{NumcountError, Result};
use crate::ingest::image::{check_declared_type, check_size};
use crate::ingest::{TextInput, UploadedImage};

/// Multipart field carrying the uploaded image.
pub const IMAGE_FIELD: &str = "image";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Debug, Deserialize)]
struct CountTextForm {
    #[serde(default)]
    text: Option<String>,
}

/// Validated text from a JSON or form-encoded body.
pub struct TextPayload(pub TextInput);

impl FromRequest<AppState> for TextPayload {
    type Rejection = NumcountError;

    async fn from_request(mut req: Request, state: &AppState) -> Result<Self> {
        let limit = state.config.server.max_body_bytes;

        let raw = if is_form_encoded(&req) {
            // `Form` only recognizes the lowercase spelling.
            req.headers_mut().insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static(FORM_CONTENT_TYPE),
            );
            Form::<CountTextForm>::from_request(req, state)
                .await
                .map(|Form(form)| form.text.map(Value::String))
                .map_err(|rejection| body_rejection(rejection.status(), limit))?
        } else {
            Json::<CountTextRequest>::from_request(req, state)
                .await
                .map(|Json(body)| body.text)
                .map_err(|rejection| body_rejection(rejection.status(), limit))?
        };

        TextInput::parse(raw).map(TextPayload)
    }
}

/// Media types are case-insensitive and may carry parameters such as `charset`.
fn is_form_encoded(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|essence| essence.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
        .unwrap_or(false)
}

fn body_rejection(status: StatusCode, limit: usize) -> NumcountError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        NumcountError::PayloadTooLarge { limit }
    } else {
        NumcountError::InvalidPayload
    }
}

/// Read the first `image` file field out of a multipart body.
///
/// The declared content type is checked before any file bytes are read, and
/// reading stops as soon as the running size passes `max_bytes`. Other fields
/// are skipped.
pub async fn read_image_upload(
    mut multipart: Multipart,
    max_bytes: usize,
) -> Result<Option<UploadedImage>> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_bytes))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        if let Err(e) = check_declared_type(Some(&content_type)) {
            tracing::debug!(%content_type, "rejecting upload before reading it");
            return Err(e);
        }

        let mut buffer = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| multipart_error(e, max_bytes))?
        {
            if let Err(e) = check_size(buffer.len() + chunk.len(), max_bytes) {
                tracing::debug!(max_bytes, "upload exceeded size limit");
                return Err(e);
            }
            buffer.extend_from_slice(&chunk);
        }

        return Ok(Some(UploadedImage::new(buffer, content_type)));
    }

    Ok(None)
}

fn multipart_error(e: axum::extract::multipart::MultipartError, max_bytes: usize) -> NumcountError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        NumcountError::PayloadTooLarge { limit: max_bytes }
    } else {
        NumcountError::Internal(format!("Failed to read multipart body: {e}"))
    }
}
