use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::config::format_limit;

pub const MSG_TEXT_REQUIRED: &str = "Text input is required.";
pub const MSG_NO_NUMBERS_IN_INPUT: &str = "No numbers found in input.";
pub const MSG_NO_NUMBERS_IN_IMAGE: &str = "No numbers found in image.";
pub const MSG_IMAGE_REQUIRED: &str = "Image file is required.";
pub const MSG_UNSUPPORTED_TYPE: &str = "Only JPG or PNG files are allowed.";
pub const MSG_RECOGNITION_FAILED: &str = "Failed to process image. Please try a clearer image.";
pub const MSG_SERVER_ERROR: &str = "Server error.";
pub const MSG_FRONTEND_NOT_FOUND: &str = "Frontend build not found.";

/// Which ingest path produced a result, used to word "no numbers" errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Text,
    Image,
}

#[derive(Error, Debug)]
pub enum NumcountError {
    #[error("Invalid payload: text must be a non-empty string")]
    InvalidPayload,

    #[error("No numbers found in {0:?} input")]
    NoNumbersFound(InputSource),

    #[error("Missing image upload")]
    MissingImage,

    #[error("Unsupported content type: {0}")]
    UnsupportedType(String),

    #[error("Payload exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("Recognition failed: {0}")]
    RecognitionFailed(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("OCR error: {0}")]
    Ocr(String),

    #[error("OCR unavailable: {0}")]
    OcrUnavailable(String),
}

impl NumcountError {
    pub fn status(&self) -> StatusCode {
        match self {
            NumcountError::InvalidPayload
            | NumcountError::NoNumbersFound(_)
            | NumcountError::MissingImage
            | NumcountError::UnsupportedType(_)
            | NumcountError::PayloadTooLarge { .. } => StatusCode::BAD_REQUEST,
            NumcountError::RecognitionFailed(_)
            | NumcountError::Internal(_)
            | NumcountError::Ocr(_)
            | NumcountError::OcrUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the client. Engine and runtime details stay in the logs.
    pub fn client_message(&self) -> String {
        match self {
            NumcountError::InvalidPayload => MSG_TEXT_REQUIRED.to_string(),
            NumcountError::NoNumbersFound(InputSource::Text) => {
                MSG_NO_NUMBERS_IN_INPUT.to_string()
            }
            NumcountError::NoNumbersFound(InputSource::Image) => {
                MSG_NO_NUMBERS_IN_IMAGE.to_string()
            }
            NumcountError::MissingImage => MSG_IMAGE_REQUIRED.to_string(),
            NumcountError::UnsupportedType(_) => MSG_UNSUPPORTED_TYPE.to_string(),
            NumcountError::PayloadTooLarge { limit } => {
                format!("Payload too large (max {}).", format_limit(*limit))
            }
            NumcountError::RecognitionFailed(_) => MSG_RECOGNITION_FAILED.to_string(),
            _ => MSG_SERVER_ERROR.to_string(),
        }
    }
}

impl IntoResponse for NumcountError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }

        error_response(status, &self.client_message())
    }
}

/// Build the `{ "error": message }` envelope shared by every failure path.
pub fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

pub type Result<T> = std::result::Result<T, NumcountError>;
