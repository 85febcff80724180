use axum::body::Bytes;

use crate::error::{InputSource, NumcountError, Result};
use crate::ocr::{Recognizer, DIGIT_ALPHABET};
use crate::tally::{tally, IngestResult};

/// MIME types the image endpoint accepts.
pub const ACCEPTED_IMAGE_TYPES: &[&str] = &["image/png", "image/jpeg", "image/jpg"];

/// An image upload held in memory for the duration of one request.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    bytes: Bytes,
    content_type: String,
}

impl UploadedImage {
    pub fn new(bytes: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type: content_type.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }
}

/// Reject anything but PNG/JPEG based on the declared content type alone.
///
/// Parameters and case are ignored, so `Image/PNG; q=1` is accepted.
pub fn check_declared_type(content_type: Option<&str>) -> Result<()> {
    let declared = content_type.unwrap_or_default();
    let essence = declared
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if ACCEPTED_IMAGE_TYPES.contains(&essence.as_str()) {
        Ok(())
    } else {
        Err(NumcountError::UnsupportedType(declared.to_string()))
    }
}

pub fn check_size(len: usize, max_bytes: usize) -> Result<()> {
    if len > max_bytes {
        return Err(NumcountError::PayloadTooLarge { limit: max_bytes });
    }
    Ok(())
}

/// Validate an upload, recognize its digits, and count them.
///
/// All validation happens before the recognizer is called. The upload is
/// consumed: its buffer is handed to the recognizer and released as soon as
/// recognition finishes, or dropped on the first failed check.
pub async fn ingest_image(
    upload: Option<UploadedImage>,
    max_bytes: usize,
    recognizer: &dyn Recognizer,
) -> Result<IngestResult> {
    let upload = upload
        .filter(|u| !u.is_empty())
        .ok_or(NumcountError::MissingImage)?;
    check_declared_type(Some(upload.content_type()))?;
    check_size(upload.len(), max_bytes)?;

    let UploadedImage {
        bytes,
        content_type,
    } = upload;
    let size = bytes.len();

    let text = recognizer
        .recognize(bytes, DIGIT_ALPHABET)
        .await
        .map_err(|e| {
            tracing::error!(
                error = %e,
                backend = recognizer.backend_name(),
                %content_type,
                size,
                "image recognition failed"
            );
            NumcountError::RecognitionFailed(e.to_string())
        })?;

    tracing::debug!(size, recognized_chars = text.len(), "image recognized");

    tally(&text).map_err(|_| NumcountError::NoNumbersFound(InputSource::Image))
}
