//! OCR (Optical Character Recognition) Module
//!
//! Turns uploaded image bytes into text for the image ingest path. The engine
//! itself is an external collaborator; this crate only talks to it through the
//! [`Recognizer`] trait.
//!
//! # Backends
//!
//! [`OcrProvider`] picks a backend from `OcrConfig::model`:
//! - `local/tesseract` (default): Tesseract via leptess, one engine per call on
//!   the blocking pool so concurrent uploads recognize in parallel
//! - `openai/<model>`: an OpenAI-compatible vision chat endpoint
//!
//! A backend that fails to initialise leaves the provider unavailable; every
//! call then fails with `OcrUnavailable` instead of aborting startup.
//!
//! # Usage
//!
//! ```rust,ignore
//! let ocr = OcrProvider::new(&config.ocr)?;
//! let text = ocr.recognize(image_bytes, DIGIT_ALPHABET).await?;
//! ```

mod api;
mod preprocessing;
mod provider;

use async_trait::async_trait;
use axum::body::Bytes;

use crate::error::Result;

pub use preprocessing::preprocess_image;
pub use provider::OcrProvider;

/// Characters the recognizer is asked to restrict itself to.
pub const DIGIT_ALPHABET: &str = "0123456789";

#[async_trait]
pub trait Recognizer: Send + Sync {
    /// Read text from an encoded image.
    ///
    /// `alphabet` is a hint: engines may still emit other characters, so callers
    /// must filter the output themselves. The image buffer is consumed and
    /// released once recognition finishes.
    async fn recognize(&self, image: Bytes, alphabet: &str) -> Result<String>;

    fn is_available(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &str;
}
