use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use leptess::{LepTess, Variable};
use tracing::{info, warn};

use crate::config::{parse_ocr_provider_model, OcrConfig};
use crate::error::{NumcountError, Result};

use super::api::OpenAiVisionClient;
use super::preprocessing::preprocess_image;
use super::Recognizer;

#[derive(Clone)]
enum OcrBackend {
    Local { languages: String },
    Api { client: OpenAiVisionClient },
    Unavailable { reason: String },
}

/// Recognizer backed by local Tesseract or a remote vision API, selected by `OCR_MODEL`.
#[derive(Clone)]
pub struct OcrProvider {
    backend: OcrBackend,
    config: OcrConfig,
}

fn create_tesseract(languages: &str) -> std::result::Result<LepTess, String> {
    LepTess::new(None, languages).map_err(|e| e.to_string())
}

impl OcrProvider {
    pub fn new(config: &OcrConfig) -> Result<Self> {
        let (provider, _) = parse_ocr_provider_model(&config.model);

        let backend = match provider.to_lowercase().as_str() {
            "openai" => match OpenAiVisionClient::new(config) {
                Ok(client) => {
                    info!(model = %client.model(), "OpenAI Vision OCR backend initialized");
                    OcrBackend::Api { client }
                }
                Err(e) => {
                    let reason = format!("OpenAI Vision OCR backend unavailable: {e}");
                    warn!("{}", reason);
                    OcrBackend::Unavailable { reason }
                }
            },
            // Probe once so a missing install shows up at startup; each call builds its own engine.
            _ => match create_tesseract(&config.languages) {
                Ok(_) => {
                    info!(languages = %config.languages, "Tesseract OCR initialized");
                    OcrBackend::Local {
                        languages: config.languages.clone(),
                    }
                }
                Err(e) => {
                    let reason = format!("Tesseract not available: {e}");
                    warn!("{}", reason);
                    OcrBackend::Unavailable { reason }
                }
            },
        };

        Ok(Self {
            backend,
            config: config.clone(),
        })
    }

    async fn prepare(&self, image: Bytes) -> Result<Bytes> {
        if !self.config.preprocess {
            return Ok(image);
        }

        let max_dimension = self.config.max_image_dimension;
        let processed = tokio::task::spawn_blocking(move || preprocess_image(&image, max_dimension))
            .await
            .map_err(|e| NumcountError::Ocr(format!("Preprocessing task panicked: {e}")))??;

        Ok(Bytes::from(processed))
    }

    async fn recognize_internal(&self, image: Bytes, alphabet: &str) -> Result<String> {
        if let OcrBackend::Unavailable { reason } = &self.backend {
            return Err(NumcountError::OcrUnavailable(reason.clone()));
        }

        let image = self.prepare(image).await?;

        match &self.backend {
            OcrBackend::Local { languages } => {
                let languages = languages.clone();
                let alphabet = alphabet.to_string();

                let text = tokio::task::spawn_blocking(move || {
                    let mut lt = create_tesseract(&languages).map_err(NumcountError::Ocr)?;
                    lt.set_variable(Variable::TesseditCharWhitelist, &alphabet)
                        .map_err(|e| {
                            NumcountError::Ocr(format!("Failed to set character whitelist: {e:?}"))
                        })?;
                    lt.set_image_from_mem(&image)
                        .map_err(|e| NumcountError::Ocr(format!("Failed to set image: {e}")))?;
                    lt.get_utf8_text()
                        .map_err(|e| NumcountError::Ocr(format!("Failed to extract text: {e}")))
                })
                .await
                .map_err(|e| NumcountError::Ocr(format!("OCR task panicked: {e}")))??;

                Ok(text.trim().to_string())
            }
            OcrBackend::Api { client } => client.ocr(&image, alphabet).await,
            OcrBackend::Unavailable { reason } => Err(NumcountError::OcrUnavailable(reason.clone())),
        }
    }
}

#[async_trait]
impl Recognizer for OcrProvider {
    async fn recognize(&self, image: Bytes, alphabet: &str) -> Result<String> {
        let work = self.recognize_internal(image, alphabet);

        match self.config.timeout_secs {
            Some(secs) => tokio::time::timeout(Duration::from_secs(secs), work)
                .await
                .map_err(|_| {
                    NumcountError::Ocr(format!("OCR operation timed out after {secs} seconds"))
                })?,
            None => work.await,
        }
    }

    fn is_available(&self) -> bool {
        !matches!(self.backend, OcrBackend::Unavailable { .. })
    }

    fn backend_name(&self) -> &str {
        match &self.backend {
            OcrBackend::Local { .. } => "tesseract",
            OcrBackend::Api { .. } => "openai",
            OcrBackend::Unavailable { .. } => "unavailable",
        }
    }
}
