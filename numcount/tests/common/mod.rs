#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{Body, Bytes};
use axum::http::{Request, Response};
use axum::Router;
use numcount::api::{create_router, AppState};
use numcount::config::Config;
use numcount::error::{NumcountError, Result};
use numcount::ocr::Recognizer;

pub const BOUNDARY: &str = "numcount-test-boundary";

/// Recognizer that replays a fixed reply and records what it was given.
pub struct ScriptedRecognizer {
    reply: std::result::Result<String, String>,
    calls: AtomicUsize,
    last_size: AtomicUsize,
}

impl ScriptedRecognizer {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            calls: AtomicUsize::new(0),
            last_size: AtomicUsize::new(0),
        })
    }

    pub fn failing(detail: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(detail.to_string()),
            calls: AtomicUsize::new(0),
            last_size: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_size(&self) -> usize {
        self.last_size.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Recognizer for ScriptedRecognizer {
    async fn recognize(&self, image: Bytes, _alphabet: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.last_size.store(image.len(), Ordering::SeqCst);
        self.reply.clone().map_err(NumcountError::Ocr)
    }

    fn backend_name(&self) -> &str {
        "scripted"
    }
}

/// Config with defaults and a frontend directory that does not exist.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.server.frontend_dir = "/nonexistent/numcount-frontend".into();
    config
}

pub fn app_with(config: Config, recognizer: Arc<dyn Recognizer>) -> Router {
    create_router(AppState::new(config, recognizer))
}

pub fn app(recognizer: Arc<dyn Recognizer>) -> Router {
    app_with(test_config(), recognizer)
}

pub fn app_with_frontend(dir: &Path) -> Router {
    let mut config = test_config();
    config.server.frontend_dir = dir.to_path_buf();
    app_with(config, ScriptedRecognizer::replying(""))
}

pub fn json_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Multipart body with a single file part.
pub fn multipart_body(field: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"upload\"\r\n\
         Content-Type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/count-image")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn image_request(content_type: &str, data: &[u8]) -> Request<Body> {
    multipart_request(multipart_body("image", content_type, data))
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut output = Vec::new();
    image::DynamicImage::new_rgb8(width, height)
        .write_to(
            &mut std::io::Cursor::new(&mut output),
            image::ImageFormat::Png,
        )
        .unwrap();
    output
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
