use std::path::Path;

use axum::http::StatusCode;
use axum::response::Response;
use tower_http::services::{ServeDir, ServeFile};

use crate::error::{error_response, MSG_FRONTEND_NOT_FOUND};

/// Static file service for a built frontend, if `dir/index.html` exists.
///
/// Paths that match no file fall back to `index.html` so client-side routes
/// resolve.
pub fn bundle_service(dir: &Path) -> Option<ServeDir<ServeFile>> {
    let index = dir.join("index.html");
    if !index.is_file() {
        return None;
    }
    Some(ServeDir::new(dir).fallback(ServeFile::new(index)))
}

pub async fn frontend_not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, MSG_FRONTEND_NOT_FOUND)
}
