use std::sync::Arc;

use crate::config::Config;
use crate::ocr::Recognizer;

/// Shared, read-only handles passed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub recognizer: Arc<dyn Recognizer>,
}

impl AppState {
    pub fn new(config: Config, recognizer: Arc<dyn Recognizer>) -> Self {
        Self {
            config: Arc::new(config),
            recognizer,
        }
    }
}
