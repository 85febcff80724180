use serde::Deserialize;
use std::env;
use std::path::PathBuf;

pub const MIB: usize = 1024 * 1024;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

fn parse_env_opt<T: std::str::FromStr>(var: &str) -> Option<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Ignoring.", val, var, e);
                None
            }
        },
        Err(_) => None,
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub upload: UploadConfig,
    pub ocr: OcrConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Body ceiling for every route except the image upload.
    pub max_body_bytes: usize,
    /// Directory holding a built frontend bundle (`index.html` + assets).
    pub frontend_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    pub max_image_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub languages: String,
    /// `None` leaves recognition unbounded.
    pub timeout_secs: Option<u64>,
    pub preprocess: bool,
    pub max_image_dimension: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            max_body_bytes: MIB,
            frontend_dir: PathBuf::from("client/dist"),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_image_bytes: 5 * MIB,
        }
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            model: "local/tesseract".to_string(),
            api_key: None,
            base_url: None,
            languages: "eng".to_string(),
            timeout_secs: None,
            preprocess: true,
            max_image_dimension: 4096,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let server = ServerConfig::default();
        let upload = UploadConfig::default();
        let ocr = OcrConfig::default();

        Self {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or(server.host),
                port: parse_env_or("PORT", server.port),
                max_body_bytes: parse_env_or("MAX_BODY_BYTES", server.max_body_bytes),
                frontend_dir: env::var("FRONTEND_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(server.frontend_dir),
            },
            upload: UploadConfig {
                max_image_bytes: parse_env_or("MAX_IMAGE_BYTES", upload.max_image_bytes),
            },
            ocr: OcrConfig {
                model: env::var("OCR_MODEL").unwrap_or(ocr.model),
                api_key: env::var("OCR_API_KEY").ok(),
                base_url: env::var("OCR_BASE_URL").ok(),
                languages: env::var("OCR_LANGUAGES").unwrap_or(ocr.languages),
                timeout_secs: parse_env_opt("OCR_TIMEOUT"),
                preprocess: parse_env_or("OCR_PREPROCESS", ocr.preprocess),
                max_image_dimension: parse_env_or("OCR_MAX_DIMENSION", ocr.max_image_dimension),
            },
        }
    }
}

/// Known recognizer providers; anything else is treated as local Tesseract.
const KNOWN_OCR_PROVIDERS: &[&str] = &["local", "openai"];

/// Parse an OCR model name into a (provider, model) tuple.
pub fn parse_ocr_provider_model(model: &str) -> (&str, &str) {
    if let Some((prefix, rest)) = model.split_once('/') {
        let prefix_lower = prefix.to_lowercase();
        if KNOWN_OCR_PROVIDERS.contains(&prefix_lower.as_str()) {
            return (prefix, rest);
        }
    }
    ("local", model)
}

/// Render a byte limit for user-facing messages, e.g. `5 MB`.
pub fn format_limit(bytes: usize) -> String {
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{} MB", bytes / MIB)
    } else if bytes >= 1024 && bytes % 1024 == 0 {
        format!("{} KB", bytes / 1024)
    } else {
        format!("{bytes} bytes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "HOST",
        "PORT",
        "MAX_BODY_BYTES",
        "FRONTEND_DIR",
        "MAX_IMAGE_BYTES",
        "OCR_MODEL",
        "OCR_API_KEY",
        "OCR_BASE_URL",
        "OCR_LANGUAGES",
        "OCR_TIMEOUT",
        "OCR_PREPROCESS",
        "OCR_MAX_DIMENSION",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_config_defaults() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        let config = Config::from_env();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.max_body_bytes, 1024 * 1024);
        assert_eq!(config.server.frontend_dir, PathBuf::from("client/dist"));
        assert_eq!(config.upload.max_image_bytes, 5 * 1024 * 1024);
        assert_eq!(config.ocr.model, "local/tesseract");
        assert_eq!(config.ocr.languages, "eng");
        assert!(config.ocr.timeout_secs.is_none());
        assert!(config.ocr.preprocess);
    }

    #[test]
    fn test_config_from_env() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("PORT", "8080");
        std::env::set_var("MAX_BODY_BYTES", "2048");
        std::env::set_var("MAX_IMAGE_BYTES", "4096");
        std::env::set_var("FRONTEND_DIR", "/srv/www");
        std::env::set_var("OCR_MODEL", "openai/gpt-4o-mini");
        std::env::set_var("OCR_TIMEOUT", "15");
        std::env::set_var("OCR_PREPROCESS", "false");

        let config = Config::from_env();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.max_body_bytes, 2048);
        assert_eq!(config.upload.max_image_bytes, 4096);
        assert_eq!(config.server.frontend_dir, PathBuf::from("/srv/www"));
        assert_eq!(config.ocr.model, "openai/gpt-4o-mini");
        assert_eq!(config.ocr.timeout_secs, Some(15));
        assert!(!config.ocr.preprocess);

        clear_env();
    }

    #[test]
    fn test_invalid_values_fall_back_to_defaults() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("PORT", "not-a-port");
        std::env::set_var("OCR_TIMEOUT", "soon");

        let config = Config::from_env();
        assert_eq!(config.server.port, 3000);
        assert!(config.ocr.timeout_secs.is_none());

        clear_env();
    }

    #[test]
    fn test_parse_ocr_provider_model() {
        assert_eq!(parse_ocr_provider_model("local/tesseract"), ("local", "tesseract"));
        assert_eq!(parse_ocr_provider_model("openai/gpt-4o"), ("openai", "gpt-4o"));
        assert_eq!(parse_ocr_provider_model("OpenAI/gpt-4o"), ("OpenAI", "gpt-4o"));
        assert_eq!(parse_ocr_provider_model("tesseract"), ("local", "tesseract"));
        assert_eq!(
            parse_ocr_provider_model("acme/vision"),
            ("local", "acme/vision")
        );
    }

    #[test]
    fn test_format_limit() {
        assert_eq!(format_limit(5 * MIB), "5 MB");
        assert_eq!(format_limit(MIB), "1 MB");
        assert_eq!(format_limit(64 * 1024), "64 KB");
        assert_eq!(format_limit(1000), "1000 bytes");
    }
}
