//! Wire types for the HTTP API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::tally::{FrequencyMap, IngestResult};

/// Body of `POST /count-text`.
///
/// `text` is kept untyped so a missing or non-string value is reported as an
/// invalid payload rather than a JSON syntax error.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CountTextRequest {
    #[serde(default)]
    #[schema(value_type = String, example = "1, 2, 2 45 1")]
    pub text: Option<serde_json::Value>,
}

/// Successful count for either endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CountResponse {
    /// Occurrences per number, keyed by the digits as written.
    #[schema(value_type = Object, example = json!({ "1": 2, "2": 2, "45": 1 }))]
    pub counts: FrequencyMap,
    /// Total numbers found; equals the sum of `counts`.
    #[schema(example = 5)]
    pub total_numbers: u64,
}

impl From<IngestResult> for CountResponse {
    fn from(result: IngestResult) -> Self {
        let (counts, total_numbers) = result.into_parts();
        Self {
            counts,
            total_numbers,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub ocr: OcrStatus,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OcrStatus {
    pub status: String,
    pub backend: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_count_response_wire_shape() {
        let result = crate::tally::tally("1, 2, 2 45 1").unwrap();
        let value = serde_json::to_value(CountResponse::from(result)).unwrap();
        assert_eq!(
            value,
            json!({ "counts": { "1": 2, "2": 2, "45": 1 }, "totalNumbers": 5 })
        );
    }

    #[test]
    fn test_count_text_request_tolerates_missing_text() {
        let req: CountTextRequest = serde_json::from_str("{}").unwrap();
        assert!(req.text.is_none());

        let req: CountTextRequest = serde_json::from_str(r#"{"text": 12}"#).unwrap();
        assert_eq!(req.text, Some(json!(12)));
    }
}
