use serde_json::Value;

use crate::error::{InputSource, NumcountError, Result};
use crate::tally::{tally, IngestResult};

/// A text payload that passed boundary validation: present, a string, not empty.
///
/// Whitespace-only text is accepted here and reported as "no numbers" later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextInput(String);

impl TextInput {
    /// Validate the untyped `text` field of a request body.
    pub fn parse(raw: Option<Value>) -> Result<Self> {
        match raw {
            Some(Value::String(text)) => Self::try_from(text),
            _ => Err(NumcountError::InvalidPayload),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TextInput {
    type Error = NumcountError;

    fn try_from(text: String) -> Result<Self> {
        if text.is_empty() {
            return Err(NumcountError::InvalidPayload);
        }
        Ok(Self(text))
    }
}

pub fn ingest_text(input: &TextInput) -> Result<IngestResult> {
    tally(input.as_str()).map_err(|_| NumcountError::NoNumbersFound(InputSource::Text))
}
