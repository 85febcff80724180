//! Number extraction and counting.
//!
//! Both ingest paths funnel their text through the same two steps:
//! [`tokenize`] pulls every maximal run of ASCII digits out of a string, and
//! [`aggregate`] folds those tokens into a [`FrequencyMap`] plus a total.
//! Tokens are compared as strings, so `"07"` and `"7"` are counted separately.

mod aggregate;
mod tokenizer;

pub use aggregate::{aggregate, EmptyInput, FrequencyMap, IngestResult};
pub use tokenizer::tokenize;

/// Tokenize `text` and aggregate the result in one pass.
pub fn tally(text: &str) -> Result<IngestResult, EmptyInput> {
    aggregate(tokenize(text))
}
