use std::cmp::Ordering;
use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};
use thiserror::Error;

/// Returned by [`aggregate`] when there is nothing to count.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("no tokens to aggregate")]
pub struct EmptyInput;

/// Occurrence count per distinct digit string.
///
/// Every key is a non-empty run of ASCII digits and every count is at least 1.
/// Serializes as a JSON object whose keys appear in ascending numeric order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyMap {
    counts: HashMap<String, u64>,
}

impl FrequencyMap {
    pub fn get(&self, token: &str) -> Option<u64> {
        self.counts.get(token).copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Entries ordered by the numeric value of the token.
    pub fn sorted_numerically(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|(a, _), (b, _)| numeric_cmp(a, b));
        entries
    }

    fn record(&mut self, token: &str) {
        match self.counts.get_mut(token) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(token.to_owned(), 1);
            }
        }
    }
}

impl Serialize for FrequencyMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.counts.len()))?;
        for (token, count) in self.sorted_numerically() {
            map.serialize_entry(token, &count)?;
        }
        map.end()
    }
}

/// Compare two digit strings by value without parsing, so arbitrarily long
/// tokens never overflow. Equal values (`"07"` vs `"7"`) fall back to string order.
fn numeric_cmp(a: &str, b: &str) -> Ordering {
    let a_digits = a.trim_start_matches('0');
    let b_digits = b.trim_start_matches('0');
    a_digits
        .len()
        .cmp(&b_digits.len())
        .then_with(|| a_digits.cmp(b_digits))
        .then_with(|| a.cmp(b))
}

/// Frequency map and token total for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestResult {
    frequency_map: FrequencyMap,
    total_count: u64,
}

impl IngestResult {
    pub fn frequency_map(&self) -> &FrequencyMap {
        &self.frequency_map
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn into_parts(self) -> (FrequencyMap, u64) {
        (self.frequency_map, self.total_count)
    }
}

/// Count tokens by exact string equality.
pub fn aggregate<'a, I>(tokens: I) -> Result<IngestResult, EmptyInput>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut frequency_map = FrequencyMap::default();
    let mut total_count = 0u64;

    for token in tokens {
        frequency_map.record(token);
        total_count += 1;
    }

    if total_count == 0 {
        return Err(EmptyInput);
    }

    Ok(IngestResult {
        frequency_map,
        total_count,
    })
}
