use std::sync::OnceLock;

use regex::Regex;

static NUMBER_PATTERN: OnceLock<Regex> = OnceLock::new();

// `\d` is Unicode-aware in `regex`; only ASCII digits count as numbers here.
fn number_pattern() -> &'static Regex {
    NUMBER_PATTERN.get_or_init(|| Regex::new("[0-9]+").expect("digit pattern is valid"))
}

/// Lazily yield every maximal run of ASCII digits in `text`, left to right.
///
/// Everything else is a separator: `"-5"` yields `"5"` and `"3.14"` yields
/// `"3"` then `"14"`. Leading zeros are kept as written.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> + '_ {
    number_pattern().find_iter(text).map(|m| m.as_str())
}
