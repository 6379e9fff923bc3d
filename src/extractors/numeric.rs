// src/extractors/numeric.rs
use once_cell::sync::Lazy;
use regex::Regex;

static NUMERIC_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9][0-9,]*").expect("Failed to compile NUMERIC_TOKEN_RE"));

// Currency symbols and footnote markers (asterisks, dagger, double dagger).
const STRIPPED_CHARS: &[char] = &[',', '$', '€', '£', '¥', '*', '\u{2020}', '\u{2021}'];

/// A run of digits and embedded commas, with its byte offset in the source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumericToken<'a> {
    pub start: usize,
    pub text: &'a str,
}

/// Every numeric token of `line`, in order of appearance.
pub fn numeric_tokens(line: &str) -> Vec<NumericToken<'_>> {
    NUMERIC_TOKEN_RE
        .find_iter(line)
        .map(|m| NumericToken {
            start: m.start(),
            text: m.as_str(),
        })
        .collect()
}

/// Cleans and parses a numeric field. Blank values, dash sentinels and anything
/// unparseable all come back as `None`.
pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| !STRIPPED_CHARS.contains(c)).collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() || cleaned == "-" || cleaned == "\u{2014}" {
        return None;
    }
    cleaned.parse::<f64>().ok()
}
