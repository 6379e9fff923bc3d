// src/extractors/names.rs
use once_cell::sync::Lazy;
use regex::Regex;

static MULTI_SPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s{2,}").expect("Failed to compile MULTI_SPACE_RE"));

/// Re-inserts word boundaries the text source dropped from a security name.
///
/// A space goes before every uppercase letter that follows a character that is
/// neither whitespace, uppercase nor a comma, and after every comma directly
/// followed by a letter. Runs of whitespace collapse to one space.
/// Acronyms glued to words ("ABBLtd") can still be split wrongly.
pub fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 8);
    let mut prev: Option<char> = None;
    let mut chars = name.chars().peekable();

    while let Some(c) = chars.next() {
        if let Some(p) = prev {
            if c.is_ascii_uppercase() && !p.is_whitespace() && !p.is_ascii_uppercase() && p != ',' {
                out.push(' ');
            }
        }
        out.push(c);
        if c == ',' && chars.peek().is_some_and(|n| n.is_ascii_alphabetic()) {
            out.push(' ');
        }
        prev = Some(c);
    }

    MULTI_SPACE_RE.replace_all(&out, " ").trim().to_string()
}

/// Cuts `name` at the first occurrence of each boilerplate pattern, in order.
pub fn trim_boilerplate(name: &str, patterns: &[String]) -> String {
    let mut trimmed = name.to_string();
    for pattern in patterns {
        if let Some(idx) = trimmed.find(pattern.as_str()) {
            trimmed.truncate(idx);
            trimmed = trimmed.trim_end().to_string();
        }
    }
    trimmed
}

pub fn has_letters(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recovers_word_boundaries() {
        assert_eq!(normalize_name("AssaAbloyAB,ClassB"), "Assa Abloy AB, Class B");
        assert_eq!(normalize_name("ToyotaMotorCorp."), "Toyota Motor Corp.");
    }

    #[test]
    fn test_leaves_spaced_names_alone() {
        assert_eq!(normalize_name("  Royal Bank of Canada  "), "Royal Bank of Canada");
        assert_eq!(normalize_name("Nestle SA,  Registered"), "Nestle SA, Registered");
    }

    #[test]
    fn test_trim_boilerplate() {
        let patterns = vec!["( Cost".to_string(), "Investment Company".to_string()];
        assert_eq!(trim_boilerplate("Tencent Holdings Ltd. ( Cost $1,000)", &patterns), "Tencent Holdings Ltd.");
        assert_eq!(trim_boilerplate("Infosys Ltd.", &patterns), "Infosys Ltd.");
    }
}
