// src/extractors/metadata.rs
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::PageProvider;

const MONTHS: [&str; 12] = [
    "january", "february", "march", "april", "may", "june",
    "july", "august", "september", "october", "november", "december",
];

// A line that ends in "Fund", e.g. "Goldman Sachs Emerging Markets Equity Fund".
static FUND_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)^(.*Fund)\s*$").expect("Failed to compile FUND_NAME_RE"));

static REPORT_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(January|February|March|April|May|June|July|August|September|October|November|December)\s*\.?\s*(\d{1,2}),\s*(\d{4})",
    )
    .expect("Failed to compile REPORT_DATE_RE")
});

/// Concatenated text of the first `pages` pages, used for layout detection and metadata.
pub fn opening_text<P: PageProvider + ?Sized>(doc: &P, pages: usize) -> String {
    (0..doc.page_count().min(pages))
        .map(|idx| doc.page_text(idx))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Best-effort fund name: the first line ending in "Fund", else `default`.
pub fn guess_fund_name(text: &str, default: &str) -> String {
    FUND_NAME_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// First valid "<Month> <day>, <year>" in the text, normalised to "December 31, 2024".
pub fn guess_report_date(text: &str) -> Option<String> {
    REPORT_DATE_RE.captures_iter(text).find_map(|caps| {
        let month_name = caps.get(1)?.as_str().to_lowercase();
        let month = MONTHS.iter().position(|m| *m == month_name)? as u32 + 1;
        let day: u32 = caps.get(2)?.as_str().parse().ok()?;
        let year: i32 = caps.get(3)?.as_str().parse().ok()?;
        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        Some(date.format("%B %-d, %Y").to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_fund_name() {
        let text = "Annual Report\nGoldman Sachs Emerging Markets Equity Fund\nSchedule of Investments";
        assert_eq!(guess_fund_name(text, "fallback"), "Goldman Sachs Emerging Markets Equity Fund");
        assert_eq!(guess_fund_name("Schedule of Investments", "fallback"), "fallback");
    }

    #[test]
    fn test_guess_report_date() {
        assert_eq!(guess_report_date("As of DECEMBER 31, 2024").as_deref(), Some("December 31, 2024"));
        assert_eq!(guess_report_date("October 1,2023 (Unaudited)").as_deref(), Some("October 1, 2023"));
        assert_eq!(
            guess_report_date("February 30, 2024 then March 31, 2024").as_deref(),
            Some("March 31, 2024"),
            "Impossible dates are skipped"
        );
        assert_eq!(guess_report_date("no date here"), None);
    }
}
