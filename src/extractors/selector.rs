// src/extractors/selector.rs

// --- Imports ---
use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::{BBox, PageProvider};
use crate::layout::config::{strip_whitespace, LayoutConfig};

// A holdings row: starts with a share count and ends with a value.
static HOLDINGS_ROW_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9][0-9,]*\s+.*[0-9][0-9,]+$").expect("Failed to compile HOLDINGS_ROW_RE")
});

const MIN_HOLDINGS_ROWS: usize = 3;

/// Whitespace- and case-insensitive substring test, tolerating headers split
/// across lines ("Schedule of\nInvestments").
pub fn contains_normalized(haystack: &str, needle: &str) -> bool {
    if haystack.is_empty() || needle.is_empty() {
        return false;
    }
    strip_whitespace(haystack)
        .to_lowercase()
        .contains(&strip_whitespace(needle).to_lowercase())
}

/// Pages whose text carries the schedule header.
pub fn anchor_pages<P: PageProvider + ?Sized>(doc: &P, config: &LayoutConfig) -> Vec<usize> {
    (0..doc.page_count())
        .filter(|&idx| contains_normalized(&doc.page_text(idx), &config.schedule_header))
        .collect()
}

/// True when a page without the header still looks like part of the holdings table.
fn looks_like_holdings(text: &str, config: &LayoutConfig) -> bool {
    if text.trim().is_empty() {
        return false;
    }

    let text_nospace = strip_whitespace(text);
    let has_instrument_header = config
        .instrument_headers
        .iter()
        .any(|(header, _)| text.contains(header.as_str()) || text_nospace.contains(&strip_whitespace(header)));
    if has_instrument_header {
        return true;
    }

    text.lines()
        .filter(|line| HOLDINGS_ROW_RE.is_match(line.trim()))
        .take(MIN_HOLDINGS_ROWS)
        .count()
        >= MIN_HOLDINGS_ROWS
}

/// Ordered page indices to scan for holdings.
///
/// Anchor pages plus every page between the first and last anchor that looks like a
/// continuation of the table. No anchors means nothing to scan.
pub fn select_pages<P: PageProvider + ?Sized>(doc: &P, config: &LayoutConfig) -> Vec<usize> {
    let anchors = anchor_pages(doc, config);
    tracing::debug!("[layout:{}] anchor pages: {:?}", config.id, anchors);

    let (Some(&first), Some(&last)) = (anchors.first(), anchors.last()) else {
        tracing::warn!("[layout:{}] no page contains '{}'", config.id, config.schedule_header);
        return Vec::new();
    };

    let mut selected: BTreeSet<usize> = anchors.iter().copied().collect();
    for idx in first..=last {
        if selected.contains(&idx) {
            continue;
        }
        if looks_like_holdings(&doc.page_text(idx), config) {
            tracing::debug!("[layout:{}] page {} continues the schedule", config.id, idx);
            selected.insert(idx);
        }
    }

    let pages: Vec<usize> = selected.into_iter().collect();
    tracing::debug!("[layout:{}] selected pages {}-{}: {:?}", config.id, first, last, pages);
    pages
}

/// Splits a page into `columns` equal full-height vertical bands, left to right.
pub fn column_boxes(width: f64, height: f64, columns: usize) -> Vec<BBox> {
    if columns <= 1 {
        return vec![BBox::new(0.0, 0.0, width, height)];
    }
    let col_width = width / columns as f64;
    (0..columns)
        .map(|i| BBox::new(col_width * i as f64, 0.0, col_width * (i + 1) as f64, height))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentDump, PageDump};
    use crate::layout::config::LayoutType;

    fn config() -> LayoutConfig {
        let mut cfg = LayoutConfig::new("test", "Schedule of Investments", LayoutType::OneColumnLineNumeric);
        cfg.instrument_headers = vec![("Common Stocks".to_string(), "Common Stock".to_string())];
        cfg
    }

    fn doc(pages: &[&str]) -> DocumentDump {
        DocumentDump::from_pages(pages.iter().map(|t| PageDump::from_text(600.0, 800.0, t)).collect())
    }

    #[test]
    fn test_contains_normalized() {
        assert!(contains_normalized("SCHEDULE OF\nINVESTMENTS (continued)", "Schedule of Investments"));
        assert!(contains_normalized("ScheduleofInvestments", "Schedule of Investments"));
        assert!(!contains_normalized("", "Schedule of Investments"));
        assert!(!contains_normalized("Statement of Operations", "Schedule of Investments"));
    }

    #[test]
    fn test_range_between_anchors_includes_continuations() {
        let doc = doc(&[
            "Letter to shareholders",
            "Schedule of Investments\nAcme 100 1,000",
            "CommonStocks (continued)\nBeta 5 50",
            "Notes to financial statements",
            "100 Gamma Corp 1,000\n200 Delta 2,000\n300 Epsilon 3,000",
            "Schedule of Investments (continued)",
            "Financial Highlights",
        ]);
        assert_eq!(select_pages(&doc, &config()), vec![1, 2, 4, 5]);
    }

    #[test]
    fn test_no_anchor_selects_nothing() {
        let doc = doc(&["Common Stocks\nAcme 1 2", "Other"]);
        assert!(select_pages(&doc, &config()).is_empty());
    }

    #[test]
    fn test_two_holdings_rows_are_not_enough() {
        assert!(!looks_like_holdings("1 A 1\n2 B 22", &config()));
        assert!(looks_like_holdings("1 A 11\n2 B 22\n3 C 33", &config()));
    }

    #[test]
    fn test_column_boxes() {
        let single = column_boxes(600.0, 800.0, 1);
        assert_eq!(single, vec![BBox::new(0.0, 0.0, 600.0, 800.0)]);

        let three = column_boxes(600.0, 800.0, 3);
        assert_eq!(three.len(), 3);
        assert_eq!(three[1], BBox::new(200.0, 0.0, 400.0, 800.0));
        assert!(three.iter().all(|b| b.height() == 800.0));
    }
}
