// src/extractors/table_pairs.rs
//
// Tables where a security's name sits in one row and its principal / market value in
// the next numeric row.

use crate::document::PageProvider;
use crate::extractors::holding::{DocumentContext, Holding};
use crate::extractors::names::normalize_name;
use crate::extractors::numeric::parse_number;
use crate::layout::config::LayoutConfig;

// Pages scanned from the first schedule page onwards.
const MAX_SCHEDULE_PAGES: usize = 5;

fn cell_text(cell: &Option<String>) -> &str {
    cell.as_deref().unwrap_or("")
}

/// Sector headings look like "Airlines - 0.0%": the text before the dash.
fn sector_heading(line: &str) -> Option<&str> {
    if !(line.contains('-') && line.contains('%')) {
        return None;
    }
    line.split('-').next().map(str::trim).filter(|s| !s.is_empty())
}

pub fn extract_table_row_pairs<P: PageProvider + ?Sized>(
    doc: &P,
    config: &LayoutConfig,
    context: &DocumentContext,
) -> Vec<Holding> {
    let header_lower = config.schedule_header.to_lowercase();
    if header_lower.trim().is_empty() {
        return Vec::new();
    }
    let Some(start) = (0..doc.page_count()).find(|&idx| doc.page_text(idx).to_lowercase().contains(&header_lower))
    else {
        tracing::warn!("[layout:{}] no page contains '{}'", config.id, config.schedule_header);
        return Vec::new();
    };

    let end = (start + MAX_SCHEDULE_PAGES).min(doc.page_count());
    tracing::debug!("[layout:{}] scanning table pages {}..{}", config.id, start, end);

    let mut holdings = Vec::new();
    let mut security_type: Option<String> = None;
    let mut sector: Option<String> = None;
    let mut last_name: Option<String> = None;

    for page_idx in start..end {
        for line in doc.page_text(page_idx).lines() {
            let lower = line.to_lowercase();
            if let Some((_, label)) = config
                .instrument_headers
                .iter()
                .find(|(header, _)| lower.contains(&header.to_lowercase()))
            {
                security_type = Some(label.clone());
            }
            if let Some(heading) = sector_heading(line) {
                sector = Some(heading.to_string());
            }
        }

        for table in doc.page_tables(page_idx) {
            for row in table {
                if row.iter().all(|cell| cell_text(cell).trim().is_empty()) {
                    continue;
                }

                let has_money = row.iter().any(|cell| parse_number(cell_text(cell)).is_some());
                if !has_money {
                    let candidate = row
                        .iter()
                        .map(cell_text)
                        .filter(|c| !c.is_empty())
                        .collect::<Vec<_>>()
                        .join(" ");
                    let candidate = candidate.trim();
                    let lower = candidate.to_lowercase();
                    if !candidate.is_empty() && !lower.contains("total") && !lower.contains(&header_lower) {
                        last_name = Some(candidate.to_string());
                    }
                    continue;
                }

                let (principal, market_value) = if row.len() >= 2 {
                    (parse_number(cell_text(&row[0])), parse_number(cell_text(&row[1])))
                } else {
                    (None, None)
                };

                let Some(name) = last_name.as_deref().map(normalize_name).filter(|n| !n.is_empty()) else {
                    continue;
                };

                holdings.push(Holding {
                    fund_name: context.fund_name.clone(),
                    report_date: context.report_date.clone(),
                    security_name: name,
                    security_type: security_type.clone(),
                    country_iso3: None,
                    sector: sector.clone(),
                    shares: None,
                    principal,
                    market_value,
                });
            }
        }
    }

    tracing::info!("[layout:{}] extracted {} holdings from tables", config.id, holdings.len());
    holdings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentDump, PageDump};
    use crate::layout::config::LayoutType;

    fn cells(values: &[&str]) -> Vec<Option<String>> {
        values
            .iter()
            .map(|v| if v.is_empty() { None } else { Some(v.to_string()) })
            .collect()
    }

    #[test]
    fn test_name_row_then_value_row() {
        let mut cfg = LayoutConfig::new("hartford", "Schedule of Investments", LayoutType::TableRowPairs);
        cfg.instrument_headers = vec![("Convertible Bonds".to_string(), "Convertible Bonds".to_string())];

        let mut page = PageDump::from_text(600.0, 800.0, "Schedule of Investments\nConvertible Bonds - 95.1%\nAirlines - 2.0%");
        page.tables = vec![vec![
            cells(&["Security", "Value"]),
            cells(&["", ""]),
            cells(&["AmericanAirlines Group, Inc.", ""]),
            cells(&["1,500,000", "1,620,000"]),
            cells(&["Total Airlines", ""]),
            cells(&["2,000", "—"]),
        ]];
        let doc = DocumentDump::from_pages(vec![PageDump::from_text(600.0, 800.0, "Cover"), page]);

        let holdings = extract_table_row_pairs(&doc, &cfg, &DocumentContext::new("The Hartford Fund", "October 31, 2024"));
        assert_eq!(holdings.len(), 2, "{:?}", holdings);

        let first = &holdings[0];
        assert_eq!(first.security_name, "American Airlines Group, Inc.");
        assert_eq!(first.principal, Some(1_500_000.0));
        assert_eq!(first.market_value, Some(1_620_000.0));
        assert_eq!(first.shares, None);
        assert_eq!(first.security_type.as_deref(), Some("Convertible Bonds"));
        assert_eq!(first.sector.as_deref(), Some("Airlines"));

        // "Total" rows never replace the pending name; the dash value degrades to None.
        assert_eq!(holdings[1].security_name, "American Airlines Group, Inc.");
        assert_eq!(holdings[1].market_value, None);
    }

    #[test]
    fn test_no_schedule_page() {
        let cfg = LayoutConfig::new("hartford", "Schedule of Investments", LayoutType::TableRowPairs);
        let doc = DocumentDump::from_pages(vec![PageDump::from_text(600.0, 800.0, "Cover")]);
        assert!(extract_table_row_pairs(&doc, &cfg, &DocumentContext::default()).is_empty());
    }

    #[test]
    fn test_sector_heading() {
        assert_eq!(sector_heading("Airlines - 0.0%"), Some("Airlines"));
        assert_eq!(sector_heading("Airlines 0.0%"), None);
        assert_eq!(sector_heading("- 1.0%"), None);
    }

    #[test]
    fn test_start_page_header_match_ignores_case_only() {
        let cfg = LayoutConfig::new("hartford", "Schedule of Investments", LayoutType::TableRowPairs);

        let mut squashed = PageDump::from_text(600.0, 800.0, "ScheduleofInvestments");
        squashed.tables = vec![vec![cells(&["Skipped Corp", ""]), cells(&["1,000", "1,100"])]];
        let mut upper = PageDump::from_text(600.0, 800.0, "SCHEDULE OF INVESTMENTS");
        upper.tables = vec![vec![cells(&["Found Corp", ""]), cells(&["2,000", "2,200"])]];
        let doc = DocumentDump::from_pages(vec![squashed, upper]);

        let holdings = extract_table_row_pairs(&doc, &cfg, &DocumentContext::default());
        assert_eq!(holdings.len(), 1, "Scan starts at the upper-case header page: {:?}", holdings);
        assert_eq!(holdings[0].security_name, "Found Corp");
        assert_eq!(holdings[0].market_value, Some(2_200.0));
    }
}
