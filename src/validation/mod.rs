// src/validation/mod.rs
use std::path::Path;

use serde::Serialize;

use crate::extractors::countries::CountryTable;
use crate::extractors::holding::Holding;
use crate::utils::error::DocumentError;

/// Findings for one document's holdings. Errors mark invalid data, warnings suspicious data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Reads a holdings JSON array (as written by the extractor) for standalone validation.
pub fn load_holdings<P: AsRef<Path>>(path: P) -> Result<Vec<Holding>, DocumentError> {
    let raw = std::fs::read_to_string(path.as_ref())?;
    let holdings: Vec<Holding> = serde_json::from_str(&raw)?;
    tracing::debug!("Loaded {} holdings from {}", holdings.len(), path.as_ref().display());
    Ok(holdings)
}

/// Structural and sanity checks over the full holding sequence.
pub fn validate_holdings(holdings: &[Holding], countries: &CountryTable) -> ValidationReport {
    let mut report = ValidationReport::default();

    if holdings.is_empty() {
        report.errors.push("No holdings extracted.".to_string());
        return report;
    }

    let mut total_market_value = 0.0;

    for (idx, h) in holdings.iter().enumerate() {
        let ctx = format!("[row {}]", idx);

        if h.fund_name.trim().is_empty() {
            report.errors.push(format!("{} fund_name is empty.", ctx));
        }
        if h.security_name.trim().is_empty() {
            report.errors.push(format!("{} security_name is empty.", ctx));
        }
        if h.report_date.trim().is_empty() {
            report.warnings.push(format!("{} report_date is empty.", ctx));
        }

        if h.shares.is_none() && h.principal.is_none() && h.market_value.is_none() {
            report
                .warnings
                .push(format!("{} no numeric value present (shares, principal, or market_value).", ctx));
        }

        if let Some(iso3) = h.country_iso3.as_deref() {
            if !countries.is_known_code(iso3) {
                report
                    .warnings
                    .push(format!("{} country_iso3 '{}' is not in the known ISO3 list.", ctx, iso3));
            }
        }

        // Long-only funds: negative quantities are invalid.
        for (field, value) in [("shares", h.shares), ("principal", h.principal), ("market_value", h.market_value)] {
            if let Some(v) = value {
                if v < 0.0 {
                    report.errors.push(format!("{} {} is negative ({}).", ctx, field, v));
                }
            }
        }

        if let Some(v) = h.market_value {
            total_market_value += v;
        }

        if !h.security_name.trim().is_empty() && h.security_name.split_whitespace().count() < 2 {
            report.warnings.push(format!(
                "{} security_name '{}' has suspiciously few words.",
                ctx, h.security_name
            ));
        }
    }

    if total_market_value <= 0.0 {
        report
            .warnings
            .push("Total market_value across all holdings is non-positive.".to_string());
    }

    tracing::debug!(
        "Validated {} holdings: {} error(s), {} warning(s)",
        holdings.len(),
        report.errors.len(),
        report.warnings.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holding() -> Holding {
        Holding {
            fund_name: "Test Fund".to_string(),
            report_date: "December 31, 2024".to_string(),
            security_name: "Acme Corp".to_string(),
            security_type: Some("Common Stock".to_string()),
            country_iso3: Some("CAN".to_string()),
            sector: None,
            shares: Some(100.0),
            principal: None,
            market_value: Some(1234.0),
        }
    }

    #[test]
    fn test_empty_input_short_circuits() {
        let report = validate_holdings(&[], CountryTable::standard());
        assert_eq!(report.errors, vec!["No holdings extracted.".to_string()]);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_clean_holding() {
        let report = validate_holdings(&[holding()], CountryTable::standard());
        assert!(report.is_valid());
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    }

    #[test]
    fn test_negative_shares_is_error() {
        let mut h = holding();
        h.shares = Some(-100.0);
        let report = validate_holdings(&[h], CountryTable::standard());
        assert!(!report.is_valid());
        assert!(report.errors.iter().any(|e| e.contains("negative") && e.contains("-100")), "{:?}", report.errors);
    }

    #[test]
    fn test_no_numbers_is_warning_only() {
        let mut h = holding();
        h.shares = None;
        h.market_value = None;
        let other = holding();
        let report = validate_holdings(&[h, other], CountryTable::standard());
        assert!(report.is_valid(), "{:?}", report.errors);
        assert!(report.warnings.iter().any(|w| w.starts_with("[row 0] no numeric value")));
    }

    #[test]
    fn test_row_level_warnings_and_errors() {
        let mut h = holding();
        h.fund_name = String::new();
        h.report_date = String::new();
        h.country_iso3 = Some("XXX".to_string());
        h.security_name = "Acme".to_string();
        h.market_value = Some(0.0);
        let report = validate_holdings(&[h], CountryTable::standard());

        assert_eq!(report.errors, vec!["[row 0] fund_name is empty.".to_string()]);
        assert!(report.warnings.iter().any(|w| w.contains("report_date")));
        assert!(report.warnings.iter().any(|w| w.contains("'XXX'")));
        assert!(report.warnings.iter().any(|w| w.contains("few words")));
        assert!(report.warnings.iter().any(|w| w.contains("non-positive")));
    }

    #[test]
    fn test_load_holdings_then_validate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("holdings.json");
        let mut bad = holding();
        bad.shares = Some(-5.0);
        std::fs::write(&path, serde_json::to_string_pretty(&vec![holding(), bad]).unwrap()).unwrap();

        let loaded = load_holdings(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0], holding(), "Holdings survive the JSON hand-off unchanged");

        let report = validate_holdings(&loaded, CountryTable::standard());
        assert!(!report.is_valid(), "Negative shares must fail validation");
        assert!(report.errors.iter().any(|e| e.starts_with("[row 1]")), "{:?}", report.errors);
    }

    #[test]
    fn test_load_holdings_rejects_bad_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("holdings.json");
        std::fs::write(&path, "{\"not\": \"a list\"}").unwrap();

        assert!(matches!(load_holdings(&path), Err(DocumentError::Decode(_))));
        assert!(matches!(load_holdings(dir.path().join("missing.json")), Err(DocumentError::Io(_))));
    }
}
