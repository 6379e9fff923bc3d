// src/extractors/holding.rs
use serde::{Deserialize, Serialize};

/// One security position from a Schedule of Investments.
/// Created once by an assembler and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub fund_name: String,
    pub report_date: String,
    pub security_name: String,
    pub security_type: Option<String>,
    pub country_iso3: Option<String>,
    pub sector: Option<String>,
    pub shares: Option<f64>,
    pub principal: Option<f64>,
    pub market_value: Option<f64>,
}

/// Fund-level values carried onto every holding of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentContext {
    pub fund_name: String,
    pub report_date: String,
}

impl DocumentContext {
    pub fn new(fund_name: &str, report_date: &str) -> Self {
        Self {
            fund_name: fund_name.to_string(),
            report_date: report_date.to_string(),
        }
    }
}
