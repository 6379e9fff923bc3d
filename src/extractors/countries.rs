// src/extractors/countries.rs

// --- Imports ---
use once_cell::sync::Lazy;
use regex::Regex;

// Curated country name -> ISO3 pairs seen in report geographies. Declaration order is match order.
const COUNTRY_TO_ISO3: &[(&str, &str)] = &[
    ("Canada", "CAN"),
    ("Sweden", "SWE"),
    ("Switzerland", "CHE"),
    ("China", "CHN"),
    ("Taiwan", "TWN"),
    ("Denmark", "DNK"),
    ("France", "FRA"),
    ("Germany", "DEU"),
    ("India", "IND"),
    ("Italy", "ITA"),
    ("Japan", "JPN"),
    ("Netherlands", "NLD"),
    ("Norway", "NOR"),
    ("Finland", "FIN"),
    ("Belgium", "BEL"),
    ("Austria", "AUT"),
    ("Ireland", "IRL"),
    ("Portugal", "PRT"),
    ("Poland", "POL"),
    ("Czech Republic", "CZE"),
    ("Hungary", "HUN"),
    ("Singapore", "SGP"),
    ("South Korea", "KOR"),
    ("Spain", "ESP"),
    ("United Kingdom", "GBR"),
    ("United States", "USA"),
    ("Australia", "AUS"),
    ("New Zealand", "NZL"),
    ("Brazil", "BRA"),
    ("Mexico", "MEX"),
    ("Argentina", "ARG"),
    ("Chile", "CHL"),
    ("Colombia", "COL"),
    ("Peru", "PER"),
    ("Uruguay", "URY"),
    ("Philippines", "PHL"),
    ("Indonesia", "IDN"),
    ("Malaysia", "MYS"),
    ("Thailand", "THA"),
    ("Vietnam", "VNM"),
    ("Pakistan", "PAK"),
    ("Bangladesh", "BGD"),
    ("Turkey", "TUR"),
    ("Israel", "ISR"),
    ("Romania", "ROU"),
    ("Saudi Arabia", "SAU"),
    ("United Arab Emirates", "ARE"),
    ("Qatar", "QAT"),
    ("Kuwait", "KWT"),
    ("Bahrain", "BHR"),
    ("South Africa", "ZAF"),
    ("Egypt", "EGY"),
    ("Nigeria", "NGA"),
    ("Kenya", "KEN"),
    ("Morocco", "MAR"),
    ("Russia", "RUS"),
    ("Ukraine", "UKR"),
    ("Greece", "GRC"),
    ("Hong Kong", "HKG"),
    ("Slovenia", "SVN"),
];

// Hyphen, en dash, em dash.
const DASH_CLASS: &str = r"[\-\u{2013}\u{2014}]";

static STANDARD_TABLE: Lazy<CountryTable> = Lazy::new(|| CountryTable::new(COUNTRY_TO_ISO3));

#[derive(Debug)]
struct CountryEntry {
    iso3: String,
    // "<name>" as a whole word, then optional whitespace and a dash
    spaced: Regex,
    // the same rule for the name with its spaces removed, run against the whitespace-free line
    compact: Regex,
}

/// Load-once lookup of country headings such as "Canada—6.5%".
#[derive(Debug)]
pub struct CountryTable {
    entries: Vec<CountryEntry>,
}

impl CountryTable {
    /// Builds a table from (country name, ISO3) pairs.
    pub fn new(pairs: &[(&str, &str)]) -> Self {
        let entries = pairs
            .iter()
            .map(|(name, iso3)| {
                let compact_name: String = name.chars().filter(|c| !c.is_whitespace()).collect();
                CountryEntry {
                    iso3: iso3.to_string(),
                    spaced: Regex::new(&format!(r"\b{}\b\s*{}", regex::escape(name), DASH_CLASS))
                        .expect("country heading pattern is valid"),
                    compact: Regex::new(&format!(r"{}\s*{}", regex::escape(&compact_name), DASH_CLASS))
                        .expect("country heading pattern is valid"),
                }
            })
            .collect();
        Self { entries }
    }

    /// The curated table used by the engine unless another one is injected.
    pub fn standard() -> &'static CountryTable {
        &STANDARD_TABLE
    }

    /// ISO3 code for a country heading line, first table match wins.
    pub fn resolve(&self, line: &str) -> Option<&str> {
        let line_nospace: String = line.chars().filter(|c| !c.is_whitespace()).collect();
        self.entries
            .iter()
            .find(|entry| entry.spaced.is_match(line) || entry.compact.is_match(&line_nospace))
            .map(|entry| entry.iso3.as_str())
    }

    pub fn is_known_code(&self, iso3: &str) -> bool {
        self.entries.iter().any(|entry| entry.iso3 == iso3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_headings() {
        let table = CountryTable::standard();
        assert_eq!(table.resolve("Canada—6.5%"), Some("CAN"));
        assert_eq!(table.resolve("Brazil – 5.4%"), Some("BRA"));
        assert_eq!(table.resolve("China-28.8%"), Some("CHN"));
        assert_eq!(table.resolve("UnitedKingdom—15.7%"), Some("GBR"));
        assert_eq!(table.resolve("United Kingdom — 15.7%"), Some("GBR"));
    }

    #[test]
    fn test_no_dash_no_country() {
        let table = CountryTable::standard();
        assert_eq!(table.resolve("Bank of Canada 100 1,234"), None);
        assert_eq!(table.resolve("Royal Bank of Canada"), None);
        assert_eq!(table.resolve(""), None);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let table = CountryTable::standard();
        let first = table.resolve("Japan—20.1%").map(str::to_string);
        let second = table.resolve("Japan—20.1%").map(str::to_string);
        assert_eq!(first, second);
        assert_eq!(first.as_deref(), Some("JPN"));
    }

    #[test]
    fn test_injected_table() {
        let table = CountryTable::new(&[("Atlantis", "ATL")]);
        assert_eq!(table.resolve("Atlantis—1.0%"), Some("ATL"));
        assert_eq!(table.resolve("Canada—6.5%"), None);
        assert!(table.is_known_code("ATL"));
        assert!(!table.is_known_code("CAN"));
    }
}
