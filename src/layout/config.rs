// src/layout/config.rs

// --- Imports ---
use std::path::Path;

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::Deserialize;

use crate::utils::error::ConfigError;

// --- Defaults ---
// Column-header text that reappears when a schedule restarts a section mid-column.
pub const DEFAULT_RESTART_MARKERS: &[&str] = &["Investment Company", "Shares Dividend Rate"];

// Boilerplate that leaks into multi-line names (cost footnotes, sub-section headers).
pub const DEFAULT_NAME_TRIM_PATTERNS: &[&str] =
    &["( Cost", "Cost$", "Shares Dividend Rate", "Investment Company"];

// Layouts shipped with the crate; a config directory may add to or override these by id.
const BUILTIN_LAYOUTS: &[(&str, &str)] = &[
    (
        "blackrock_international.yaml",
        include_str!("../../configs/blackrock_international.yaml"),
    ),
    (
        "gsam_emerging_markets.yaml",
        include_str!("../../configs/gsam_emerging_markets.yaml"),
    ),
    (
        "hartford_convertible.yaml",
        include_str!("../../configs/hartford_convertible.yaml"),
    ),
];

static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Failed to compile WHITESPACE_RE"));

/// Removes every whitespace character.
pub fn strip_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, "").into_owned()
}

// --- Data Structures ---

/// Closed set of table shapes the engine knows how to assemble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutType {
    OneColumnLineNumeric,
    TwoColumnLineNumeric,
    TwoColumnMultilineSharesFirst,
    #[serde(alias = "hartford_custom")]
    TableRowPairs,
}

/// How holdings are assembled from lines for a given LayoutType.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblerMode {
    SingleLine,
    MultiLine,
    TableRowPairs,
}

impl LayoutType {
    pub fn assembler_mode(self) -> AssemblerMode {
        match self {
            LayoutType::OneColumnLineNumeric | LayoutType::TwoColumnLineNumeric => AssemblerMode::SingleLine,
            LayoutType::TwoColumnMultilineSharesFirst => AssemblerMode::MultiLine,
            LayoutType::TableRowPairs => AssemblerMode::TableRowPairs,
        }
    }
}

/// Immutable description of one document family.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    pub id: String,
    pub fund_name_patterns: Vec<Regex>,
    pub schedule_header: String,
    pub layout_type: LayoutType,
    pub columns: usize,
    pub shares_token_index: usize,
    pub value_token_index: usize,
    /// Ordered (line prefix, security type label) pairs.
    pub instrument_headers: Vec<(String, String)>,
    pub stop_line_prefixes: Vec<String>,
    pub stop_line_contains: Vec<String>,
    pub noise_prefixes: Vec<String>,
    /// Take the fund name from each page rather than from the document.
    pub multi_fund: bool,
    pub restart_markers: Vec<String>,
    pub name_trim_patterns: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawLayoutSection {
    #[serde(rename = "type")]
    layout_type: Option<LayoutType>,
    #[serde(default = "default_columns")]
    columns: usize,
    #[serde(default)]
    shares_token_index: usize,
    #[serde(default = "default_value_token_index")]
    value_token_index: usize,
}

fn default_columns() -> usize {
    1
}

fn default_value_token_index() -> usize {
    1
}

/// A layout record as written in YAML, before validation.
#[derive(Debug, Deserialize)]
struct RawLayoutRecord {
    id: Option<String>,
    #[serde(default)]
    fund_name_patterns: Vec<String>,
    schedule_header: Option<String>,
    layout: Option<RawLayoutSection>,
    #[serde(default)]
    instrument_headers: Option<serde_yaml::Mapping>,
    #[serde(default)]
    stop_line_prefixes: Vec<String>,
    #[serde(default)]
    stop_line_contains: Vec<String>,
    #[serde(default)]
    noise_prefixes: Vec<String>,
    #[serde(default)]
    multi_fund: bool,
    restart_markers: Option<Vec<String>>,
    name_trim_patterns: Option<Vec<String>>,
}

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl LayoutConfig {
    /// Parses and validates one YAML layout record. `source_name` only labels errors.
    pub fn from_yaml(source_name: &str, yaml: &str) -> Result<Self, ConfigError> {
        let raw: RawLayoutRecord = serde_yaml::from_str(yaml).map_err(|e| ConfigError::Yaml {
            source_name: source_name.to_string(),
            reason: e.to_string(),
        })?;
        Self::from_raw(source_name, raw)
    }

    fn from_raw(source_name: &str, raw: RawLayoutRecord) -> Result<Self, ConfigError> {
        let missing = |field: &'static str| ConfigError::MissingField {
            source_name: source_name.to_string(),
            field,
        };

        let id = raw.id.filter(|s| !s.trim().is_empty()).ok_or_else(|| missing("id"))?;
        let schedule_header = raw.schedule_header.ok_or_else(|| missing("schedule_header"))?;
        let layout = raw.layout.ok_or_else(|| missing("layout"))?;
        let layout_type = layout.layout_type.ok_or_else(|| missing("layout.type"))?;

        if layout.columns == 0 {
            return Err(ConfigError::InvalidField {
                source_name: source_name.to_string(),
                field: "layout.columns",
                reason: "must be at least 1".to_string(),
            });
        }

        let fund_name_patterns = raw
            .fund_name_patterns
            .iter()
            .map(|pattern| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| ConfigError::InvalidPattern {
                        source_name: source_name.to_string(),
                        pattern: pattern.clone(),
                        reason: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut instrument_headers = Vec::new();
        for (key, value) in raw.instrument_headers.unwrap_or_default() {
            match (key.as_str(), value.as_str()) {
                (Some(prefix), Some(label)) => instrument_headers.push((prefix.to_string(), label.to_string())),
                _ => {
                    return Err(ConfigError::InvalidField {
                        source_name: source_name.to_string(),
                        field: "instrument_headers",
                        reason: "keys and values must be strings".to_string(),
                    })
                }
            }
        }

        Ok(Self {
            id,
            fund_name_patterns,
            schedule_header,
            layout_type,
            columns: layout.columns,
            shares_token_index: layout.shares_token_index,
            value_token_index: layout.value_token_index,
            instrument_headers,
            stop_line_prefixes: raw.stop_line_prefixes,
            stop_line_contains: raw.stop_line_contains,
            noise_prefixes: raw.noise_prefixes,
            multi_fund: raw.multi_fund,
            restart_markers: raw.restart_markers.unwrap_or_else(|| owned(DEFAULT_RESTART_MARKERS)),
            name_trim_patterns: raw.name_trim_patterns.unwrap_or_else(|| owned(DEFAULT_NAME_TRIM_PATTERNS)),
        })
    }

    /// Minimal single-line layout; handy for callers that build configs in code.
    pub fn new(id: &str, schedule_header: &str, layout_type: LayoutType) -> Self {
        Self {
            id: id.to_string(),
            fund_name_patterns: Vec::new(),
            schedule_header: schedule_header.to_string(),
            layout_type,
            columns: 1,
            shares_token_index: 0,
            value_token_index: 1,
            instrument_headers: Vec::new(),
            stop_line_prefixes: Vec::new(),
            stop_line_contains: Vec::new(),
            noise_prefixes: Vec::new(),
            multi_fund: false,
            restart_markers: owned(DEFAULT_RESTART_MARKERS),
            name_trim_patterns: owned(DEFAULT_NAME_TRIM_PATTERNS),
        }
    }

    /// True when any fund name pattern matches the raw text or its whitespace-stripped form.
    pub fn matches_document(&self, text: &str, text_nospace: &str) -> bool {
        self.fund_name_patterns
            .iter()
            .any(|re| re.is_match(text) || re.is_match(text_nospace))
    }
}

/// All layouts known to a run. Loaded in full before any document is processed.
#[derive(Debug, Default)]
pub struct LayoutRegistry {
    configs: Vec<LayoutConfig>,
    /// Records that failed to load; the rest of the registry is unaffected.
    pub rejected: Vec<ConfigError>,
}

impl LayoutRegistry {
    /// Registry holding the layouts shipped with the crate.
    pub fn builtin() -> Self {
        let mut registry = Self::default();
        for (name, yaml) in BUILTIN_LAYOUTS {
            registry.add_yaml(name, yaml);
        }
        registry
    }

    pub fn from_configs(configs: Vec<LayoutConfig>) -> Self {
        Self {
            configs,
            rejected: Vec::new(),
        }
    }

    /// Loads every `*.yaml` file in `dir`, in file-name order.
    /// A missing directory is not an error: it simply contributes nothing.
    pub fn load_dir<P: AsRef<Path>>(&mut self, dir: P) -> Result<usize, ConfigError> {
        let dir = dir.as_ref();
        if !dir.exists() {
            tracing::warn!("Layout config directory {} does not exist", dir.display());
            return Ok(0);
        }

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("yaml") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut loaded = 0;
        for path in paths {
            let name = path.display().to_string();
            match std::fs::read_to_string(&path) {
                Ok(yaml) => {
                    if self.add_yaml(&name, &yaml) {
                        loaded += 1;
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to read layout config {}: {}", name, e);
                    self.rejected.push(ConfigError::Io(e));
                }
            }
        }
        tracing::info!("Loaded {} layout config(s) from {}", loaded, dir.display());
        Ok(loaded)
    }

    /// Parses one record and registers it, replacing any layout with the same id.
    /// Returns false (and records the error) when the record is malformed.
    pub fn add_yaml(&mut self, source_name: &str, yaml: &str) -> bool {
        match LayoutConfig::from_yaml(source_name, yaml) {
            Ok(config) => {
                self.insert(config);
                true
            }
            Err(e) => {
                tracing::error!("Rejected layout config: {}", e);
                self.rejected.push(e);
                false
            }
        }
    }

    pub fn insert(&mut self, config: LayoutConfig) {
        if let Some(existing) = self.configs.iter_mut().find(|c| c.id == config.id) {
            tracing::debug!("Layout '{}' overridden", config.id);
            *existing = config;
        } else {
            self.configs.push(config);
        }
    }

    pub fn get(&self, id: &str) -> Option<&LayoutConfig> {
        self.configs.iter().find(|c| c.id == id)
    }

    pub fn configs(&self) -> &[LayoutConfig] {
        &self.configs
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// First layout whose fund name patterns match the text of the opening pages.
    pub fn detect(&self, text: &str) -> Option<&LayoutConfig> {
        let text_nospace = strip_whitespace(text);
        let found = self.configs.iter().find(|c| c.matches_document(text, &text_nospace));
        match found {
            Some(config) => tracing::info!("Detected layout '{}'", config.id),
            None => tracing::debug!("No layout matched the document text"),
        }
        found
    }
}
