// src/extractors/assembler.rs

// --- Imports ---
use once_cell::sync::Lazy;
use regex::Regex;

use crate::extractors::countries::CountryTable;
use crate::extractors::holding::{DocumentContext, Holding};
use crate::extractors::names::{has_letters, normalize_name, trim_boilerplate};
use crate::extractors::numeric::{numeric_tokens, parse_number};
use crate::layout::config::{strip_whitespace, AssemblerMode, LayoutConfig};

// First line of a multi-line holding: share count, then the start of the description.
static SHARES_FIRST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([0-9][0-9,]*)\s+(.*)$").expect("Failed to compile SHARES_FIRST_RE")
});

/// Heading state carried while scanning one column.
///
/// `current_security_type` lives for the whole document scan; the country is
/// cleared at the start of every column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsingState {
    pub current_security_type: Option<String>,
    pub current_country_iso3: Option<String>,
}

impl ParsingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_column(&mut self) {
        self.current_country_iso3 = None;
    }
}

/// What the classifier decided about one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineAction<'l> {
    /// Heading, noise or non-data: nothing to assemble.
    Skip,
    /// End of the table for this column.
    Stop,
    /// Candidate holding text.
    Data(&'l str),
}

// --- Multi-line accumulation ---

#[derive(Debug, Clone, PartialEq)]
struct PendingHolding {
    name_parts: Vec<String>,
    shares: Option<f64>,
    value: Option<f64>,
    country_iso3: Option<String>,
    security_type: Option<String>,
}

/// Pending-record buffers for the multi-line mode, threaded explicitly through the scan.
#[derive(Debug, Default)]
pub struct MultiLineAccumulator {
    pending: Option<PendingHolding>,
}

impl MultiLineAccumulator {
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Opens a new record from a shares-first line. Returns the record it displaced.
    fn start(&mut self, shares_token: &str, remainder: &str, state: &ParsingState) -> Option<PendingHolding> {
        let previous = self.pending.take();

        let (value_token, desc) = split_trailing_value(remainder);
        let mut name_parts = Vec::new();
        if !desc.is_empty() {
            name_parts.push(desc.to_string());
        }

        self.pending = Some(PendingHolding {
            name_parts,
            shares: parse_number(shares_token),
            value: value_token.and_then(parse_number),
            country_iso3: state.current_country_iso3.clone(),
            security_type: state.current_security_type.clone(),
        });
        previous
    }

    /// Adds a continuation line to the open record; ignored when nothing is open.
    fn extend(&mut self, line: &str) {
        let Some(pending) = self.pending.as_mut() else {
            tracing::trace!("Continuation line with no pending holding ignored: '{}'", line);
            return;
        };

        let (value_token, desc) = split_trailing_value(line);
        if let Some(token) = value_token {
            pending.value = parse_number(token);
        }
        if !desc.is_empty() {
            pending.name_parts.push(desc.to_string());
        }
    }

    fn take(&mut self) -> Option<PendingHolding> {
        self.pending.take()
    }

    pub fn reset(&mut self) {
        self.pending = None;
    }
}

/// Splits off the last numeric token (the value). The text before it, minus trailing `$`
/// and spaces, is the description; without a token the whole text is description.
fn split_trailing_value(text: &str) -> (Option<&str>, &str) {
    match numeric_tokens(text).last() {
        Some(token) => (Some(token.text), text[..token.start].trim_end_matches(['$', ' ']).trim()),
        None => (None, text.trim()),
    }
}

// --- Classifier & assembler ---

/// Walks the lines of one column and assembles holdings according to the layout's mode.
pub struct HoldingAssembler<'a> {
    config: &'a LayoutConfig,
    countries: &'a CountryTable,
    mode: AssemblerMode,
}

impl<'a> HoldingAssembler<'a> {
    pub fn new(config: &'a LayoutConfig, countries: &'a CountryTable) -> Self {
        Self {
            config,
            countries,
            mode: config.layout_type.assembler_mode(),
        }
    }

    fn starts_with_any(line: &str, line_nospace: &str, prefixes: &[String]) -> bool {
        prefixes
            .iter()
            .any(|p| line.starts_with(p.as_str()) || line_nospace.starts_with(&strip_whitespace(p)))
    }

    fn is_stop_line(&self, line: &str, line_nospace: &str) -> bool {
        if Self::starts_with_any(line, line_nospace, &self.config.stop_line_prefixes) {
            return true;
        }
        if self.config.stop_line_contains.iter().any(|s| line.contains(s.as_str())) {
            return true;
        }
        // A repeated column header means a new section starts; treat it as the end.
        self.mode == AssemblerMode::MultiLine
            && self.config.restart_markers.iter().any(|m| line.contains(m.as_str()))
    }

    /// Classifies one trimmed, non-empty line, updating heading state as a side effect.
    pub fn classify<'l>(&self, line: &'l str, state: &mut ParsingState) -> LineAction<'l> {
        if let Some((_, label)) = self
            .config
            .instrument_headers
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix.as_str()))
        {
            tracing::trace!("Instrument header '{}' -> {}", line, label);
            state.current_security_type = Some(label.clone());
        }

        if let Some(iso3) = self.countries.resolve(line) {
            tracing::trace!("Country heading '{}' -> {}", line, iso3);
            state.current_country_iso3 = Some(iso3.to_string());
            return LineAction::Skip;
        }

        let line_nospace = strip_whitespace(line);
        if self.is_stop_line(line, &line_nospace) {
            tracing::debug!("[layout:{}] stop line '{}'", self.config.id, line);
            return LineAction::Stop;
        }

        if Self::starts_with_any(line, &line_nospace, &self.config.noise_prefixes) {
            return LineAction::Skip;
        }

        let is_data = match self.mode {
            AssemblerMode::MultiLine => line.chars().any(|c| c.is_ascii_alphanumeric()),
            _ => has_letters(line),
        };
        if !is_data {
            return LineAction::Skip;
        }

        LineAction::Data(line)
    }

    /// Scans one column (or whole page) of text. `state` carries the instrument type
    /// across columns; the country is reset here.
    pub fn scan_column(&self, text: &str, context: &DocumentContext, state: &mut ParsingState) -> Vec<Holding> {
        state.begin_column();
        match self.mode {
            AssemblerMode::SingleLine => self.scan_single_line(text, context, state),
            AssemblerMode::MultiLine => self.scan_multi_line(text, context, state),
            AssemblerMode::TableRowPairs => {
                tracing::warn!("[layout:{}] table row-pair layouts are not line-scanned", self.config.id);
                Vec::new()
            }
        }
    }

    fn scan_single_line(&self, text: &str, context: &DocumentContext, state: &mut ParsingState) -> Vec<Holding> {
        let mut holdings = Vec::new();
        let max_index = self.config.shares_token_index.max(self.config.value_token_index);

        for raw_line in text.lines() {
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }

            let line = match self.classify(line, state) {
                LineAction::Stop => break,
                LineAction::Skip => continue,
                LineAction::Data(line) => line,
            };

            let tokens = numeric_tokens(line);
            if tokens.len() <= max_index {
                tracing::trace!("Too few numeric tokens ({}, need index {}): '{}'", tokens.len(), max_index, line);
                continue;
            }

            let shares_token = tokens[self.config.shares_token_index];
            let value_token = tokens[self.config.value_token_index];

            let name = line[..shares_token.start].trim_end_matches(['.', ' ']).trim();
            let security_name = normalize_name(name);
            if security_name.is_empty() {
                continue;
            }

            holdings.push(Holding {
                fund_name: context.fund_name.clone(),
                report_date: context.report_date.clone(),
                security_name,
                security_type: state.current_security_type.clone(),
                country_iso3: state.current_country_iso3.clone(),
                sector: None,
                shares: parse_number(shares_token.text),
                principal: None,
                market_value: parse_number(value_token.text),
            });
        }

        holdings
    }

    fn scan_multi_line(&self, text: &str, context: &DocumentContext, state: &mut ParsingState) -> Vec<Holding> {
        let mut holdings = Vec::new();
        let mut acc = MultiLineAccumulator::default();

        for raw_line in text.lines() {
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }

            let line = match self.classify(line, state) {
                LineAction::Stop => break,
                LineAction::Skip => continue,
                LineAction::Data(line) => line,
            };

            if let Some(caps) = SHARES_FIRST_RE.captures(line) {
                let shares = caps.get(1).map_or("", |m| m.as_str());
                let remainder = caps.get(2).map_or("", |m| m.as_str());
                if let Some(previous) = acc.start(shares, remainder, state) {
                    holdings.extend(self.finalize(previous, context));
                }
            } else {
                acc.extend(line);
            }
        }

        // Column end, or a stop line: flush whatever is still open.
        if let Some(pending) = acc.take() {
            holdings.extend(self.finalize(pending, context));
        }

        holdings
    }

    /// Turns a pending record into a Holding when it has shares, a value and a usable name.
    fn finalize(&self, pending: PendingHolding, context: &DocumentContext) -> Option<Holding> {
        let (shares, market_value) = match (pending.shares, pending.value) {
            (Some(shares), Some(value)) => (shares, value),
            _ => {
                tracing::trace!("Dropping pending holding without shares/value: {:?}", pending.name_parts);
                return None;
            }
        };
        if pending.name_parts.is_empty() {
            return None;
        }

        let name = normalize_name(&pending.name_parts.join(" "));
        let name = trim_boilerplate(&name, &self.config.name_trim_patterns);
        if name.is_empty() || !has_letters(&name) {
            return None;
        }

        Some(Holding {
            fund_name: context.fund_name.clone(),
            report_date: context.report_date.clone(),
            security_name: name,
            security_type: pending.security_type,
            country_iso3: pending.country_iso3,
            sector: None,
            shares: Some(shares),
            principal: None,
            market_value: Some(market_value),
        })
    }
}
