// src/utils/error.rs
use thiserror::Error;

// Errors raised while turning a declarative layout record into a LayoutConfig.
// Each one is fatal for the record (or file) it came from, never for the registry.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Layout record '{source_name}' is missing required field '{field}'")]
    MissingField {
        source_name: String,
        field: &'static str,
    },

    #[error("Layout record '{source_name}' has an invalid '{field}': {reason}")]
    InvalidField {
        source_name: String,
        field: &'static str,
        reason: String,
    },

    #[error("Layout record '{source_name}' has an invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        source_name: String,
        pattern: String,
        reason: String,
    },

    #[error("Failed to parse layout YAML '{source_name}': {reason}")]
    Yaml { source_name: String, reason: String },

    #[error("I/O error reading layout configs: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("I/O error reading page dump: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode page dump: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("No layout config matches this document; pass --layout to force one")]
    NoMatchingLayout,

    #[error("Layout '{0}' is not registered")]
    UnknownLayout(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FallbackError {
    #[error("{0} fallback is not available")]
    NotAvailable(&'static str),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Failed to serialize holdings: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Validation failed with {0} error(s)")]
    Validation(usize),
}
