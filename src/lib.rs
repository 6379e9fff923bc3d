// src/lib.rs
//! Layout-driven extraction of holdings from fund Schedule of Investments text.

pub mod document;
pub mod extractors;
pub mod fallback;
pub mod layout;
pub mod utils;
pub mod validation;

pub use document::{DocumentDump, PageProvider};
pub use extractors::{CountryTable, DocumentContext, Holding, HoldingsExtractor};
pub use layout::{LayoutConfig, LayoutRegistry, LayoutType};
pub use validation::{validate_holdings, ValidationReport};
