// src/fallback/mod.rs
//
// OCR and model-based extraction are capabilities the engine can ask for. None is
// wired up yet, so callers get an explicit NotAvailable instead of an empty result.

use std::collections::BTreeMap;

use crate::document::PageProvider;
use crate::extractors::holding::{DocumentContext, Holding};
use crate::utils::error::FallbackError;

/// Recovers text for pages the provider returned empty.
pub trait OcrFallback {
    fn page_texts(&self, doc: &dyn PageProvider, pages: &[usize]) -> Result<BTreeMap<usize, String>, FallbackError>;
}

/// Extracts holdings directly when the layout-driven engine found none.
pub trait HoldingsFallback {
    fn extract_holdings(&self, doc: &dyn PageProvider, context: &DocumentContext) -> Result<Vec<Holding>, FallbackError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableFallback;

impl OcrFallback for UnavailableFallback {
    fn page_texts(&self, _doc: &dyn PageProvider, _pages: &[usize]) -> Result<BTreeMap<usize, String>, FallbackError> {
        Err(FallbackError::NotAvailable("OCR"))
    }
}

impl HoldingsFallback for UnavailableFallback {
    fn extract_holdings(&self, _doc: &dyn PageProvider, _context: &DocumentContext) -> Result<Vec<Holding>, FallbackError> {
        Err(FallbackError::NotAvailable("AI holdings extraction"))
    }
}
