// src/extractors/engine.rs

// --- Imports ---
use crate::document::PageProvider;
use crate::extractors::assembler::{HoldingAssembler, ParsingState};
use crate::extractors::countries::CountryTable;
use crate::extractors::holding::{DocumentContext, Holding};
use crate::extractors::metadata::guess_fund_name;
use crate::extractors::selector::{column_boxes, select_pages};
use crate::extractors::table_pairs::extract_table_row_pairs;
use crate::layout::config::{AssemblerMode, LayoutConfig};

/// Layout-driven extraction of one document's Schedule of Investments.
pub struct HoldingsExtractor<'a> {
    config: &'a LayoutConfig,
    countries: &'a CountryTable,
}

impl<'a> HoldingsExtractor<'a> {
    pub fn new(config: &'a LayoutConfig) -> Self {
        Self::with_countries(config, CountryTable::standard())
    }

    pub fn with_countries(config: &'a LayoutConfig, countries: &'a CountryTable) -> Self {
        Self { config, countries }
    }

    pub fn config(&self) -> &LayoutConfig {
        self.config
    }

    /// Holdings in source order: page ascending, then column, then line.
    /// An empty result means nothing was found; it is not an error.
    pub fn extract<P: PageProvider + ?Sized>(&self, doc: &P, context: &DocumentContext) -> Vec<Holding> {
        tracing::info!(
            "Extracting with layout '{}' ({:?}, {} column(s)) from {} page(s)",
            self.config.id,
            self.config.layout_type,
            self.config.columns,
            doc.page_count()
        );

        if self.config.layout_type.assembler_mode() == AssemblerMode::TableRowPairs {
            return extract_table_row_pairs(doc, self.config, context);
        }

        let pages = select_pages(doc, self.config);
        if pages.is_empty() {
            tracing::warn!("[layout:{}] no schedule pages selected", self.config.id);
            return Vec::new();
        }

        let assembler = HoldingAssembler::new(self.config, self.countries);
        let mut state = ParsingState::new();
        let mut holdings = Vec::new();

        for &page_idx in &pages {
            let page_context = if self.config.multi_fund {
                DocumentContext {
                    fund_name: guess_fund_name(&doc.page_text(page_idx), &context.fund_name),
                    report_date: context.report_date.clone(),
                }
            } else {
                context.clone()
            };

            let (width, height) = doc.page_size(page_idx);
            for (col_idx, bbox) in column_boxes(width, height, self.config.columns).iter().enumerate() {
                let text = doc.cropped_text(page_idx, bbox);
                let found = assembler.scan_column(&text, &page_context, &mut state);
                tracing::debug!(
                    "[layout:{}] page {} column {}: {} holding(s)",
                    self.config.id,
                    page_idx,
                    col_idx,
                    found.len()
                );
                holdings.extend(found);
            }
        }

        tracing::info!(
            "[layout:{}] extracted {} holdings from {} page(s)",
            self.config.id,
            holdings.len(),
            pages.len()
        );
        holdings
    }
}
