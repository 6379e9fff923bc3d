// src/document/provider.rs
use std::path::Path;

use crate::document::models::{BBox, DocumentDump, PageDump, RawTable, Word};
use crate::utils::error::DocumentError;

// Words whose tops differ by less than this share a line.
const LINE_TOLERANCE: f64 = 3.0;

/// Text and geometry for the pages of one document.
///
/// Implementations return plain text (possibly empty) for a page or for a
/// rectangular region of it, in the same units as `page_size`.
pub trait PageProvider {
    fn page_count(&self) -> usize;

    fn page_text(&self, index: usize) -> String;

    /// (width, height)
    fn page_size(&self, index: usize) -> (f64, f64);

    fn cropped_text(&self, index: usize, bbox: &BBox) -> String;

    /// Tables detected on the page. Providers without table detection report none.
    fn page_tables(&self, _index: usize) -> Vec<RawTable> {
        Vec::new()
    }
}

impl DocumentDump {
    /// Reads a JSON page dump from disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DocumentError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let dump: DocumentDump = serde_json::from_str(&raw)?;
        tracing::debug!("Loaded page dump {} ({} pages)", path.as_ref().display(), dump.pages.len());
        Ok(dump)
    }

    pub fn from_pages(pages: Vec<PageDump>) -> Self {
        Self { pages }
    }

    fn page(&self, index: usize) -> Option<&PageDump> {
        self.pages.get(index)
    }
}

/// Joins words into text lines: grouped by `top` within LINE_TOLERANCE, each line ordered by x0.
fn words_to_text<'a, I>(words: I) -> String
where
    I: IntoIterator<Item = &'a Word>,
{
    let mut sorted: Vec<&Word> = words.into_iter().collect();
    sorted.sort_by(|a, b| a.top.total_cmp(&b.top).then(a.x0.total_cmp(&b.x0)));

    let mut lines: Vec<(f64, Vec<&Word>)> = Vec::new();
    for word in sorted {
        match lines.last_mut() {
            Some((line_top, members)) if (word.top - *line_top).abs() < LINE_TOLERANCE => {
                members.push(word);
            }
            _ => lines.push((word.top, vec![word])),
        }
    }

    lines
        .into_iter()
        .map(|(_, mut members)| {
            members.sort_by(|a, b| a.x0.total_cmp(&b.x0));
            members.iter().map(|w| w.text.as_str()).collect::<Vec<_>>().join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

impl PageProvider for DocumentDump {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize) -> String {
        match self.page(index) {
            Some(page) => match &page.text {
                Some(text) => text.clone(),
                None => words_to_text(&page.words),
            },
            None => String::new(),
        }
    }

    fn page_size(&self, index: usize) -> (f64, f64) {
        self.page(index).map(|p| (p.width, p.height)).unwrap_or((0.0, 0.0))
    }

    fn cropped_text(&self, index: usize, bbox: &BBox) -> String {
        let Some(page) = self.page(index) else {
            return String::new();
        };

        if !page.words.is_empty() {
            return words_to_text(page.words.iter().filter(|w| w.is_inside(bbox)));
        }

        // Text-only pages have no geometry to crop by.
        if bbox.covers(&page.bbox()) {
            page.text.clone().unwrap_or_default()
        } else {
            tracing::debug!("Page {} has no word geometry; partial crop yields no text", index);
            String::new()
        }
    }

    fn page_tables(&self, index: usize) -> Vec<RawTable> {
        self.page(index).map(|p| p.tables.clone()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, x0: f64, top: f64) -> Word {
        Word {
            text: text.to_string(),
            x0,
            x1: x0 + 10.0 * text.len() as f64,
            top,
            bottom: top + 10.0,
        }
    }

    #[test]
    fn test_words_grouped_into_lines() {
        let page = PageDump::from_words(
            600.0,
            800.0,
            vec![
                word("Corp", 60.0, 101.0),
                word("Acme", 10.0, 100.0),
                word("Beta", 10.0, 120.0),
            ],
        );
        let doc = DocumentDump::from_pages(vec![page]);
        assert_eq!(doc.page_text(0), "Acme Corp\nBeta");
    }

    #[test]
    fn test_crop_keeps_words_by_center() {
        let page = PageDump::from_words(
            600.0,
            800.0,
            vec![word("Left", 10.0, 100.0), word("Right", 400.0, 100.0)],
        );
        let doc = DocumentDump::from_pages(vec![page]);
        let left = doc.cropped_text(0, &BBox::new(0.0, 0.0, 300.0, 800.0));
        let right = doc.cropped_text(0, &BBox::new(300.0, 0.0, 600.0, 800.0));
        assert_eq!(left, "Left");
        assert_eq!(right, "Right");
    }

    #[test]
    fn test_text_only_page_crop() {
        let doc = DocumentDump::from_pages(vec![PageDump::from_text(600.0, 800.0, "Hello\nWorld")]);
        assert_eq!(doc.cropped_text(0, &BBox::new(0.0, 0.0, 600.0, 800.0)), "Hello\nWorld");
        assert_eq!(doc.cropped_text(0, &BBox::new(0.0, 0.0, 300.0, 800.0)), "");
        assert_eq!(doc.page_text(5), "", "Out of range pages read as empty");
    }
}
