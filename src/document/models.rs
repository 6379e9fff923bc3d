// src/document/models.rs
use serde::{Deserialize, Serialize};

/// Rectangle in page units, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
}

impl BBox {
    pub fn new(x0: f64, top: f64, x1: f64, bottom: f64) -> Self {
        Self { x0, top, x1, bottom }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// True when the point lies inside the box (right and bottom edges exclusive).
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.top && y < self.bottom
    }

    pub fn covers(&self, other: &BBox) -> bool {
        self.x0 <= other.x0 && self.top <= other.top && self.x1 >= other.x1 && self.bottom >= other.bottom
    }
}

/// A single positioned word as reported by the upstream text source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    pub x0: f64,
    pub x1: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Word {
    fn center(&self) -> (f64, f64) {
        ((self.x0 + self.x1) / 2.0, (self.top + self.bottom) / 2.0)
    }

    pub fn is_inside(&self, bbox: &BBox) -> bool {
        let (x, y) = self.center();
        bbox.contains_point(x, y)
    }
}

/// Raw table as reported by the upstream source: rows of optional cells.
pub type RawTable = Vec<Vec<Option<String>>>;

/// One page of a page dump. Either `text`, `words`, or both may be present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageDump {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub words: Vec<Word>,
    #[serde(default)]
    pub tables: Vec<RawTable>,
}

impl PageDump {
    /// Page carrying only plain text (no word geometry).
    pub fn from_text(width: f64, height: f64, text: &str) -> Self {
        Self {
            width,
            height,
            text: Some(text.to_string()),
            ..Default::default()
        }
    }

    /// Page carrying only positioned words.
    pub fn from_words(width: f64, height: f64, words: Vec<Word>) -> Self {
        Self {
            width,
            height,
            words,
            ..Default::default()
        }
    }

    pub fn bbox(&self) -> BBox {
        BBox::new(0.0, 0.0, self.width, self.height)
    }
}

/// The whole document as a sequence of page dumps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentDump {
    pub pages: Vec<PageDump>,
}
