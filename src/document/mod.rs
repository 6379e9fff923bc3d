pub mod models;
pub mod provider;

pub use models::{BBox, DocumentDump, PageDump, RawTable, Word};
pub use provider::PageProvider;
