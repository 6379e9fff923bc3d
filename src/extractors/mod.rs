// src/extractors/mod.rs
pub mod assembler;
pub mod countries;
pub mod engine;
pub mod holding;
pub mod metadata;
pub mod names;
pub mod numeric;
pub mod selector;
pub mod table_pairs;

// Re-export key extraction types for convenience
pub use assembler::{HoldingAssembler, LineAction, MultiLineAccumulator, ParsingState};
pub use countries::CountryTable;
pub use engine::HoldingsExtractor;
pub use holding::{DocumentContext, Holding};
