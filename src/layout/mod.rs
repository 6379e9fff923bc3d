pub mod config;

pub use config::{AssemblerMode, LayoutConfig, LayoutRegistry, LayoutType};
