//! Shared domain types and configuration for the title variation engine.

pub mod config;
pub mod title;
pub mod types;

pub use config::{Config, ConfigError};
pub use title::parse_titles;
pub use types::{GenerationOptions, TitleResult, VariationMode};
