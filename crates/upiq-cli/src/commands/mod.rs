//! CLI command implementations
//!
//! - `parse` - Statement parsing (input validation, routing, output)
//! - `config` - Parser configuration display

pub mod config;
pub mod parse;

use std::path::Path;

use anyhow::{Context, Result};
use upiq_core::ParserConfig;

// Re-export command functions for main.rs
pub use config::*;
pub use parse::*;

/// Load the parser config from an explicit path or the default locations
pub fn load_config(path: Option<&Path>) -> Result<ParserConfig> {
    match path {
        Some(path) => ParserConfig::from_path(path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => ParserConfig::load().context("Failed to load config"),
    }
}

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
