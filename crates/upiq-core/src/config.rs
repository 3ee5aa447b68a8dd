//! Parser configuration
//!
//! Config is loaded with a two-layer resolution:
//! 1. Check for override (explicit path, else ~/.local/share/upiq/config/parser.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Only numeric limits live here. Keyword and pattern tables are fixed.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/parser.toml");

/// Limits applied during extraction
#[derive(Debug, Clone, PartialEq)]
pub struct ParserConfig {
    /// Exclusive upper bound for amounts found in free text
    pub text_amount_ceiling: f64,
    /// Exclusive upper bound for amounts from CSV / structured fields
    pub structured_amount_ceiling: f64,
    /// Largest input file accepted by callers that read from disk
    pub max_input_bytes: u64,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            text_amount_ceiling: 1_000_000.0,
            structured_amount_ceiling: 10_000_000.0,
            max_input_bytes: 10 * 1024 * 1024,
        }
    }
}

impl ParserConfig {
    /// Load from the default override location, falling back to embedded defaults
    pub fn load() -> Result<Self> {
        load_config(None)
    }

    /// Load from an explicit override path (embedded defaults if it does not exist)
    pub fn from_path(path: &Path) -> Result<Self> {
        load_config(Some(path))
    }

    /// Parse config from TOML content layered over the defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        parse_config(content)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("upiq").join("config").join("parser.toml"))
}

fn load_config(override_path: Option<&Path>) -> Result<ParserConfig> {
    let path = match override_path {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path(),
    };

    let content = match path {
        Some(path) if path.exists() => fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?,
        _ => DEFAULT_CONFIG.to_string(),
    };

    parse_config(&content)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    amounts: Option<RawAmounts>,
    input: Option<RawInput>,
}

#[derive(Debug, Deserialize)]
struct RawAmounts {
    text_ceiling: Option<f64>,
    structured_ceiling: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawInput {
    max_bytes: Option<u64>,
}

fn parse_config(content: &str) -> Result<ParserConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = ParserConfig::default();

    if let Some(amounts) = raw.amounts {
        if let Some(ceiling) = amounts.text_ceiling {
            config.text_amount_ceiling = ceiling;
        }
        if let Some(ceiling) = amounts.structured_ceiling {
            config.structured_amount_ceiling = ceiling;
        }
    }

    if let Some(input) = raw.input {
        if let Some(max_bytes) = input.max_bytes {
            config.max_input_bytes = max_bytes;
        }
    }

    validate(&config)?;
    Ok(config)
}

fn validate(config: &ParserConfig) -> Result<()> {
    for (name, value) in [
        ("amounts.text_ceiling", config.text_amount_ceiling),
        ("amounts.structured_ceiling", config.structured_amount_ceiling),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(Error::Config(format!(
                "{} must be a positive number, got {}",
                name, value
            )));
        }
    }
    if config.max_input_bytes == 0 {
        return Err(Error::Config("input.max_bytes must be greater than 0".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_config() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, ParserConfig::default());
    }

    #[test]
    fn test_ceilings_stay_distinct() {
        let config = ParserConfig::default();
        assert_eq!(config.text_amount_ceiling, 1_000_000.0);
        assert_eq!(config.structured_amount_ceiling, 10_000_000.0);
    }

    #[test]
    fn test_partial_override_keeps_other_defaults() {
        let config = parse_config("[amounts]\ntext_ceiling = 50000.0\n").unwrap();
        assert_eq!(config.text_amount_ceiling, 50_000.0);
        assert_eq!(config.structured_amount_ceiling, 10_000_000.0);
        assert_eq!(config.max_input_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_empty_config_is_defaults() {
        assert_eq!(parse_config("").unwrap(), ParserConfig::default());
    }

    #[test]
    fn test_rejects_non_positive_ceiling() {
        let err = parse_config("[amounts]\nstructured_ceiling = 0.0\n").unwrap_err();
        assert!(err.to_string().contains("structured_ceiling"));
    }

    #[test]
    fn test_rejects_zero_input_limit() {
        assert!(parse_config("[input]\nmax_bytes = 0\n").is_err());
    }

    #[test]
    fn test_rejects_invalid_toml() {
        assert!(matches!(
            parse_config("amounts = [").unwrap_err(),
            Error::Config(_)
        ));
    }

    #[test]
    fn test_missing_override_path_falls_back_to_embedded() {
        let config =
            ParserConfig::from_path(Path::new("/nonexistent/upiq/parser.toml")).unwrap();
        assert_eq!(config, ParserConfig::default());
    }
}
