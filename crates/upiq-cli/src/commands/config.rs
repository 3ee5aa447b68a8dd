//! Config command implementation

use std::path::Path;

use anyhow::Result;
use upiq_core::config::default_config_path;

use super::load_config;

/// Show the effective parser limits, or only the override location
pub fn cmd_config(config_path: Option<&Path>, path_only: bool) -> Result<()> {
    let override_path = config_path
        .map(Path::to_path_buf)
        .or_else(default_config_path);

    if path_only {
        match override_path {
            Some(path) => {
                println!("{}", path.display());
                if !path.exists() {
                    eprintln!();
                    eprintln!("Note: This file does not exist yet.");
                    eprintln!("Built-in defaults are used until it is created.");
                }
            }
            None => {
                eprintln!("Could not determine config directory.");
                eprintln!("The data directory is not available on this system.");
            }
        }
        return Ok(());
    }

    let config = load_config(config_path)?;
    let source = match &override_path {
        Some(path) if path.exists() => path.display().to_string(),
        _ => "built-in defaults".to_string(),
    };

    println!();
    println!("⚙️  Parser Config");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Source: {}", source);
    println!("   Text amount ceiling:       {:.2}", config.text_amount_ceiling);
    println!(
        "   Structured amount ceiling: {:.2}",
        config.structured_amount_ceiling
    );
    println!(
        "   Max input size:            {} bytes ({:.1} MB)",
        config.max_input_bytes,
        config.max_input_bytes as f64 / (1024.0 * 1024.0)
    );

    Ok(())
}
