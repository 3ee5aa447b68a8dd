//! CLI argument definitions using clap
//!
//! Command implementations live in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// upiq - Turn bank and UPI statements into transactions
#[derive(Parser)]
#[command(name = "upiq")]
#[command(about = "Extract transactions from bank/UPI statement text and CSV exports", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Parser config file (defaults to the per-user override, then built-in values)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a statement file
    Parse {
        /// Extracted statement text (.txt) or CSV export (.csv)
        #[arg(short, long)]
        file: PathBuf,

        /// Input format: text, csv (inferred from the extension if not specified)
        #[arg(long)]
        format: Option<String>,

        /// Print the full summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the effective parser configuration
    Config {
        /// Only print where the override file is read from
        #[arg(long)]
        path: bool,
    },
}
