//! upiq CLI - Statement to transaction extractor
//!
//! Usage:
//!   upiq parse --file statement.txt     Parse extracted statement text
//!   upiq parse --file export.csv --json Parse a CSV export, print JSON
//!   upiq config                         Show effective parser limits

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // stderr keeps --json output on stdout machine-readable
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .compact()
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        Commands::Parse { file, format, json } => {
            commands::cmd_parse(cli.config.as_deref(), &file, format.as_deref(), json)
        }
        Commands::Config { path } => commands::cmd_config(cli.config.as_deref(), path),
    }
}
