//! Parse command implementation

use std::fs::{self, File};
use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::debug;
use upiq_core::{
    read_csv_rows, Direction, Error, ParseSummary, ParserConfig, RawDocument, StatementParser,
};

use super::{load_config, truncate};

/// How a statement file is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Text already extracted from a PDF or pasted from an app
    Text,
    /// Headered CSV export
    Csv,
}

impl std::str::FromStr for InputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "csv" => Ok(Self::Csv),
            _ => Err(format!("Unknown input format: {}", s)),
        }
    }
}

impl InputFormat {
    /// Route by extension: `.csv` is tabular, everything else is text.
    ///
    /// PDFs are refused; their text has to be extracted first.
    pub fn from_path(path: &Path) -> upiq_core::Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());
        match ext.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("pdf") => Err(Error::UnsupportedInput(format!(
                "{} is a PDF; extract its text to a .txt file first",
                path.display()
            ))),
            _ => Ok(Self::Text),
        }
    }
}

/// Validate a statement file and read it into a document.
pub fn load_document(
    file: &Path,
    format: Option<InputFormat>,
    max_bytes: u64,
) -> Result<RawDocument> {
    let metadata = fs::metadata(file)
        .with_context(|| format!("Failed to open file: {}", file.display()))?;

    if metadata.len() > max_bytes {
        bail!(
            "File too large: {} bytes (limit is {} bytes)",
            metadata.len(),
            max_bytes
        );
    }
    if metadata.len() == 0 {
        bail!("File is empty: {}", file.display());
    }

    let format = match format {
        Some(format) => format,
        None => InputFormat::from_path(file)?,
    };
    debug!(
        "Reading {} ({} bytes) as {:?}",
        file.display(),
        metadata.len(),
        format
    );

    match format {
        InputFormat::Text => {
            let text = fs::read_to_string(file)
                .with_context(|| format!("Failed to read text from {}", file.display()))?;
            Ok(RawDocument::Text(text))
        }
        InputFormat::Csv => {
            let reader = File::open(file)
                .with_context(|| format!("Failed to open file: {}", file.display()))?;
            let rows = read_csv_rows(reader)
                .with_context(|| format!("Failed to read CSV from {}", file.display()))?;
            Ok(RawDocument::Rows(rows))
        }
    }
}

/// Load, validate and parse one statement file
pub fn parse_file(
    config: &ParserConfig,
    file: &Path,
    format: Option<InputFormat>,
) -> Result<ParseSummary> {
    let document = load_document(file, format, config.max_input_bytes)?;
    let parser = StatementParser::new(config.clone());
    parser
        .parse_document(&document)
        .with_context(|| format!("Failed to parse {}", file.display()))
}

pub fn cmd_parse(
    config_path: Option<&Path>,
    file: &Path,
    format_str: Option<&str>,
    json: bool,
) -> Result<()> {
    let format: Option<InputFormat> = format_str
        .map(|s| s.parse::<InputFormat>().map_err(|e: String| anyhow::anyhow!(e)))
        .transpose()?;

    let config = load_config(config_path)?;
    let summary = parse_file(&config, file, format)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(file, &summary);
    }

    Ok(())
}

fn print_summary(file: &Path, summary: &ParseSummary) {
    println!();
    println!("📄 {}", file.display());
    println!("   {}", summary.message);
    println!(
        "   Candidates: {}  Parsed: {}  Failed: {}",
        summary.total_transactions, summary.successful_parses, summary.failed_parses
    );

    if !summary.transactions.is_empty() {
        println!();
        println!(
            "   {:<10}  {:>12}  {:<12}  {:<30}",
            "Date", "Amount", "Method", "Description"
        );
        println!("   {}", "─".repeat(70));
        for tx in &summary.transactions {
            let date = tx
                .date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string());
            let sign = match tx.direction {
                Direction::Income => '+',
                Direction::Expense => '-',
            };
            println!(
                "   {:<10}  {:>12}  {:<12}  {:<30}",
                date,
                format!("{}{:.2}", sign, tx.amount),
                tx.payment_method.as_str(),
                truncate(&tx.description, 30)
            );
        }
        println!();
        println!(
            "   Income: {:.2}  Expense: {:.2}",
            summary.income_total(),
            summary.expense_total()
        );
    }

    if !summary.errors.is_empty() {
        println!();
        println!("   ⚠️  {} rejected:", summary.errors.len());
        for error in &summary.errors {
            println!("      {}", error);
        }
    }
}
