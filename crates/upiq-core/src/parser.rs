//! Statement parsing pipeline and aggregation
//!
//! Text path: normalize → segment → per-block extraction.
//! CSV path: per-row alias resolution.
//! Both feed the same aggregation step, which validates candidates against
//! the path's amount ceiling and builds the [`ParseSummary`].

use std::io::Read;

use chrono::{Local, NaiveDateTime, NaiveTime};
use tracing::{debug, info, warn};

use crate::amount::extract_currency_amount;
use crate::classify::{classify_payment_method, classify_text, is_ambiguous};
use crate::config::ParserConfig;
use crate::date::extract_date;
use crate::describe::describe_block;
use crate::error::{Error, Result};
use crate::import::{read_csv_rows, resolve_row, CsvRow};
use crate::models::{ParseSummary, RawDocument, TransactionCandidate};
use crate::normalize::normalize_lines;
use crate::segment::{segment, TransactionBlock};

/// Stateless parser; one instance can serve any number of documents.
#[derive(Debug, Clone, Default)]
pub struct StatementParser {
    config: ParserConfig,
}

impl StatementParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse either kind of document
    pub fn parse_document(&self, document: &RawDocument) -> Result<ParseSummary> {
        match document {
            RawDocument::Text(text) => self.parse_text(text),
            RawDocument::Rows(rows) => self.parse_rows(rows),
        }
    }

    /// Parse extracted statement text.
    ///
    /// Fails only when there is no text at all. Blocks that are ambiguous,
    /// unclassifiable or carry no plausible amount are dropped without being
    /// counted.
    pub fn parse_text(&self, text: &str) -> Result<ParseSummary> {
        if text.trim().is_empty() {
            return Err(Error::EmptyDocument("no text to parse".into()));
        }

        let lines = normalize_lines(text);
        let blocks = segment(&lines);
        info!("Normalized {} lines into {} blocks", lines.len(), blocks.len());

        let candidates: Vec<TransactionCandidate> = blocks
            .iter()
            .filter_map(|block| self.extract_block(block))
            .collect();

        Ok(summarize(candidates, self.config.text_amount_ceiling))
    }

    fn extract_block(&self, block: &TransactionBlock) -> Option<TransactionCandidate> {
        let text = block.text();

        if is_ambiguous(&text) {
            debug!("Skipping ambiguous block: {}", text);
            return None;
        }

        let Some(direction) = classify_text(&text) else {
            debug!("Skipping unclassified block: {}", text);
            return None;
        };

        let Some(amount) = extract_currency_amount(&text, self.config.text_amount_ceiling) else {
            debug!("Skipping block without amount: {}", text);
            return None;
        };

        let date = extract_date(&text)
            .or(block.sticky_date)
            .map(|d| d.and_time(NaiveTime::MIN));
        if date.is_none() {
            warn!("No date found for block: {}", text);
        }

        Some(TransactionCandidate {
            amount: Some(amount),
            direction,
            category: None,
            description: describe_block(&block.lines, direction),
            date,
            payment_method: classify_payment_method(&text),
        })
    }

    /// Parse CSV rows, using the local clock for undated rows
    pub fn parse_rows(&self, rows: &[CsvRow]) -> Result<ParseSummary> {
        self.parse_rows_at(rows, Local::now().naive_local())
    }

    /// Parse CSV rows with an explicit fallback timestamp
    pub fn parse_rows_at(&self, rows: &[CsvRow], now: NaiveDateTime) -> Result<ParseSummary> {
        let ceiling = self.config.structured_amount_ceiling;
        let candidates = rows
            .iter()
            .map(|row| resolve_row(row, ceiling, now))
            .collect();
        Ok(summarize(candidates, ceiling))
    }

    /// Read and parse a headered CSV
    pub fn parse_csv<R: Read>(&self, reader: R) -> Result<ParseSummary> {
        let rows = read_csv_rows(reader)?;
        self.parse_rows(&rows)
    }
}

/// Validate candidates in document order and count the outcome.
fn summarize(candidates: Vec<TransactionCandidate>, ceiling: f64) -> ParseSummary {
    let total_transactions = candidates.len();
    let mut transactions = Vec::with_capacity(total_transactions);
    let mut errors = Vec::new();

    for candidate in candidates {
        match candidate.validate(ceiling) {
            Ok(tx) => transactions.push(tx),
            Err(rejected) => {
                info!(
                    "Dropping invalid transaction: amount={:?}, description='{}'",
                    rejected.amount, rejected.description
                );
                errors.push(format!("Invalid transaction: {}", rejected.description));
            }
        }
    }

    let successful_parses = transactions.len();
    let message = format!("Successfully parsed {} transactions", successful_parses);
    info!(
        "Parsed {} of {} candidates ({} failed)",
        successful_parses,
        total_transactions,
        errors.len()
    );

    ParseSummary {
        total_transactions,
        successful_parses,
        failed_parses: errors.len(),
        transactions,
        errors,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Direction, PaymentMethod};
    use chrono::NaiveDate;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_time(NaiveTime::MIN)
    }

    #[test]
    fn test_empty_text_is_a_document_error() {
        let parser = StatementParser::default();
        assert!(matches!(parser.parse_text(""), Err(Error::EmptyDocument(_))));
        assert!(matches!(
            parser.parse_text(" \n\t\n"),
            Err(Error::EmptyDocument(_))
        ));
    }

    #[test]
    fn test_single_block() {
        let summary = StatementParser::default()
            .parse_text("Paid to Zomato via UPI Rs. 350 on 05 Jan 2025")
            .unwrap();
        assert_eq!(summary.total_transactions, 1);
        assert_eq!(summary.successful_parses, 1);
        let tx = &summary.transactions[0];
        assert_eq!(tx.amount, 350.0);
        assert_eq!(tx.direction, Direction::Expense);
        assert_eq!(tx.payment_method, PaymentMethod::Upi);
        assert_eq!(tx.date, Some(ymd(2025, 1, 5)));
        assert_eq!(tx.description, "Paid to Zomato");
        assert_eq!(tx.category, None);
    }

    #[test]
    fn test_blocks_without_amount_or_direction_are_not_counted() {
        let text = "Account summary\nPaid to Alice\nReceived from Bob Rs 100";
        let summary = StatementParser::default().parse_text(text).unwrap();
        assert_eq!(summary.total_transactions, 1);
        assert_eq!(summary.failed_parses, 0);
        assert_eq!(summary.transactions[0].description, "Received from Bob");
    }

    #[test]
    fn test_ambiguous_block_is_dropped() {
        let text = "Paid to and Received from and others Rs 500";
        let summary = StatementParser::default().parse_text(text).unwrap();
        assert!(summary.transactions.is_empty());
        assert_eq!(summary.total_transactions, 0);
    }

    #[test]
    fn test_undated_text_block_has_no_date() {
        let summary = StatementParser::default()
            .parse_text("Paid to Alice Rs 20")
            .unwrap();
        assert_eq!(summary.transactions[0].date, None);
    }

    #[test]
    fn test_text_ceiling_comes_from_config() {
        let parser = StatementParser::new(ParserConfig {
            text_amount_ceiling: 100.0,
            ..ParserConfig::default()
        });
        let summary = parser.parse_text("Paid to Alice Rs 150").unwrap();
        assert!(summary.transactions.is_empty());
    }

    #[test]
    fn test_csv_failures_are_counted() {
        let rows = vec![
            CsvRow::from_pairs([("amount", "100"), ("description", "Tea")]),
            CsvRow::from_pairs([("amount", "-5"), ("description", "Reversal")]),
            CsvRow::from_pairs([("amount", "abc"), ("description", "Broken")]),
        ];
        let summary = StatementParser::default()
            .parse_rows_at(&rows, ymd(2026, 1, 1))
            .unwrap();
        assert_eq!(summary.total_transactions, 3);
        assert_eq!(summary.successful_parses, 1);
        assert_eq!(summary.failed_parses, 2);
        assert_eq!(
            summary.errors,
            vec!["Invalid transaction: Reversal", "Invalid transaction: Broken"]
        );
        assert_eq!(summary.message, "Successfully parsed 1 transactions");
    }

    #[test]
    fn test_structured_ceiling_is_exclusive() {
        let rows = vec![
            CsvRow::from_pairs([("amount", "9999999")]),
            CsvRow::from_pairs([("amount", "10000000")]),
        ];
        let summary = StatementParser::default()
            .parse_rows_at(&rows, ymd(2026, 1, 1))
            .unwrap();
        assert_eq!(summary.successful_parses, 1);
        assert_eq!(summary.transactions[0].amount, 9_999_999.0);
    }

    #[test]
    fn test_parse_document_routes_by_kind() {
        let parser = StatementParser::default();
        let text = RawDocument::Text("Received from Bob Rs 75".into());
        assert_eq!(parser.parse_document(&text).unwrap().successful_parses, 1);

        let rows = RawDocument::Rows(vec![CsvRow::from_pairs([("amt", "75")])]);
        let summary = parser.parse_document(&rows).unwrap();
        assert_eq!(summary.transactions[0].direction, Direction::Expense);
    }

    #[test]
    fn test_parse_csv_reader() {
        let csv = "Date,Description,Amount,Type\n15/01/2024,Salary,50000,Credit\n16/01/2024,Rent,15000,Debit\n";
        let summary = StatementParser::default().parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(summary.successful_parses, 2);
        assert_eq!(summary.income_total(), 50_000.0);
        assert_eq!(summary.expense_total(), 15_000.0);
        assert_eq!(summary.transactions[1].date, Some(ymd(2024, 1, 16)));
    }
}
