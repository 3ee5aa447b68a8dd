//! CSV import with header-alias resolution
//!
//! Exports come with arbitrary column names (`Amount`, `Txn Amount`,
//! `transaction_amount`, ...). Each canonical field has an alias list in
//! priority order; rows are resolved field by field and the free-text
//! classifiers fill in whatever the columns leave out.

use std::io::Read;

use chrono::NaiveDateTime;
use csv::{ReaderBuilder, Trim};
use tracing::debug;

use crate::amount::{extract_structured_amount, mentions_identifier, parse_stripped_amount};
use crate::classify::{classify_payment_method, classify_structured};
use crate::date::parse_date_field;
use crate::describe::{compose_structured, FALLBACK_DESCRIPTION};
use crate::error::{Error, Result};
use crate::models::{Direction, TransactionCandidate};

/// One CSV record as ordered `(header, value)` pairs
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CsvRow {
    fields: Vec<(String, String)>,
}

impl CsvRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn push(&mut self, header: impl Into<String>, value: impl Into<String>) {
        self.fields.push((header.into(), value.into()));
    }

    /// Value under an exact header name
    pub fn get(&self, header: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, v)| v.as_str())
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(h, _)| h.as_str())
    }

    /// First non-blank value for `field`, trying aliases in priority order.
    ///
    /// Each alias is matched against the exact header text first and then
    /// against the normalized header (`Txn Amount` → `txn_amount`).
    pub fn lookup(&self, field: CanonicalField) -> Option<&str> {
        field.aliases().iter().find_map(|alias| {
            self.non_blank(|h| h == *alias)
                .or_else(|| self.non_blank(|h| normalize_header(h) == *alias))
        })
    }

    fn non_blank(&self, matches: impl Fn(&str) -> bool) -> Option<&str> {
        self.fields
            .iter()
            .find(|(h, v)| matches(h.as_str()) && !v.trim().is_empty())
            .map(|(_, v)| v.as_str())
    }
}

/// Trim, lowercase, and turn runs of spaces/hyphens into `_`
fn normalize_header(header: &str) -> String {
    header
        .trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Output attributes both input paths populate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanonicalField {
    Amount,
    Type,
    Description,
    Date,
    PaymentMethod,
    Category,
}

impl CanonicalField {
    /// Accepted header names, highest priority first
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Amount => &[
                "amount",
                "value",
                "transaction_amount",
                "txn_amount",
                "amt",
                "total",
            ],
            Self::Type => &[
                "type",
                "transaction_type",
                "txn_type",
                "credit_debit",
                "cd",
                "dr_cr",
            ],
            Self::Description => &[
                "description",
                "details",
                "narration",
                "remarks",
                "memo",
                "note",
            ],
            Self::Date => &[
                "date",
                "transaction_date",
                "txn_date",
                "date_time",
                "timestamp",
                "value_date",
            ],
            Self::PaymentMethod => &[
                "payment_method",
                "method",
                "payment_type",
                "payment_mode",
                "mode",
            ],
            Self::Category => &["category", "cat", "transaction_category"],
        }
    }
}

/// Read a headered CSV into rows
pub fn read_csv_rows<R: Read>(reader: R) -> Result<Vec<CsvRow>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(Error::EmptyDocument("CSV has no header row".into()));
    }

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(CsvRow::from_pairs(headers.iter().zip(record.iter())));
    }

    debug!("Read {} CSV rows with {} columns", rows.len(), headers.len());
    Ok(rows)
}

/// Amount cell: strip-and-parse, then layered extraction.
///
/// Cells naming a reference number (`UTR 12345`) carry no amount.
fn resolve_amount(cell: &str, ceiling: f64) -> Option<f64> {
    if mentions_identifier(cell) {
        debug!("Amount cell holds an identifier: {}", cell);
        return None;
    }
    let amount = parse_stripped_amount(cell).or_else(|| extract_structured_amount(cell, ceiling));
    if amount.is_none() {
        debug!("Could not parse amount: {}", cell);
    }
    amount
}

/// Map one row onto a candidate transaction.
///
/// `now` stands in for rows without a usable date.
pub fn resolve_row(row: &CsvRow, ceiling: f64, now: NaiveDateTime) -> TransactionCandidate {
    let description_cell = row.lookup(CanonicalField::Description);

    let amount = row
        .lookup(CanonicalField::Amount)
        .and_then(|cell| resolve_amount(cell, ceiling));

    let direction = match row.lookup(CanonicalField::Type).or(description_cell) {
        Some(value) => classify_structured(value),
        None => Direction::Expense,
    };

    let description = description_cell
        .map(compose_structured)
        .unwrap_or_else(|| FALLBACK_DESCRIPTION.to_string());

    let date = Some(
        row.lookup(CanonicalField::Date)
            .map(|cell| parse_date_field(cell, now))
            .unwrap_or(now),
    );

    let payment_method = row
        .lookup(CanonicalField::PaymentMethod)
        .or(description_cell)
        .map(classify_payment_method)
        .unwrap_or_default();

    let category = row
        .lookup(CanonicalField::Category)
        .map(|c| c.trim().to_string());

    debug!(
        "Resolved row: amount={:?}, type={}, method={}",
        amount, direction, payment_method
    );

    TransactionCandidate {
        amount,
        direction,
        category,
        description,
        date,
        payment_method,
    }
}
