//! upiq Core Library
//!
//! Turns an unstructured bank/UPI statement into normalized transactions:
//! - Line normalization and noise filtering
//! - Trigger-phrase block segmentation with a sticky date
//! - Amount, date, direction, description and payment method extraction
//! - CSV column resolution over arbitrary header names
//! - Aggregation into a parse summary with success/failure counts
//!
//! The engine is pure and synchronous: one call, one document, no shared
//! mutable state.

pub mod amount;
pub mod classify;
pub mod config;
pub mod date;
pub mod describe;
pub mod error;
pub mod import;
pub mod models;
pub mod normalize;
pub mod parser;
pub mod segment;

pub use config::ParserConfig;
pub use error::{Error, Result};
pub use import::{read_csv_rows, CanonicalField, CsvRow};
pub use models::{Direction, ParseSummary, ParsedTransaction, PaymentMethod, RawDocument};
pub use parser::StatementParser;
pub use segment::TransactionBlock;
