//! Block segmentation
//!
//! Statements describe each transaction as a short paragraph that opens with
//! a characteristic phrase ("Paid to", "Received from", ...). A single greedy
//! pass cuts the normalized lines at those phrases and carries the most recent
//! date across blocks, so one date header can cover several entries.

use chrono::NaiveDate;
use tracing::debug;

use crate::date::extract_date;

/// Phrases that open a new transaction paragraph (matched lowercased)
const BLOCK_START_TRIGGERS: &[&str] = &[
    "paid to",
    "received from",
    "credited to",
    "sent to",
    "purchase",
    "payment to",
];

/// Lines believed to describe one transaction
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionBlock {
    pub lines: Vec<String>,
    /// Latest date seen up to the end of this block
    pub sticky_date: Option<NaiveDate>,
}

impl TransactionBlock {
    /// All lines joined with single spaces
    pub fn text(&self) -> String {
        self.lines.join(" ")
    }
}

/// Whether a line opens a new block.
///
/// "debited" opens a block, but "debited from" (an account reference) does not.
pub fn is_block_start(line: &str) -> bool {
    let lower = line.to_lowercase();
    BLOCK_START_TRIGGERS.iter().any(|t| lower.contains(t))
        || (lower.contains("debited") && !lower.contains("debited from"))
}

/// Group normalized lines into blocks.
///
/// Each emitted block is tagged with the sticky date as it stood before the
/// line that closed it (or at end of input for the last block).
pub fn segment(lines: &[String]) -> Vec<TransactionBlock> {
    let mut blocks = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut last_seen_date: Option<NaiveDate> = None;

    for line in lines {
        let found_date = extract_date(line);

        if is_block_start(line) && !current.is_empty() {
            debug!("Block boundary before '{}'", line);
            blocks.push(TransactionBlock {
                lines: std::mem::take(&mut current),
                sticky_date: last_seen_date,
            });
        }

        if found_date.is_some() {
            last_seen_date = found_date;
        }
        current.push(line.clone());
    }

    if !current.is_empty() {
        blocks.push(TransactionBlock {
            lines: current,
            sticky_date: last_seen_date,
        });
    }

    debug!("Segmented {} lines into {} blocks", lines.len(), blocks.len());
    blocks
}
