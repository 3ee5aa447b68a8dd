//! Direction and payment method classification
//!
//! Both classifiers are ordered rule tables: rules are evaluated top to
//! bottom and the first match wins. Free text and structured (CSV) input use
//! different direction tables because a `type` column is authoritative while
//! a paragraph of statement text is only suggestive.

use std::sync::OnceLock;

use regex::Regex;

use crate::models::{Direction, PaymentMethod};

const CREDIT_KEYWORDS: &[&str] = &[
    "received from",
    "credited",
    "refund",
    "cashback",
    "paid to you",
];

const DEBIT_KEYWORDS: &[&str] = &["paid to", "debited", "sent to", "purchase", "payment to"];

const STRUCTURED_CREDIT_KEYWORDS: &[&str] = &[
    "credit",
    "cr",
    "deposit",
    "income",
    "salary",
    "refund",
    "paid to you",
    "received from",
    "sent to your bank",
    "to your bank",
];

const STRUCTURED_DEBIT_KEYWORDS: &[&str] = &["debit", "dr", "withdrawal", "payment", "paid to"];

/// "paid to <bank>" style destinations.
///
/// Heuristic: money sent to a bank is read as a deposit into one's own
/// account. Statement wording alone cannot tell this apart from a transfer
/// out, so treat the income label as a best guess.
fn bank_destination_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"(?i)(?:paid to|payment to|credited to|credit to)\s+",
            r"(?:(?:bank\s+of\s+\w+|state\s+bank|hdfc|icici|axis|sbi|pnb|kotak|yes\s+bank|idfc|hsbc",
            r"|citibank|union\s+bank|canara\s+bank|central\s+bank|indusind|rbl|federal\s+bank)\b",
            r"|(?:[\w']+\s+){0,2}bank\b)",
        ))
        .expect("bank destination regex")
    })
}

/// `name@provider` with a single-label provider; `user@mail.com` is an email
fn upi_handle_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)[a-z0-9._\-]+@[a-z]+(?:$|[^a-z0-9.@_\-]|\.(?:\s|$))")
            .expect("upi handle regex")
    })
}

fn contains_any(lower: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| lower.contains(kw))
}

/// Substring match, except that one- and two-letter abbreviations (`cr`,
/// `dr`) must stand alone as a token.
fn contains_keyword(lower: &str, keyword: &str) -> bool {
    if keyword.len() <= 2 {
        lower
            .split(|c: char| !c.is_alphanumeric())
            .any(|token| token == keyword)
    } else {
        lower.contains(keyword)
    }
}

/// One row of a direction rule table
#[derive(Debug, Clone, Copy)]
pub struct DirectionRule {
    pub name: &'static str,
    pub direction: Direction,
    matches: fn(&str) -> bool,
}

impl DirectionRule {
    /// Test the rule against lowercased text
    pub fn matches(&self, lower: &str) -> bool {
        (self.matches)(lower)
    }
}

fn has_credit_keyword(lower: &str) -> bool {
    contains_any(lower, CREDIT_KEYWORDS)
}

fn has_bank_destination(lower: &str) -> bool {
    bank_destination_re().is_match(lower)
}

fn has_debit_keyword(lower: &str) -> bool {
    contains_any(lower, DEBIT_KEYWORDS)
}

/// Free-text direction rules, in priority order
pub static TEXT_DIRECTION_RULES: [DirectionRule; 3] = [
    DirectionRule {
        name: "credit_keyword",
        direction: Direction::Income,
        matches: has_credit_keyword,
    },
    DirectionRule {
        name: "bank_destination",
        direction: Direction::Income,
        matches: has_bank_destination,
    },
    DirectionRule {
        name: "debit_keyword",
        direction: Direction::Expense,
        matches: has_debit_keyword,
    },
];

/// The first free-text rule matching `text`, if any
pub fn matching_text_rule(text: &str) -> Option<&'static DirectionRule> {
    let lower = text.to_lowercase();
    TEXT_DIRECTION_RULES.iter().find(|rule| rule.matches(&lower))
}

/// Direction of a free-text block; `None` means the block is not a transaction.
pub fn classify_text(text: &str) -> Option<Direction> {
    matching_text_rule(text).map(|rule| rule.direction)
}

/// A block that names both a payee and a payer in list form cannot be
/// attributed to either side.
pub fn is_ambiguous(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("paid to and") && lower.contains("received from and")
}

/// Direction of a structured value (a `type` column or a description).
///
/// Credit vocabulary wins over debit vocabulary; with neither, expense.
pub fn classify_structured(text: &str) -> Direction {
    let lower = text.to_lowercase();
    if STRUCTURED_CREDIT_KEYWORDS
        .iter()
        .any(|kw| contains_keyword(&lower, kw))
    {
        return Direction::Income;
    }
    if STRUCTURED_DEBIT_KEYWORDS
        .iter()
        .any(|kw| contains_keyword(&lower, kw))
    {
        return Direction::Expense;
    }
    Direction::Expense
}

/// Keyword table for payment methods, in priority order
const PAYMENT_METHOD_KEYWORDS: [(PaymentMethod, &[&str]); 3] = [
    (
        PaymentMethod::Upi,
        &["upi", "unified payment", "gpay", "google pay"],
    ),
    (
        PaymentMethod::Card,
        &["card", "visa", "mastercard", "debit card", "credit card"],
    ),
    (
        PaymentMethod::NetBanking,
        &["net banking", "neft", "rtgs", "imps"],
    ),
];

/// Payment method named in `text`, defaulting to cash.
pub fn classify_payment_method(text: &str) -> PaymentMethod {
    let lower = text.to_lowercase();
    for (method, keywords) in PAYMENT_METHOD_KEYWORDS {
        if contains_any(&lower, keywords) {
            return method;
        }
        if method == PaymentMethod::Upi && upi_handle_re().is_match(text) {
            return method;
        }
    }
    PaymentMethod::Cash
}
