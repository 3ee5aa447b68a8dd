//! Domain models for upiq

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::import::CsvRow;

/// Whether money came in or went out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Income,
    Expense,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" | "credit" => Ok(Self::Income),
            "expense" | "debit" => Ok(Self::Expense),
            _ => Err(format!("Unknown direction: {}", s)),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment method used for a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PaymentMethod {
    /// Unified Payments Interface (GPay, PhonePe, `name@bank` handles)
    #[serde(rename = "UPI")]
    Upi,
    /// Debit or credit card
    Card,
    /// NEFT / RTGS / IMPS transfers
    #[serde(rename = "Net Banking")]
    NetBanking,
    /// Anything not recognized as one of the above
    #[default]
    Cash,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upi => "UPI",
            Self::Card => "Card",
            Self::NetBanking => "Net Banking",
            Self::Cash => "Cash",
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "upi" => Ok(Self::Upi),
            "card" => Ok(Self::Card),
            "net banking" | "net_banking" | "netbanking" => Ok(Self::NetBanking),
            "cash" => Ok(Self::Cash),
            _ => Err(format!("Unknown payment method: {}", s)),
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Input to a single parse call
#[derive(Debug, Clone)]
pub enum RawDocument {
    /// Fully extracted statement text, newline-delimited
    Text(String),
    /// Tabular rows keyed by header name
    Rows(Vec<CsvRow>),
}

/// A transaction extracted from a statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedTransaction {
    /// Always strictly positive and below the ceiling of the path that produced it
    pub amount: f64,
    #[serde(rename = "type")]
    pub direction: Direction,
    /// Only populated from a CSV category column
    pub category: Option<String>,
    pub description: String,
    /// Absent when neither the block nor the sticky date yielded one
    pub date: Option<NaiveDateTime>,
    pub payment_method: PaymentMethod,
}

/// A transaction before validation (amount may be missing or implausible)
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionCandidate {
    pub amount: Option<f64>,
    pub direction: Direction,
    pub category: Option<String>,
    pub description: String,
    pub date: Option<NaiveDateTime>,
    pub payment_method: PaymentMethod,
}

impl TransactionCandidate {
    /// Promote to a `ParsedTransaction` if the amount is plausible.
    pub fn validate(self, ceiling: f64) -> std::result::Result<ParsedTransaction, Self> {
        match self.amount {
            Some(amount) if amount > 0.0 && amount < ceiling => Ok(ParsedTransaction {
                amount,
                direction: self.direction,
                category: self.category,
                description: self.description,
                date: self.date,
                payment_method: self.payment_method,
            }),
            _ => Err(self),
        }
    }
}

/// Result of one parse call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseSummary {
    /// Candidates produced before filtering
    pub total_transactions: usize,
    pub successful_parses: usize,
    pub failed_parses: usize,
    pub transactions: Vec<ParsedTransaction>,
    pub errors: Vec<String>,
    pub message: String,
}

impl ParseSummary {
    pub fn income_total(&self) -> f64 {
        self.total_for(Direction::Income)
    }

    pub fn expense_total(&self) -> f64 {
        self.total_for(Direction::Expense)
    }

    fn total_for(&self, direction: Direction) -> f64 {
        self.transactions
            .iter()
            .filter(|t| t.direction == direction)
            .map(|t| t.amount)
            .sum()
    }
}
