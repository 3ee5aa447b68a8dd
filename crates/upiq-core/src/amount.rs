//! Amount extraction
//!
//! Free text only trusts currency-prefixed numbers (`₹`, `Rs`, `INR`).
//! Structured fields fall back to bare decimals and then to small integers,
//! after skipping anything that reads like a reference number.

use std::sync::OnceLock;

use regex::Regex;

/// Text that mentions one of these carries identifiers, not money
const IDENTIFIER_KEYWORDS: &[&str] = &[
    "transaction id",
    "upi txn",
    "upi transaction id",
    "utr",
    "reference no",
    "ref no",
    "reference id",
    "upi reference",
    "order id",
];

fn currency_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(?:₹|\brs\.?|\binr)\s*([\d,]+(?:\.\d{1,2})?)").expect("currency regex")
    })
}

fn signed_currency_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(?:₹|\brs\.?|\binr)\s*([-+]?\d[\d,]*(?:\.\d{1,2})?)")
            .expect("signed currency regex")
    })
}

fn currency_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^\s*(?:₹|rs\.?|inr)").expect("currency prefix regex"))
}

fn decimal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([-+]?\d[\d,]*\.\d{1,2})").expect("decimal regex"))
}

fn small_integer_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([-+]?\b\d{1,7})\b").expect("small integer regex"))
}

/// Parse a matched number, dropping thousands separators.
fn parse_number(raw: &str) -> Option<f64> {
    raw.replace(',', "").parse::<f64>().ok()
}

fn plausible(value: f64, ceiling: f64) -> Option<f64> {
    (value > 0.0 && value < ceiling).then_some(value)
}

/// First currency-prefixed amount in `text` that lies in `(0, ceiling)`.
///
/// Implausible matches are skipped and scanning continues, so a stray
/// `Rs 2000000` does not hide a later `Rs 500`.
pub fn extract_currency_amount(text: &str, ceiling: f64) -> Option<f64> {
    currency_re()
        .captures_iter(text)
        .filter_map(|caps| parse_number(&caps[1]))
        .find_map(|value| plausible(value, ceiling))
}

/// Whether `text` names a reference/transaction identifier
pub fn mentions_identifier(text: &str) -> bool {
    let lower = text.to_lowercase();
    IDENTIFIER_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Layered extraction for a single structured field or row.
///
/// currency-prefixed → bare decimal → bare integer of at most seven digits.
/// The first two layers stop at their first match; the integer layer keeps
/// scanning until a plausible value turns up.
pub fn extract_structured_amount(text: &str, ceiling: f64) -> Option<f64> {
    if text.trim().is_empty() || mentions_identifier(text) {
        return None;
    }

    if let Some(caps) = signed_currency_re().captures(text) {
        return parse_number(&caps[1]).and_then(|v| plausible(v, ceiling));
    }

    if let Some(caps) = decimal_re().captures(text) {
        return parse_number(&caps[1]).and_then(|v| plausible(v, ceiling));
    }

    small_integer_re()
        .captures_iter(text)
        .filter_map(|caps| parse_number(&caps[1]))
        .find_map(|value| plausible(value, ceiling))
}

/// Strip everything except digits, `.` and `-`, then parse.
///
/// A leading currency marker goes first, so the dot in `Rs.` is not read as
/// a decimal point. The result is not bounded; callers validate sign and
/// ceiling.
pub fn parse_stripped_amount(text: &str) -> Option<f64> {
    let cleaned: String = currency_prefix_re()
        .replace(text, "")
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    cleaned.parse::<f64>().ok()
}
