//! Description extraction
//!
//! Free-text blocks get a direction-specific label ("Paid to X", "Received
//! from Y") from an ordered list of capture rules, then a line-by-line
//! keyword scan, then the constant `"Transaction"`. Structured (CSV) cells
//! are composed from labelled lines instead.

use std::sync::OnceLock;

use regex::Regex;

use crate::models::Direction;

pub const FALLBACK_DESCRIPTION: &str = "Transaction";

/// Captured names containing these are the statement's own account, not a counterparty
const NAME_BLACKLIST: &[&str] = &["bank", "account", "wallet", "your"];

const DEBIT_LINE_KEYWORDS: &[&str] = &["paid to", "sent to", "debited", "purchase", "payment to"];

fn expense_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"(?i)(?:paid to|sent to|transfer to|payment to|pay to)\s+([A-Za-z0-9\s&.,'-]+?)",
            r"(?:\s+(?:(?:upi|ref|id|amount|rs|inr|via|on|using)\b|₹|\d{12}|\d{1,2}[/-]\d{1,2})|$)",
        ))
        .expect("expense name regex")
    })
}

fn paid_by_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"(?i)paid\s+by\s+([A-Za-z0-9\s&.,'-]+?)",
            r"(?:\s*-|\s+(?:(?:paid|to|upi|ref|id|amount|rs|inr|via|on|using)\b|₹|\d{12}|\d{1,2}[/-]\d{1,2})|$)",
        ))
        .expect("paid by regex")
    })
}

fn received_from_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"(?i)(?:received from|credited from|credit from)\s+([A-Za-z0-9\s&.,'-]+?)",
            r"(?:\s*-|\s+(?:(?:upi|ref|id|amount|rs|inr|via|on|using)\b|₹|\d{12}|\d{1,2}[/-]\d{1,2})|$)",
        ))
        .expect("received from regex")
    })
}

fn reference_tail_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?:upi|ref|id|rs|inr)(?:[^a-z].*)?$|₹.*$").expect("reference tail regex")
    })
}

fn digit_tail_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:^|\s)\d.*$").expect("digit tail regex"))
}

fn dash_tail_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:^|\s)[-–].*$").expect("dash tail regex"))
}

/// Isolate a counterparty name.
///
/// With a non-empty `keyword`, only the text after its first (case-insensitive)
/// occurrence is kept; if the keyword is missing the trimmed line is returned
/// unchanged. The remainder loses any reference/currency tail, any tail that
/// starts with a number and any dash-led suffix.
pub fn clean_name(line: &str, keyword: &str) -> String {
    let rest = if keyword.is_empty() {
        line
    } else {
        match line.to_ascii_lowercase().find(keyword) {
            Some(idx) => &line[idx + keyword.len()..],
            None => return line.trim().to_string(),
        }
    };

    let rest = reference_tail_re().replace(rest.trim(), "");
    let rest = digit_tail_re().replace(&rest, "");
    let rest = dash_tail_re().replace(&rest, "");
    rest.trim().trim_end_matches(',').trim_end().to_string()
}

fn mentions_any(name: &str, words: &[&str]) -> bool {
    let lower = name.to_lowercase();
    words.iter().any(|w| lower.contains(w))
}

/// A prioritized name-capturing pattern and the label it produces
struct CaptureRule {
    pattern: fn() -> &'static Regex,
    label: &'static str,
}

impl CaptureRule {
    fn apply(&self, combined: &str) -> Option<String> {
        let caps = (self.pattern)().captures(combined)?;
        let name = clean_name(&caps[1], "");
        if name.is_empty() || mentions_any(&name, NAME_BLACKLIST) {
            return None;
        }
        Some(format!("{} {}", self.label, name))
    }
}

const EXPENSE_CAPTURES: [CaptureRule; 1] = [CaptureRule {
    pattern: expense_name_re,
    label: "Paid to",
}];

const INCOME_CAPTURES: [CaptureRule; 2] = [
    CaptureRule {
        pattern: paid_by_re,
        label: "Received from",
    },
    CaptureRule {
        pattern: received_from_re,
        label: "Received from",
    },
];

fn capitalize(keyword: &str) -> String {
    let mut chars = keyword.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn scan_debit_lines(lines: &[String]) -> Option<String> {
    for line in lines {
        let lower = line.to_lowercase();
        for kw in DEBIT_LINE_KEYWORDS {
            if lower.contains(kw) {
                let name = clean_name(line, kw);
                if !name.is_empty() {
                    return Some(format!("{} {}", capitalize(kw), name));
                }
            }
        }
    }
    None
}

fn scan_credit_lines(lines: &[String]) -> Option<String> {
    for line in lines {
        let lower = line.to_lowercase();

        for kw in ["paid by", "received from"] {
            if lower.contains(kw) {
                let name = clean_name(line, kw);
                if !name.is_empty() && !mentions_any(&name, NAME_BLACKLIST) {
                    return Some(format!("Received from {}", name));
                }
            }
        }

        if lower.contains("refund") || lower.contains("cashback") {
            let kw = if lower.contains("refund") { "refund" } else { "cashback" };
            let name = clean_name(line, kw);
            let name = strip_leading_from(&name);
            if !name.is_empty() && !mentions_any(name, NAME_BLACKLIST) {
                return Some(format!("Received from {}", name));
            }
        }
    }
    None
}

fn strip_leading_from(name: &str) -> &str {
    match name.get(..5) {
        Some(head) if head.eq_ignore_ascii_case("from ") => name[5..].trim_start(),
        _ => name,
    }
}

/// Money "paid to" one's own bank reads as a deposit
fn scan_deposit_lines(lines: &[String]) -> Option<String> {
    for line in lines {
        let lower = line.to_lowercase();
        for kw in ["paid to", "payment to"] {
            if lower.contains(kw) {
                let name = clean_name(line, kw);
                if !name.is_empty() {
                    return Some(format!("Deposit to {}", name));
                }
            }
        }
    }
    None
}

/// Human-readable label for a free-text block
pub fn describe_block(lines: &[String], direction: Direction) -> String {
    let combined = lines.join(" ");
    let combined = combined.trim();

    let described = match direction {
        Direction::Expense => EXPENSE_CAPTURES
            .iter()
            .find_map(|rule| rule.apply(combined))
            .or_else(|| scan_debit_lines(lines)),
        Direction::Income => INCOME_CAPTURES
            .iter()
            .find_map(|rule| rule.apply(combined))
            .or_else(|| scan_credit_lines(lines))
            .or_else(|| {
                let lower = combined.to_lowercase();
                if lower.starts_with("paid to") || lower.starts_with("payment to") {
                    scan_deposit_lines(lines)
                } else {
                    None
                }
            }),
    };

    described.unwrap_or_else(|| FALLBACK_DESCRIPTION.to_string())
}

fn label_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(paid to you|paid to|received from)\s*:?\s*").expect("label regex")
    })
}

fn sender_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\b(?:from|sender|by)[:\s]+").expect("sender prefix regex"))
}

fn upi_id_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)upi id\s*:?\s*").expect("upi id prefix regex"))
}

/// `"Paid to:   Alice"` → `"Paid to Alice"`
fn clean_label(line: &str) -> String {
    let spaced = label_re().replace_all(line, "${1} ");
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn extract_sender(line: &str) -> Option<String> {
    let sender = sender_prefix_re().replace(line, "");
    let sender = sender.trim();
    (!sender.is_empty()).then(|| sender.to_string())
}

/// Compose a description from a structured cell that may span several lines.
pub fn compose_structured(text: &str) -> String {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    let lowered: Vec<String> = lines.iter().map(|l| l.to_lowercase()).collect();
    let find = |pred: &dyn Fn(&str) -> bool| {
        lowered
            .iter()
            .position(|l| pred(l))
            .map(|idx| lines[idx])
    };

    let paid_to_you = find(&|l| l.contains("paid to you"));
    let received_from = find(&|l| l.starts_with("received from"));
    let paid_to = find(&|l| l.starts_with("paid to") && !l.contains("paid to you"));
    let sender = find(&|l| l.starts_with("from") || l.contains(" from ")).and_then(extract_sender);
    let upi_info = find(&|l| l.contains("upi id"))
        .map(|l| upi_id_prefix_re().replace(l, "").trim().to_string())
        .filter(|info| !info.is_empty());

    let mut description = if let Some(line) = paid_to_you {
        let base = clean_label(line);
        match &sender {
            Some(sender) if !base.to_lowercase().contains("from") => {
                format!("{} from {}", base, sender)
            }
            _ => base,
        }
    } else if let Some(line) = received_from {
        clean_label(line)
    } else if let Some(line) = paid_to {
        clean_label(line)
    } else if let Some(sender) = &sender {
        format!("From {}", sender)
    } else {
        lines
            .iter()
            .zip(&lowered)
            .find(|(_, lower)| !lower.contains("upi id"))
            .map(|(line, _)| line.to_string())
            .unwrap_or_default()
    };

    if let Some(info) = upi_info {
        if description.is_empty() {
            description = info;
        } else {
            description = format!("{} ({})", description, info);
        }
    }

    if description.is_empty() {
        FALLBACK_DESCRIPTION.to_string()
    } else {
        description
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_expense_name_stops_at_channel_words() {
        assert_eq!(
            describe_block(
                &block(&["Paid to Zomato via UPI Rs. 350 on 05 Jan 2025"]),
                Direction::Expense
            ),
            "Paid to Zomato"
        );
        assert_eq!(
            describe_block(&block(&["Sent to Ravi Kumar UPI Ref 12345"]), Direction::Expense),
            "Paid to Ravi Kumar"
        );
    }

    #[test]
    fn test_expense_name_stops_at_date_and_long_digits() {
        assert_eq!(
            describe_block(&block(&["Paid to Big Bazaar 12/10/2025"]), Direction::Expense),
            "Paid to Big Bazaar"
        );
        assert_eq!(
            describe_block(&block(&["Paid to Swiggy 402938475612"]), Direction::Expense),
            "Paid to Swiggy"
        );
    }

    #[test]
    fn test_expense_falls_back_to_line_scan() {
        assert_eq!(
            describe_block(&block(&["Rs 500", "Purchase at Amazon"]), Direction::Expense),
            "Purchase at Amazon"
        );
    }

    #[test]
    fn test_expense_blacklisted_capture_uses_line_scan() {
        // "your" in the capture rejects it; the line scan still names the payee
        assert_eq!(
            describe_block(&block(&["Paid to your friend"]), Direction::Expense),
            "Paid to your friend"
        );
    }

    #[test]
    fn test_income_paid_by() {
        assert_eq!(
            describe_block(&block(&["Paid by Priya - paid to you"]), Direction::Income),
            "Received from Priya"
        );
    }

    #[test]
    fn test_income_received_from() {
        assert_eq!(
            describe_block(
                &block(&["Received from Bob Smith UPI Ref 9988"]),
                Direction::Income
            ),
            "Received from Bob Smith"
        );
        assert_eq!(
            describe_block(&block(&["Credited from ACME Corp Rs 5,000"]), Direction::Income),
            "Received from ACME Corp"
        );
    }

    #[test]
    fn test_income_refund_line() {
        assert_eq!(
            describe_block(&block(&["Refund from Amazon Rs 200"]), Direction::Income),
            "Received from Amazon"
        );
    }

    #[test]
    fn test_income_line_scan_skips_own_account() {
        assert_eq!(
            describe_block(&block(&["Cashback to your wallet Rs 25"]), Direction::Income),
            FALLBACK_DESCRIPTION
        );
        assert_eq!(
            describe_block(
                &block(&["Refund to your account", "Refund from Myntra"]),
                Direction::Income
            ),
            "Received from Myntra"
        );
    }

    #[test]
    fn test_income_deposit_to_own_bank() {
        assert_eq!(
            describe_block(&block(&["Paid to HDFC Bank Rs 1000"]), Direction::Income),
            "Deposit to HDFC Bank"
        );
    }

    #[test]
    fn test_fallback_description() {
        assert_eq!(
            describe_block(&block(&["Rs 40 cashback"]), Direction::Income),
            FALLBACK_DESCRIPTION
        );
        assert_eq!(describe_block(&[], Direction::Expense), FALLBACK_DESCRIPTION);
    }

    #[test]
    fn test_clean_name_strips_tails() {
        assert_eq!(clean_name("Alice UPI/123", ""), "Alice");
        assert_eq!(clean_name("Paid to Store 42 Main Road", "paid to"), "Store");
        assert_eq!(clean_name("Bob - monthly rent", ""), "Bob");
        assert_eq!(clean_name("Carol ₹500", ""), "Carol");
        assert_eq!(clean_name("Idli House", ""), "Idli House");
        assert_eq!(clean_name("No keyword here", "paid to"), "No keyword here");
    }

    #[test]
    fn test_compose_paid_to_you_with_sender_and_upi_id() {
        let cell = "Paid to you\nFrom: Alice\nUPI ID: alice@okaxis";
        assert_eq!(
            compose_structured(cell),
            "Paid to you from Alice (alice@okaxis)"
        );
    }

    #[test]
    fn test_compose_labels() {
        assert_eq!(compose_structured("Received from:  Bob"), "Received from Bob");
        assert_eq!(compose_structured("Paid to:Zomato"), "Paid to Zomato");
        assert_eq!(compose_structured("From: Dave"), "From Dave");
    }

    #[test]
    fn test_compose_first_line_and_fallback() {
        assert_eq!(compose_structured("Groceries\nweekly"), "Groceries");
        assert_eq!(compose_structured("UPI ID: x@ybl"), "x@ybl");
        assert_eq!(compose_structured("   "), FALLBACK_DESCRIPTION);
    }
}
