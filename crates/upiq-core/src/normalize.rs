//! Line normalization for extracted statement text

/// Lines containing any of these (lowercased) are headers, footers or balances
const NOISE_PHRASES: &[&str] = &[
    "opening balance",
    "closing balance",
    "date & time",
    "page",
    "statement",
];

/// Collapse whitespace runs (including non-breaking spaces) to one space and trim.
pub fn normalize_line(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether a normalized line is statement furniture rather than content
pub fn is_noise(line: &str) -> bool {
    let lower = line.to_lowercase();
    NOISE_PHRASES.iter().any(|phrase| lower.contains(phrase))
}

/// Split raw text into normalized, non-noise lines in document order.
pub fn normalize_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(normalize_line)
        .filter(|line| !line.is_empty() && !is_noise(line))
        .collect()
}
