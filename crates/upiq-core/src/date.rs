//! Date extraction
//!
//! Two entry points:
//! - [`extract_date`] finds a date anywhere inside free text (numeric, ISO or
//!   textual-month shape) and never invents one.
//! - [`parse_date_field`] parses a whole CSV cell against a fixed format list
//!   and falls back to the processing time.

use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use tracing::debug;

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Group 1: numeric `d/m/y`, group 2: ISO `y-m-d`, group 3: textual `d Mon y`
fn date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"(?i)\b(\d{1,2}\s*[/.\-]\s*\d{1,2}\s*[/.\-]\s*\d{2,4})\b",
            r"|\b(\d{4}\s*-\s*\d{1,2}\s*-\s*\d{1,2})\b",
            r"|\b(\d{1,2}\s+(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\s*[,\s]+\s*\d{2,4})\b",
        ))
        .expect("date regex")
    })
}

/// Find the first date-shaped token in `text` and parse it.
///
/// Returns `None` when nothing date-shaped is present or when the matched
/// token does not form a valid calendar date.
pub fn extract_date(text: &str) -> Option<NaiveDate> {
    let caps = date_re().captures(text)?;

    let parsed = if let Some(m) = caps.get(3) {
        parse_textual(m.as_str())
    } else if let Some(m) = caps.get(2) {
        parse_iso(m.as_str())
    } else if let Some(m) = caps.get(1) {
        parse_numeric(m.as_str())
    } else {
        None
    };

    if parsed.is_none() {
        debug!("Date-shaped token did not parse: {:?}", caps.get(0).map(|m| m.as_str()));
    }
    parsed
}

/// Four-digit years are taken as-is, two-digit years land in the 2000s.
fn expand_year(token: &str) -> Option<i32> {
    let year: i32 = token.parse().ok()?;
    match token.len() {
        4 => Some(year),
        2 => Some(2000 + year),
        _ => None,
    }
}

/// `26/10/2023`, `26-10-23`, `26 . 10 . 2023` (day first)
fn parse_numeric(raw: &str) -> Option<NaiveDate> {
    let normalized: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == '.' || c == '-' { '/' } else { c })
        .collect();
    debug!("Normalized numeric date: '{}'", normalized);

    let mut parts = normalized.split('/');
    let day: u32 = parts.next()?.parse().ok()?;
    let month: u32 = parts.next()?.parse().ok()?;
    let year = expand_year(parts.next()?)?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// `2023-10-26`, `2023 - 10 - 26`
fn parse_iso(raw: &str) -> Option<NaiveDate> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    NaiveDate::parse_from_str(&compact, "%Y-%m-%d").ok()
}

/// `26 Oct 2023`, `5 October, 23`, `05 Sept 2024`
fn parse_textual(raw: &str) -> Option<NaiveDate> {
    let cleaned = raw.replace([',', '.', '-'], " ");
    debug!("Normalized text-month date: '{}'", cleaned.trim());

    let mut tokens = cleaned.split_whitespace();
    let day: u32 = tokens.next()?.parse().ok()?;
    let month = month_number(tokens.next()?)?;
    let year = expand_year(tokens.next()?)?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Accepts the three-letter abbreviation, the full name, or anything in between.
fn month_number(word: &str) -> Option<u32> {
    let word = word.to_lowercase();
    if word.len() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|name| name.starts_with(&word))
        .map(|idx| idx as u32 + 1)
}

/// Formats tried, in order, against a whole CSV date cell
#[derive(Debug, Clone, Copy)]
enum FieldFormat {
    /// chrono format string; `four_digit_year` guards `%Y` against `24`
    Chrono {
        fmt: &'static str,
        four_digit_year: bool,
    },
    /// `dd<sep>MM<sep>yy` with the year placed in the 2000s
    ShortYear(char),
}

const FIELD_FORMATS: [FieldFormat; 10] = [
    FieldFormat::Chrono { fmt: "%d/%m/%Y", four_digit_year: true },
    FieldFormat::Chrono { fmt: "%d-%m-%Y", four_digit_year: true },
    FieldFormat::Chrono { fmt: "%Y-%m-%d", four_digit_year: true },
    FieldFormat::ShortYear('/'),
    FieldFormat::ShortYear('-'),
    FieldFormat::Chrono { fmt: "%m/%d/%Y", four_digit_year: true },
    FieldFormat::Chrono { fmt: "%d %b %Y", four_digit_year: true },
    FieldFormat::Chrono { fmt: "%d %B %Y", four_digit_year: true },
    FieldFormat::Chrono { fmt: "%Y/%m/%d", four_digit_year: true },
    FieldFormat::Chrono { fmt: "%d.%m.%Y", four_digit_year: true },
];

const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

fn has_four_digit_run(s: &str) -> bool {
    s.split(|c: char| !c.is_ascii_digit()).any(|run| run.len() == 4)
}

impl FieldFormat {
    fn parse(&self, s: &str) -> Option<NaiveDate> {
        match *self {
            Self::Chrono {
                fmt,
                four_digit_year,
            } => {
                if four_digit_year && !has_four_digit_run(s) {
                    return None;
                }
                NaiveDate::parse_from_str(s, fmt).ok()
            }
            Self::ShortYear(sep) => {
                let parts: Vec<&str> = s.split(sep).collect();
                if parts.len() != 3 || parts[2].len() != 2 {
                    return None;
                }
                let day: u32 = parts[0].parse().ok()?;
                let month: u32 = parts[1].parse().ok()?;
                NaiveDate::from_ymd_opt(expand_year(parts[2])?, month, day)
            }
        }
    }
}

/// Parse a CSV date cell without any fallback.
pub fn parse_date_value(text: &str) -> Option<NaiveDateTime> {
    let s = text.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(date) = FIELD_FORMATS.iter().find_map(|format| format.parse(s)) {
        return Some(date.and_time(NaiveTime::MIN));
    }

    if let Some(dt) = DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt);
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Parse a CSV date cell, using `now` when nothing matches.
pub fn parse_date_field(text: &str, now: NaiveDateTime) -> NaiveDateTime {
    parse_date_value(text).unwrap_or_else(|| {
        debug!("Could not parse date: {}, using processing time", text);
        now
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_extract_numeric_date() {
        assert_eq!(extract_date("26/10/2023"), Some(ymd(2023, 10, 26)));
        assert_eq!(extract_date("on 26-10-2023 at 10:15"), Some(ymd(2023, 10, 26)));
        assert_eq!(extract_date("26 . 10 . 2023"), Some(ymd(2023, 10, 26)));
    }

    #[test]
    fn test_extract_two_digit_year_is_2000s() {
        assert_eq!(extract_date("26/10/23"), Some(ymd(2023, 10, 26)));
        assert_eq!(extract_date("01.02.99"), Some(ymd(2099, 2, 1)));
    }

    #[test]
    fn test_extract_iso_date() {
        assert_eq!(extract_date("2023-10-26"), Some(ymd(2023, 10, 26)));
        assert_eq!(extract_date("Txn 2023 - 10 - 26 done"), Some(ymd(2023, 10, 26)));
    }

    #[test]
    fn test_extract_textual_month() {
        assert_eq!(extract_date("26 Oct 2023"), Some(ymd(2023, 10, 26)));
        assert_eq!(extract_date("26 oct, 2023"), Some(ymd(2023, 10, 26)));
        assert_eq!(extract_date("5 January 24"), Some(ymd(2024, 1, 5)));
        assert_eq!(extract_date("05 Sept 2024"), Some(ymd(2024, 9, 5)));
    }

    #[test]
    fn test_extract_date_inside_sentence() {
        assert_eq!(
            extract_date("Paid to Zomato via UPI Rs. 350 on 05 Jan 2025"),
            Some(ymd(2025, 1, 5))
        );
    }

    #[test]
    fn test_structural_match_that_does_not_parse_is_none() {
        assert_eq!(extract_date("31/02/2024"), None);
        assert_eq!(extract_date("12/10/202"), None);
    }

    #[test]
    fn test_no_date() {
        assert_eq!(extract_date("Paid to Alice Rs 500"), None);
        assert_eq!(extract_date(""), None);
    }

    #[test]
    fn test_month_number_prefixes() {
        assert_eq!(month_number("Oct"), Some(10));
        assert_eq!(month_number("SEPT"), Some(9));
        assert_eq!(month_number("december"), Some(12));
        assert_eq!(month_number("Octopus"), None);
    }

    #[test]
    fn test_parse_date_field_formats() {
        let expected = ymd(2024, 1, 15).and_time(NaiveTime::MIN);
        for input in [
            "15/01/2024",
            "15-01-2024",
            "2024-01-15",
            "15/01/24",
            "15-01-24",
            "01/15/2024",
            "15 Jan 2024",
            "15 January 2024",
            "2024/01/15",
            "15.01.2024",
        ] {
            assert_eq!(parse_date_value(input), Some(expected), "input {}", input);
        }
    }

    #[test]
    fn test_parse_date_field_day_first_wins() {
        // 03/04 is ambiguous; day-first is tried before month-first
        assert_eq!(
            parse_date_value("03/04/2024"),
            Some(ymd(2024, 4, 3).and_time(NaiveTime::MIN))
        );
    }

    #[test]
    fn test_parse_date_field_iso_date_time() {
        let expected = ymd(2024, 1, 15).and_hms_opt(10, 30, 0).unwrap();
        assert_eq!(parse_date_value("2024-01-15T10:30:00"), Some(expected));
        assert_eq!(parse_date_value("2024-01-15 10:30:00"), Some(expected));
    }

    #[test]
    fn test_parse_date_field_falls_back_to_now() {
        let now = ymd(2026, 3, 1).and_hms_opt(12, 0, 0).unwrap();
        assert_eq!(parse_date_field("yesterday", now), now);
        assert_eq!(parse_date_field("   ", now), now);
        assert_eq!(
            parse_date_field("2024-01-15", now),
            ymd(2024, 1, 15).and_time(NaiveTime::MIN)
        );
    }
}
