//! Locale-aware parsing of SGS text values
//!
//! The SGS service writes dates and numbers inconsistently: the REST API and
//! the search page mix Brazilian-Portuguese and English conventions, and some
//! date columns hold only a year or a month abbreviation. Everything here is
//! pure and allocation-light so it can run on every observation of a series.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex_lite::Regex;

use crate::error::{Result, SgsError};
use crate::types::DateOrText;

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{4}$").unwrap());

static MONTH_YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^([a-z]{3})/([0-9]{4})$").unwrap());

static DAY_MONTH_YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{2})/([0-9]{2})/([0-9]{4})$").unwrap());

/// Map a Portuguese or English three-letter month abbreviation to 1..=12.
fn month_number(abbr: &str) -> Option<u32> {
    let month = match abbr.to_ascii_lowercase().as_str() {
        "jan" => 1,
        "fev" | "feb" => 2,
        "mar" => 3,
        "abr" | "apr" => 4,
        "mai" | "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "ago" | "aug" => 8,
        "set" | "sep" => 9,
        "out" | "oct" => 10,
        "nov" => 11,
        "dez" | "dec" => 12,
        _ => return None,
    };
    Some(month)
}

/// Parse a date in one of the shapes the SGS service emits.
///
/// Shapes are tried in order and the first match wins:
/// 1. `yyyy` -> December 31 of that year
/// 2. `mmm/yyyy` (pt or en abbreviation, any case) -> day 1 of that month
/// 3. `dd/MM/yyyy`, zero-padded
///
/// # Returns
/// * `Some(date)` for a recognized shape with valid calendar values
/// * `None` for empty input or anything else
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use sgs_core::locale::try_parse_date;
///
/// assert_eq!(try_parse_date("2019"), NaiveDate::from_ymd_opt(2019, 12, 31));
/// assert_eq!(try_parse_date("fev/2020"), NaiveDate::from_ymd_opt(2020, 2, 1));
/// assert_eq!(try_parse_date("31/12/2021"), NaiveDate::from_ymd_opt(2021, 12, 31));
/// assert_eq!(try_parse_date("not-a-date"), None);
/// ```
pub fn try_parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if YEAR_RE.is_match(text) {
        let year = text.parse().ok()?;
        return NaiveDate::from_ymd_opt(year, 12, 31);
    }

    if let Some(caps) = MONTH_YEAR_RE.captures(text) {
        // Unknown abbreviations fall through to the strict day/month/year form
        if let Some(month) = month_number(&caps[1]) {
            let year = caps[2].parse().ok()?;
            return NaiveDate::from_ymd_opt(year, month, 1);
        }
    }

    let caps = DAY_MONTH_YEAR_RE.captures(text)?;
    let day = caps[1].parse().ok()?;
    let month = caps[2].parse().ok()?;
    let year = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse a date, keeping the original text when it is not date-shaped.
///
/// Search result columns sometimes hold placeholders instead of dates, and
/// those are preserved rather than dropped.
pub fn date_or_text(text: &str) -> DateOrText {
    match try_parse_date(text) {
        Some(date) => DateOrText::Date(date),
        None => DateOrText::Text(text.to_string()),
    }
}

/// Decimal and grouping separators of one numeric convention.
#[derive(Debug, Clone, Copy)]
struct NumberFormat {
    decimal: char,
    group: char,
}

/// Brazilian Portuguese: `1.234,56`
const PT_BR: NumberFormat = NumberFormat {
    decimal: ',',
    group: '.',
};

/// Invariant / English: `1,234.56`
const INVARIANT: NumberFormat = NumberFormat {
    decimal: '.',
    group: ',',
};

/// Conventions tried by [`try_parse_numeric`], in order.
const NUMBER_FORMATS: [NumberFormat; 2] = [PT_BR, INVARIANT];

impl NumberFormat {
    /// Parse signed, exponent-free decimal text in this convention.
    fn parse(&self, text: &str) -> Option<f64> {
        let (negative, unsigned) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };

        let (integer, fraction) = match unsigned.split_once(self.decimal) {
            Some((integer, fraction)) => (integer, fraction),
            None => (unsigned, ""),
        };

        let integer = self.ungroup(integer)?;
        if !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        if integer.is_empty() && fraction.is_empty() {
            return None;
        }

        let normalized = format!(
            "{}{}.{}",
            if negative { "-" } else { "" },
            if integer.is_empty() { "0" } else { &integer },
            if fraction.is_empty() { "0" } else { fraction },
        );
        normalized.parse().ok().filter(|value: &f64| value.is_finite())
    }

    /// Strip group separators from an integer part.
    ///
    /// Grouping must be well formed: a leading group of one to three digits,
    /// not starting with zero, followed by groups of exactly three.
    fn ungroup(&self, integer: &str) -> Option<String> {
        let mut groups = integer.split(self.group);
        let first = groups.next()?;
        if !first.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let mut digits = first.to_string();
        for group in groups {
            if first.is_empty() || first.len() > 3 || first.starts_with('0') {
                return None;
            }
            if group.len() != 3 || !group.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            digits.push_str(group);
        }
        Some(digits)
    }
}

/// Parse a numeric value written in pt-BR or invariant convention.
///
/// The pt-BR convention (`1.234,5`) is tried first, then the invariant one
/// (`1,234.5`).
///
/// # Returns
/// * `Ok(None)` for empty or whitespace-only text
/// * `Ok(Some(value))` when either convention accepts the text
/// * `Err(SgsError::InvalidNumber)` otherwise
///
/// # Examples
/// ```
/// use sgs_core::locale::try_parse_numeric;
///
/// assert_eq!(try_parse_numeric("").unwrap(), None);
/// assert_eq!(try_parse_numeric("1,23").unwrap(), Some(1.23));
/// assert_eq!(try_parse_numeric("1.23").unwrap(), Some(1.23));
/// assert!(try_parse_numeric("n/a").is_err());
/// ```
pub fn try_parse_numeric(text: &str) -> Result<Option<f64>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    NUMBER_FORMATS
        .iter()
        .find_map(|format| format.parse(trimmed))
        .map(Some)
        .ok_or_else(|| SgsError::InvalidNumber(text.to_string()))
}

/// Parse a series code: a non-negative whole number in invariant convention.
///
/// Grouped (`1,234`) and zero-fraction (`12.0`) forms are accepted.
pub fn parse_series_code(text: &str) -> Option<u32> {
    let value = INVARIANT.parse(text.trim())?;
    if value.fract() != 0.0 || value < 0.0 || value > f64::from(u32::MAX) {
        return None;
    }
    Some(value as u32)
}
