//! Data types for the SGS client
//!
//! This module contains the core data structures used throughout the library.
//! Record types implement Serialize and Deserialize for JSON interop.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SgsError};
use crate::locale::{try_parse_date, try_parse_numeric};

/// Language of the SGS search pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Portuguese (`pt`)
    Pt,
    /// English (`en`)
    #[default]
    En,
}

impl Language {
    /// Two-letter tag used by the search pages
    pub fn code(self) -> &'static str {
        match self {
            Language::Pt => "pt",
            Language::En => "en",
        }
    }

    /// Resolve a two-letter tag, case-insensitively.
    ///
    /// # Errors
    /// Returns `SgsError::InvalidLanguage` for anything other than `pt` or `en`.
    pub fn from_code(code: &str) -> Result<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "pt" => Ok(Language::Pt),
            "en" => Ok(Language::En),
            _ => Err(SgsError::InvalidLanguage(code.to_string())),
        }
    }
}

/// A date column value that may hold a placeholder instead of a date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateOrText {
    /// Text recognized as a date
    Date(NaiveDate),
    /// Original text, kept verbatim
    Text(String),
}

impl DateOrText {
    /// The date, if the column held one
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            DateOrText::Date(date) => Some(*date),
            DateOrText::Text(_) => None,
        }
    }
}

/// One series located by the search page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Numeric series code
    pub code: u32,
    /// Full display name
    pub name: String,
    /// Unit label (e.g. "%", "c.m.u.")
    pub unit: String,
    /// Periodicity code (e.g. "D", "M")
    pub frequency: String,
    /// First observation, when the column was present
    pub first_value: Option<DateOrText>,
    /// Last observation, when the column was present
    pub last_value: Option<DateOrText>,
    /// Source institution
    pub source: String,
}

/// Raw observation as returned by the REST API
///
/// Both fields are kept as text; use the `parsed_*` accessors for typed values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    #[serde(rename = "data")]
    pub date: String,
    #[serde(rename = "valor")]
    pub value: String,
}

impl TimeSeriesPoint {
    pub fn new(date: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            value: value.into(),
        }
    }

    pub fn parsed_date(&self) -> Option<NaiveDate> {
        try_parse_date(&self.date)
    }

    /// Numeric value; `None` when empty or unparsable.
    pub fn parsed_value(&self) -> Option<f64> {
        try_parse_numeric(&self.value).ok().flatten()
    }
}

/// Typed observation of a series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesValue {
    /// Series code this observation belongs to
    pub code: u32,
    pub date: Option<NaiveDate>,
    pub value: Option<f64>,
    /// Date text as received
    pub raw_date: String,
    /// Value text as received
    pub raw_value: String,
}

impl TimeSeriesValue {
    /// Convert a raw point, keeping the original text alongside.
    pub fn from_point(code: u32, point: TimeSeriesPoint) -> Self {
        Self {
            code,
            date: point.parsed_date(),
            value: point.parsed_value(),
            raw_date: point.date,
            raw_value: point.value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_codes() {
        assert_eq!(Language::Pt.code(), "pt");
        assert_eq!(Language::En.code(), "en");
        assert_eq!(Language::default(), Language::En);
    }

    #[test]
    fn test_language_from_code() {
        assert_eq!(Language::from_code("pt").unwrap(), Language::Pt);
        assert_eq!(Language::from_code("EN").unwrap(), Language::En);
        assert!(matches!(
            Language::from_code("de"),
            Err(SgsError::InvalidLanguage(code)) if code == "de"
        ));
    }

    #[test]
    fn test_date_or_text_serialization() {
        let date = DateOrText::Date(NaiveDate::from_ymd_opt(2020, 12, 31).unwrap());
        assert_eq!(serde_json::to_string(&date).unwrap(), "\"2020-12-31\"");

        let text = DateOrText::Text("-".to_string());
        assert_eq!(serde_json::to_string(&text).unwrap(), "\"-\"");

        let back: DateOrText = serde_json::from_str("\"2020-12-31\"").unwrap();
        assert_eq!(back, date);
    }

    #[test]
    fn test_search_result_serialization() {
        let result = SearchResult {
            code: 12,
            name: "CDI".to_string(),
            unit: "%".to_string(),
            frequency: "D".to_string(),
            first_value: Some(DateOrText::Date(NaiveDate::from_ymd_opt(1986, 3, 6).unwrap())),
            last_value: None,
            source: "Cetip".to_string(),
        };

        let json = serde_json::to_string(&result).unwrap();
        let deserialized: SearchResult = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized, result);
    }

    #[test]
    fn test_time_series_point_deserialize() {
        let point: TimeSeriesPoint =
            serde_json::from_str(r#"{"data": "02/01/2020", "valor": "0.016"}"#).unwrap();
        assert_eq!(point, TimeSeriesPoint::new("02/01/2020", "0.016"));
        assert_eq!(point.parsed_date(), NaiveDate::from_ymd_opt(2020, 1, 2));
        assert_eq!(point.parsed_value(), Some(0.016));
    }

    #[test]
    fn test_time_series_value_from_point() {
        let value = TimeSeriesValue::from_point(433, TimeSeriesPoint::new("jan/2020", ""));
        assert_eq!(value.code, 433);
        assert_eq!(value.date, NaiveDate::from_ymd_opt(2020, 1, 1));
        assert_eq!(value.value, None);
        assert_eq!(value.raw_date, "jan/2020");
        assert_eq!(value.raw_value, "");
    }
}
