//! Parsers for SGS responses
//!
//! - `search`: Parse the series locator results table
//! - `series`: Parse the REST time series payload

pub mod search;
pub mod series;

// Re-export main parsing functions
pub use search::{is_no_results_page, parse_search_response, ColumnSchema};
pub use series::{apply_strict_range, parse_series_payload};
