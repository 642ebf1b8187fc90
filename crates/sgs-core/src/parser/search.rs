//! Search results parser for the SGS series locator
//!
//! The locator page is legacy server-rendered markup. Results live in a table
//! identified only by its element id, and its header texts depend on the page
//! language, so cells are matched to columns by position against the first
//! row that carries the language's code header.

use std::collections::HashMap;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::error::{Result, SgsError};
use crate::locale::{date_or_text, parse_series_code};
use crate::types::SearchResult;

/// Element id of the results table on the locator page
const RESULTS_TABLE_ID: &str = "tabelaSeries";

/// Phrases the locator prints instead of a table when nothing matches
const NO_RESULTS_PHRASES: [&str; 2] = ["No series found", "Nenhuma série localizada"];

/// Header texts of the results table for one page language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSchema {
    pub code: &'static str,
    pub name: &'static str,
    pub unit: &'static str,
    pub frequency: &'static str,
    pub start: &'static str,
    pub last: &'static str,
    pub source: &'static str,
}

/// Headers of the Portuguese locator page
pub static PORTUGUESE_COLUMNS: ColumnSchema = ColumnSchema {
    code: "Cód.",
    name: "Nome completo",
    unit: "Unid.",
    frequency: "Per.",
    start: "Início  dd/MM/aaaa",
    last: "Últ. valor",
    source: "Fonte",
};

/// Headers of the English locator page
pub static ENGLISH_COLUMNS: ColumnSchema = ColumnSchema {
    code: "Code",
    name: "Full name",
    unit: "Unit",
    frequency: "Per.",
    start: "Start  dd/MM/yyyy",
    last: "Last value",
    source: "Source",
};

impl ColumnSchema {
    /// Schema for a language tag. `pt` selects Portuguese; any other tag
    /// falls back to English.
    pub fn for_language(language: &str) -> &'static ColumnSchema {
        if language.trim().eq_ignore_ascii_case("pt") {
            &PORTUGUESE_COLUMNS
        } else {
            &ENGLISH_COLUMNS
        }
    }
}

/// Check whether the page reports that no series matched the query.
pub fn is_no_results_page(html: &str) -> bool {
    let lower = html.to_lowercase();
    NO_RESULTS_PHRASES
        .iter()
        .any(|phrase| lower.contains(&phrase.to_lowercase()))
}

/// Parse the series locator response.
///
/// # Arguments
/// * `html` - Raw HTML of the locator response
/// * `language` - Page language tag (`pt` or `en`)
///
/// # Returns
/// * `Ok(Some(results))` with at least one record, in table order
/// * `Ok(None)` when the page says nothing was found, the results table or
///   its header row is missing, or no row yields a valid record
/// * `Err(SgsError::ParseError)` only if a selector fails to compile
pub fn parse_search_response(html: &str, language: &str) -> Result<Option<Vec<SearchResult>>> {
    if is_no_results_page(html) {
        debug!("locator reported no matching series");
        return Ok(None);
    }

    let columns = ColumnSchema::for_language(language);
    let document = Html::parse_document(html);

    let table_selector = selector(&format!("table#{}", RESULTS_TABLE_ID))?;
    let Some(table) = document.select(&table_selector).next() else {
        debug!(table = RESULTS_TABLE_ID, "results table not found");
        return Ok(None);
    };

    let row_selector = selector("tr")?;
    let header_selector = selector("th")?;
    let data_selector = selector("td")?;

    let mut headers: Option<Vec<String>> = None;
    let mut results = Vec::new();

    for (index, row) in table.select(&row_selector).enumerate() {
        let header_row = match headers.as_deref() {
            Some(header_row) => header_row,
            None => {
                // Header cells win over data cells in the same row
                let mut cells = cell_texts(&row, &header_selector);
                if cells.is_empty() {
                    cells = cell_texts(&row, &data_selector);
                }
                if cells.iter().any(|cell| cell == columns.code) {
                    debug!(row = index, columns = cells.len(), "resolved header row");
                    headers = Some(cells);
                }
                continue;
            }
        };

        let cells = cell_texts(&row, &data_selector);
        if cells.is_empty() || cells.len() > header_row.len() {
            debug!(row = index, cells = cells.len(), "skipping malformed row");
            continue;
        }

        match build_record(columns, header_row, &cells) {
            Some(record) => results.push(record),
            None => debug!(row = index, "skipping row without a valid series code"),
        }
    }

    if headers.is_none() {
        debug!(header = columns.code, "header row not found");
    }

    Ok(if results.is_empty() { None } else { Some(results) })
}

/// Build a record from one data row, pairing cells with headers by position.
///
/// Rows shorter than the header are mapped as far as they go.
fn build_record(columns: &ColumnSchema, headers: &[String], cells: &[String]) -> Option<SearchResult> {
    let mut row: HashMap<&str, &str> = HashMap::with_capacity(cells.len());
    for (header, cell) in headers.iter().zip(cells) {
        row.entry(header.as_str()).or_insert(cell.as_str());
    }

    let code = row.get(columns.code).and_then(|text| parse_series_code(text))?;

    let text = |header: &str| row.get(header).map(|v| v.to_string()).unwrap_or_default();
    let date = |header: &str| row.get(header).map(|v| date_or_text(v));

    Some(SearchResult {
        code,
        name: text(columns.name),
        unit: text(columns.unit),
        frequency: text(columns.frequency),
        first_value: date(columns.start),
        last_value: date(columns.last),
        source: text(columns.source),
    })
}

/// Decoded, trimmed text of every cell matching `cell_selector` in a row.
fn cell_texts(row: &ElementRef, cell_selector: &Selector) -> Vec<String> {
    row.select(cell_selector)
        .map(|cell| cell.text().collect::<String>().trim().to_string())
        .collect()
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| SgsError::ParseError(format!("Invalid selector: {:?}", e)))
}
