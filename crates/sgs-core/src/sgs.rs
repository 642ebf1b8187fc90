//! Main SGS API
//!
//! This module provides the high-level API for the SGS service. It combines
//! the HTTP client with the parsers to download observations, build
//! multi-series frames, and look up series metadata.

use tracing::debug;

use crate::client::{SearchKind, SgsClient};
use crate::error::{Result, SgsError};
use crate::frame::SeriesFrame;
use crate::parser::{apply_strict_range, parse_search_response, parse_series_payload};
use crate::types::{Language, SearchResult, TimeSeriesValue};

/// Main API for the SGS service
///
/// All operations are asynchronous. Dates are passed as `dd/MM/yyyy` text,
/// the format the REST API expects.
///
/// # Example
/// ```no_run
/// use sgs_core::{Language, SgsScraper};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let sgs = SgsScraper::new()?;
///
///     let cdi = sgs.time_serie(12, "02/01/2018", "31/12/2018", false).await?;
///     println!("{} observations", cdi.len());
///
///     if let Some(found) = sgs.search_by_text("ouro", Language::Pt).await? {
///         for series in found {
///             println!("{} - {}", series.code, series.name);
///         }
///     }
///     Ok(())
/// }
/// ```
pub struct SgsScraper {
    client: SgsClient,
}

impl SgsScraper {
    /// Create a new scraper with default configuration.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new() -> Result<Self> {
        let client = SgsClient::new()?;
        Ok(Self { client })
    }

    /// Create a new scraper with a custom client.
    ///
    /// This is useful for testing or when you need custom client configuration.
    pub fn with_client(client: SgsClient) -> Self {
        Self { client }
    }

    /// Download the observations of one series.
    ///
    /// # Arguments
    /// * `code` - Series code
    /// * `start`, `end` - Range bounds in `dd/MM/yyyy`
    /// * `strict` - Discard the response if it starts before `start`. The API
    ///   returns the latest observation when the range is empty; strict mode
    ///   turns that into an empty result.
    ///
    /// # Returns
    /// * `Ok(Vec<TimeSeriesValue>)` in API order; unparsable dates or values
    ///   become `None` with the raw text kept
    /// * `Err(SgsError::InvalidCode)` if code is 0
    pub async fn time_serie(
        &self,
        code: u32,
        start: &str,
        end: &str,
        strict: bool,
    ) -> Result<Vec<TimeSeriesValue>> {
        if code == 0 {
            return Err(SgsError::InvalidCode(code));
        }

        let json = self.client.fetch_series_json(code, start, end).await?;
        let mut points = parse_series_payload(&json)?;
        if strict {
            points = apply_strict_range(points, start);
        }

        Ok(points
            .into_iter()
            .map(|point| TimeSeriesValue::from_point(code, point))
            .collect())
    }

    /// Download several series and align them on a shared date index.
    ///
    /// Repeated codes are fetched once; column order follows first occurrence.
    pub async fn data_frame(
        &self,
        codes: &[u32],
        start: &str,
        end: &str,
        strict: bool,
    ) -> Result<SeriesFrame> {
        let mut series: Vec<(u32, Vec<TimeSeriesValue>)> = Vec::with_capacity(codes.len());
        for &code in codes {
            if series.iter().any(|(seen, _)| *seen == code) {
                continue;
            }
            let values = self.time_serie(code, start, end, strict).await?;
            debug!(code, observations = values.len(), "downloaded series");
            series.push((code, values));
        }

        Ok(SeriesFrame::from_series(series))
    }

    /// Look up a series by its code.
    ///
    /// # Returns
    /// * `Ok(Some(results))` with the located series
    /// * `Ok(None)` if the locator found nothing
    /// * `Err(SgsError::InvalidCode)` if code is 0
    pub async fn search_by_code(
        &self,
        code: u32,
        language: Language,
    ) -> Result<Option<Vec<SearchResult>>> {
        if code == 0 {
            return Err(SgsError::InvalidCode(code));
        }
        self.search(SearchKind::Code, &code.to_string(), language).await
    }

    /// Look up series whose names match free text.
    ///
    /// # Returns
    /// * `Ok(Some(results))` with the located series, in page order
    /// * `Ok(None)` if the locator found nothing
    /// * `Err(SgsError::InvalidQuery)` if text is empty or whitespace-only
    pub async fn search_by_text(
        &self,
        text: &str,
        language: Language,
    ) -> Result<Option<Vec<SearchResult>>> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(SgsError::InvalidQuery(
                "Search query cannot be empty".to_string(),
            ));
        }
        self.search(SearchKind::Text, trimmed, language).await
    }

    async fn search(
        &self,
        kind: SearchKind,
        query: &str,
        language: Language,
    ) -> Result<Option<Vec<SearchResult>>> {
        let html = self.client.fetch_search_page(language, kind, query).await?;
        let results = parse_search_response(&html, language.code())?;
        debug!(
            query,
            language = language.code(),
            found = results.as_ref().map_or(0, Vec::len),
            "locator search finished"
        );
        Ok(results)
    }

    /// Metadata of each series, in input order.
    ///
    /// Each entry is the first locator hit for that code, or `None` when the
    /// locator found nothing.
    pub async fn metadata(
        &self,
        codes: &[u32],
        language: Language,
    ) -> Result<Vec<Option<SearchResult>>> {
        let mut metadata = Vec::with_capacity(codes.len());
        for &code in codes {
            let found = self.search_by_code(code, language).await?;
            metadata.push(found.and_then(|results| results.into_iter().next()));
        }
        Ok(metadata)
    }

    /// Metadata of every series in a frame, in column order.
    pub async fn metadata_for_frame(
        &self,
        frame: &SeriesFrame,
        language: Language,
    ) -> Result<Vec<Option<SearchResult>>> {
        self.metadata(frame.codes(), language).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scraper_creation() {
        assert!(SgsScraper::new().is_ok());
    }

    #[tokio::test]
    async fn test_search_empty_query() {
        let sgs = SgsScraper::new().unwrap();

        match sgs.search_by_text("   ", Language::En).await {
            Err(SgsError::InvalidQuery(msg)) => assert!(msg.contains("empty")),
            _ => panic!("Expected InvalidQuery error"),
        }
    }

    #[tokio::test]
    async fn test_search_by_code_zero() {
        let sgs = SgsScraper::new().unwrap();

        match sgs.search_by_code(0, Language::Pt).await {
            Err(SgsError::InvalidCode(code)) => assert_eq!(code, 0),
            _ => panic!("Expected InvalidCode error"),
        }
    }

    #[tokio::test]
    async fn test_time_serie_code_zero() {
        let sgs = SgsScraper::new().unwrap();

        match sgs.time_serie(0, "01/01/2020", "31/12/2020", false).await {
            Err(SgsError::InvalidCode(code)) => assert_eq!(code, 0),
            _ => panic!("Expected InvalidCode error"),
        }
    }

    #[tokio::test]
    async fn test_metadata_for_empty_frame() {
        let sgs = SgsScraper::new().unwrap();
        let metadata = sgs
            .metadata_for_frame(&SeriesFrame::default(), Language::En)
            .await
            .unwrap();
        assert!(metadata.is_empty());
    }
}
