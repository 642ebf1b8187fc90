//! SGS Client Core Library
//!
//! This crate retrieves macroeconomic time series from the Banco Central do
//! Brasil time series service (SGS).
//!
//! # Features
//! - Download observations of one or several series from the REST API
//! - Align several series on a shared date index
//! - Locate series by code or free text through the legacy search page
//! - Parse the mixed Portuguese/English date and number formats the service uses
//! - Rate-limited HTTP client with retry on transient failures

pub mod client;
pub mod error;
pub mod frame;
pub mod locale;
pub mod parser;
pub mod sgs;
pub mod types;

// Re-export main types for convenience
pub use client::{ClientConfig, RateLimiter, SearchKind, SgsClient};
pub use error::{Result, SgsError};
pub use frame::SeriesFrame;
pub use sgs::SgsScraper;
pub use types::{DateOrText, Language, SearchResult, TimeSeriesPoint, TimeSeriesValue};
