//! Error types for the SGS client
//!
//! This module defines all error types used throughout the library.
//! "Nothing found" outcomes are never errors; they surface as `None`.
//! SgsError implements Serialize so it can cross JSON boundaries as a string.

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Error type for SGS operations
#[derive(Error, Debug)]
pub enum SgsError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// REST payload was not the expected JSON shape
    #[error("Invalid JSON payload: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Failed to parse HTML content
    #[error("Failed to parse HTML: {0}")]
    ParseError(String),

    /// Numeric text matched neither the pt-BR nor the invariant convention
    #[error("Invalid numeric value: {0:?}")]
    InvalidNumber(String),

    /// Language tag other than `pt` or `en`
    #[error("Invalid language: {0:?} (expected \"pt\" or \"en\")")]
    InvalidLanguage(String),

    /// Client configuration value out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Search query was empty or whitespace-only
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Invalid series code provided
    #[error("Invalid series code: {0}")]
    InvalidCode(u32),

    /// Requested resource was not found (HTTP 404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Server answered with a status that is neither success nor error
    #[error("Unexpected HTTP status: {0}")]
    UnexpectedStatus(u16),

    /// Rate limited by the server (HTTP 429)
    #[error("Rate limited - too many requests")]
    RateLimited,
}

/// Serialize SgsError as its display string
impl Serialize for SgsError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Result type alias for SGS operations
pub type Result<T> = std::result::Result<T, SgsError>;
