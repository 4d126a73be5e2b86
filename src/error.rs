//! Error types for the SMARD client
//!
//! Covers every failure mode that can reach a caller:
//! - CSV decoding errors (timestamps, quantities, malformed rows)
//! - HTTP API errors (network, non-success status, invalid request range)
//! - Configuration errors (bad environment overrides)
//!
//! Row-level decoding errors never escape `parse_series_csv`; they are
//! consumed there (dropped line or `-1` field). They are still typed so that
//! the lower-level functions can be used and tested on their own.

use thiserror::Error;

/// Top-level error type for the SMARD client
///
/// Supports automatic conversion from specific error types via `#[from]`
#[derive(Error, Debug)]
pub enum SmardError {
    /// CSV decoding error
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// HTTP API error
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, SmardError>;

/// CSV decoding errors
///
/// Occurs while turning German-formatted SMARD CSV cells into typed values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Date or time column does not match `DD.MM.YYYY` / `HH:MM`
    ///
    /// Example: "32.09.2022 07:45" (invalid day)
    #[error("Invalid timestamp format: '{0}' (expected DD.MM.YYYY and HH:MM)")]
    InvalidTimestamp(String),

    /// Quantity cell is not an integer with `.` as thousands separator
    ///
    /// Example: "-" (value not published)
    #[error("Invalid quantity format: '{0}' (expected digits with '.' as thousands separator)")]
    InvalidQuantity(String),

    /// CSV format error (unreadable record)
    #[error("CSV format error: {0}")]
    CsvFormat(String),

    /// Series name not in production, production-forecast, consumption
    #[error("Unknown series: '{0}' (expected production, production-forecast or consumption)")]
    UnknownSeries(String),
}

/// HTTP API errors
///
/// Occurs while talking to the SMARD download endpoint
#[derive(Error, Debug, Clone)]
pub enum ApiError {
    /// HTTP error with status code and response body
    #[error("HTTP {status} error: {body}")]
    HttpError { status: u16, body: String },

    /// Network error (connection timeout, DNS failure, TLS)
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Requested range ends before it starts
    #[error("Invalid time range: {0}")]
    InvalidTimeRange(String),
}

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Environment override could not be interpreted
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },
}
