//! SMARD market data - German electricity time series as typed records
//!
//! Downloads production, production forecast and consumption series from the
//! SMARD (Bundesnetzagentur) CSV download endpoint and decodes them.
//!
//! # Features
//! - CSV decoding with German locale support (`.` thousands separators, DD.MM.YYYY dates)
//! - Position-based schemas per series, built once in a read-only catalog
//! - Lenient decoding: bad timestamps drop the line, bad quantities read `-1`
//! - Blocking HTTP client with a swappable raw-data source
//!
//! # Example
//!
//! ```rust
//! use smard_market_data::{parse_series_csv, Series, SeriesCatalog};
//!
//! let catalog = SeriesCatalog::new();
//! let body = "Datum;Uhrzeit;Biomasse [MWh];Wasserkraft [MWh]\n18.09.2022;07:45;1.157;405";
//!
//! let records = parse_series_csv(body, catalog.schema(Series::Production));
//! assert_eq!(records.len(), 1);
//! ```

pub mod catalog;
pub mod client;
pub mod config;
pub mod csv_parser;
pub mod csv_utils;
mod error;
pub mod request;
pub mod transformations;
pub mod types;

// Re-export public types for easier access
pub use catalog::{Field, Schema, Series, SeriesCatalog};
pub use client::{HttpSource, RawSeriesSource, SmardClient};
pub use config::ClientConfig;
pub use csv_parser::{decode_row, parse_rows, parse_series_csv};
pub use error::{ApiError, ConfigError, ParseError, Result, SmardError};
pub use request::TimeRange;
pub use types::{
    ConsumptionRow, ProductionForecastRow, ProductionRow, Record, SeriesRow, TimePoint,
    MISSING_VALUE,
};
