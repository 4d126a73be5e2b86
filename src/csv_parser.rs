//! CSV parser for SMARD download responses
//!
//! Turns the raw body of a SMARD market-data download into `Record` values
//! using a positional `Schema` from the series catalog.
//!
//! # CSV Format
//!
//! - **Delimiter:** Semicolon (`;`)
//! - **Header Row:** Always present, always skipped (never read)
//! - **Columns 0/1:** Date (`DD.MM.YYYY`) and time (`HH:MM`)
//! - **Remaining Columns:** Quantities in MW, `.` as thousands separator
//!
//! # Error policy
//!
//! - A line whose timestamp does not parse is dropped.
//! - A quantity that does not parse becomes `-1`; the line is kept.
//!
//! # Examples
//!
//! ```rust
//! use smard_market_data::catalog::{Series, SeriesCatalog};
//! use smard_market_data::csv_parser::parse_series_csv;
//!
//! let catalog = SeriesCatalog::new();
//! let csv = "Datum;Uhrzeit;Netzlast [MWh];Residuallast [MWh];Pumpspeicher [MWh]\n\
//!            18.09.2022;07:45;11.087;4.192;518";
//!
//! let records = parse_series_csv(csv, catalog.schema(Series::Consumption));
//! assert_eq!(records.len(), 1);
//! ```

use csv::StringRecord;
use tracing::{debug, warn};

use crate::catalog::{Schema, Series, SeriesCatalog, DATE_COLUMN, TIME_COLUMN};
use crate::csv_utils::{get_column, series_reader, strip_header};
use crate::error::ParseError;
use crate::transformations::{decode_quantity, parse_timestamp};
use crate::types::{
    ConsumptionRow, FieldValues, ProductionForecastRow, ProductionRow, Record, SeriesRow,
};

// ============================================================================
// Row Decoding
// ============================================================================

/// Decode one raw row into a record of the schema's series
///
/// # Arguments
///
/// * `schema` - Field-to-column binding of the series
/// * `record` - Columns of one CSV line
///
/// # Returns
///
/// * `Ok(Record)` - Row with every schema field set (decoded value or `-1`)
/// * `Err(ParseError::InvalidTimestamp)` - Date or time column unusable
///
/// # Example
///
/// ```
/// # use csv::StringRecord;
/// # use smard_market_data::catalog::{Field, Series, SeriesCatalog};
/// # use smard_market_data::csv_parser::decode_row;
/// let catalog = SeriesCatalog::new();
/// let row = StringRecord::from(vec!["18.09.2022", "07:45", "11.087", "-", "518"]);
///
/// let record = decode_row(catalog.schema(Series::Consumption), &row).unwrap();
/// assert_eq!(record.value(Field::GridLoad), Some(11_087_000_000));
/// assert_eq!(record.raw_value(Field::ResidualLoad), Some(-1));
/// ```
pub fn decode_row(schema: &Schema, record: &StringRecord) -> Result<Record, ParseError> {
    let timestamp = parse_timestamp(
        get_column(record, DATE_COLUMN),
        get_column(record, TIME_COLUMN),
    )?;

    let mut fields = FieldValues::with_capacity(schema.len());
    for binding in schema.bindings() {
        fields.push(binding.field, decode_quantity(get_column(record, binding.column)));
    }

    Ok(match schema.series() {
        Series::Production => Record::Production(ProductionRow::from_fields(timestamp, &fields)),
        Series::ProductionForecast => {
            Record::ProductionForecast(ProductionForecastRow::from_fields(timestamp, &fields))
        }
        Series::Consumption => {
            Record::Consumption(ConsumptionRow::from_fields(timestamp, &fields))
        }
    })
}

// ============================================================================
// Main Parsing Functions
// ============================================================================

/// Parse a SMARD download body into records
///
/// Skips the header line, decodes every other line with `decode_row` and
/// keeps the successful ones in input order. Lines with an unusable
/// timestamp are dropped without error; blank lines yield nothing.
///
/// # Arguments
///
/// * `body` - Raw response body
/// * `schema` - Schema of the requested series
///
/// # Returns
///
/// Decoded records; empty for an empty or header-only body.
pub fn parse_series_csv(body: &str, schema: &Schema) -> Vec<Record> {
    let mut reader = series_reader(strip_header(body));
    let mut records = Vec::new();
    let mut dropped = 0usize;

    for (index, result) in reader.records().enumerate() {
        let raw_row = match read_row(result) {
            Ok(raw_row) => raw_row,
            Err(e) => {
                warn!(series = %schema.series(), row = index + 1, "dropping row: {}", e);
                dropped += 1;
                continue;
            }
        };

        match decode_row(schema, &raw_row) {
            Ok(record) => records.push(record),
            Err(e) => {
                debug!(series = %schema.series(), row = index + 1, "dropping row: {}", e);
                dropped += 1;
            }
        }
    }

    debug!(
        series = %schema.series(),
        parsed = records.len(),
        dropped,
        "parsed SMARD CSV body"
    );

    records
}

/// Surface a reader failure as `ParseError::CsvFormat`
fn read_row(result: csv::Result<StringRecord>) -> Result<StringRecord, ParseError> {
    result.map_err(|e| ParseError::CsvFormat(e.to_string()))
}

/// Parse a body straight into typed rows of series `R`
///
/// # Example
///
/// ```
/// # use smard_market_data::catalog::SeriesCatalog;
/// # use smard_market_data::csv_parser::parse_rows;
/// # use smard_market_data::types::ConsumptionRow;
/// let csv = "Datum;Uhrzeit;Netzlast;Residuallast;Pumpspeicher\n18.09.2022;07:45;11.087;4.192;518";
///
/// let rows: Vec<ConsumptionRow> = parse_rows(csv, &SeriesCatalog::new());
/// assert_eq!(rows[0].residual_load, 4_192_000_000);
/// ```
pub fn parse_rows<R: SeriesRow>(body: &str, catalog: &SeriesCatalog) -> Vec<R> {
    parse_series_csv(body, catalog.schema(R::SERIES))
        .into_iter()
        .filter_map(R::from_record)
        .collect()
}
