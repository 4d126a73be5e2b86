//! Shared CSV utilities for the SMARD decoders
//!
//! Reader configuration and positional column access used by the series
//! parser and the row decoder.

use csv::{Reader, ReaderBuilder, StringRecord, Terminator};

/// Field separator of SMARD downloads
pub const FIELD_SEPARATOR: u8 = b';';

/// Build a reader that splits `body` into raw rows
///
/// Lines end at `\n` only and fields split on every `;`. Quotes carry no
/// meaning and rows may have any number of columns. The header line gets
/// no special treatment here; see `strip_header`.
///
/// # Example
///
/// ```rust
/// use smard_market_data::csv_utils::series_reader;
///
/// let mut reader = series_reader("Datum;Uhrzeit\n18.09.2022;07:45;1.157");
/// let rows: Vec<_> = reader.records().map(|r| r.unwrap()).collect();
///
/// assert_eq!(rows.len(), 2);
/// assert_eq!(&rows[1][2], "1.157");
/// ```
pub fn series_reader(body: &str) -> Reader<&[u8]> {
    ReaderBuilder::new()
        .delimiter(FIELD_SEPARATOR)
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .terminator(Terminator::Any(b'\n'))
        .from_reader(body.as_bytes())
}

/// Helper to get a column value by position
///
/// Returns `""` when the row is shorter than `index`, which every decoder
/// treats the same as a malformed cell.
pub fn get_column(record: &StringRecord, index: usize) -> &str {
    record.get(index).unwrap_or("")
}

/// Body without its first line
///
/// The first line of a SMARD download is always the German column header.
/// A body with no line feed is header-only and yields `""`.
pub fn strip_header(body: &str) -> &str {
    body.split_once('\n').map(|(_, rest)| rest).unwrap_or("")
}
