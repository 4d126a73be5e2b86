//! Cell transformation functions for SMARD CSV data
//!
//! Converts the German-formatted cells of a SMARD download into typed values.
//!
//! # Transformations
//!
//! 1. **Grouped quantity conversion**: `"1.157"` (MW) → `1_157_000_000` (W)
//! 2. **Timestamp assembly**: `"18.09.2022"` + `"07:45"` → `2022-09-18T07:45:00` local time
//! 3. **Epoch conversion**: local time point → epoch milliseconds for requests
//!
//! The `.` in SMARD quantity cells is a thousands separator, not a decimal
//! point. Quantities never carry a fractional part.
//!
//! # Example
//!
//! ```rust
//! use smard_market_data::transformations::*;
//!
//! assert_eq!(decode_quantity("1.157"), 1_157_000_000);
//! assert_eq!(decode_quantity("-"), -1);
//!
//! let ts = parse_timestamp("18.09.2022", "07:45").unwrap();
//! assert_eq!(ts.format("%Y-%m-%dT%H:%M:%S").to_string(), "2022-09-18T07:45:00");
//! ```

use chrono::{
    DateTime, Duration, Local, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
};

use crate::error::ParseError;
use crate::types::{TimePoint, MISSING_VALUE};

/// Factor from the source unit (MW) to the record unit (W)
pub const MW_TO_W_FACTOR: i64 = 1_000_000;

/// Date format of the first CSV column
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Time format of the second CSV column
pub const TIME_FORMAT: &str = "%H:%M";

// ============================================================================
// Transformation 1: Grouped Quantity Conversion
// ============================================================================

/// Parse a quantity with `.` thousands separators into W
///
/// Trims the cell, drops every `.`, parses the rest as a signed integer in
/// the 32-bit range and scales it from MW to W.
///
/// # Returns
///
/// * `Ok(i64)` - Quantity in W
/// * `Err(ParseError::InvalidQuantity)` - Empty, non-numeric, malformed sign, out of range
///
/// # Examples
///
/// ```
/// # use smard_market_data::transformations::try_decode_quantity;
/// assert_eq!(try_decode_quantity("11.087").unwrap(), 11_087_000_000);
/// assert_eq!(try_decode_quantity(" 29 ").unwrap(), 29_000_000);
/// assert!(try_decode_quantity("").is_err());
/// assert!(try_decode_quantity("1,5").is_err());
/// ```
pub fn try_decode_quantity(value: &str) -> Result<i64, ParseError> {
    let digits = value.trim().replace('.', "");

    digits
        .parse::<i32>()
        .map(|mw| i64::from(mw) * MW_TO_W_FACTOR)
        .map_err(|_| ParseError::InvalidQuantity(value.to_string()))
}

/// Parse a quantity cell, falling back to `MISSING_VALUE` (`-1`)
///
/// A bad cell must not cost the row its timestamp or sibling fields, so the
/// failure is reported through the sentinel rather than an error.
pub fn decode_quantity(value: &str) -> i64 {
    try_decode_quantity(value).unwrap_or(MISSING_VALUE)
}

// ============================================================================
// Transformation 2: Timestamp Assembly
// ============================================================================

/// Combine the date and time columns into a local time point
///
/// The date must be exactly `DD.MM.YYYY`; chrono alone would also take
/// `8.9.22` or a padded cell. The hour may have one or two digits, the
/// minutes always have two.
///
/// # Arguments
///
/// * `datum` - Date string (DD.MM.YYYY)
/// * `uhrzeit` - Time string (HH:MM, 24-hour)
///
/// # Returns
///
/// * `Ok(TimePoint)` - Local time with second 0
/// * `Err(ParseError::InvalidTimestamp)` - If either column does not match its format
///
/// # Examples
///
/// ```
/// # use smard_market_data::transformations::parse_timestamp;
/// assert!(parse_timestamp("18.09.2022", "07:45").is_ok());
/// assert!(parse_timestamp("Datum", "Uhrzeit").is_err());
/// assert!(parse_timestamp("2022-09-18", "07:45").is_err());
/// assert!(parse_timestamp("18.09.22", "07:45").is_err());
/// ```
pub fn parse_timestamp(datum: &str, uhrzeit: &str) -> Result<TimePoint, ParseError> {
    let invalid = || ParseError::InvalidTimestamp(format!("{} {}", datum, uhrzeit));

    if !has_date_shape(datum) || !has_time_shape(uhrzeit) {
        return Err(invalid());
    }

    let date = NaiveDate::parse_from_str(datum, DATE_FORMAT).map_err(|_| invalid())?;
    let time = NaiveTime::parse_from_str(uhrzeit, TIME_FORMAT).map_err(|_| invalid())?;

    to_local_time_point(date.and_time(time)).ok_or_else(invalid)
}

/// `DD.MM.YYYY`: ten bytes, dots at 2 and 5, ASCII digits elsewhere
fn has_date_shape(datum: &str) -> bool {
    let bytes = datum.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            2 | 5 => *b == b'.',
            _ => b.is_ascii_digit(),
        })
}

/// `H:MM` or `HH:MM`, digits only
fn has_time_shape(uhrzeit: &str) -> bool {
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());

    match uhrzeit.split_once(':') {
        Some((hour, minute)) => {
            (1..=2).contains(&hour.len())
                && all_digits(hour)
                && minute.len() == 2
                && all_digits(minute)
        }
        None => false,
    }
}

/// Resolve a wall-clock time in the process's local timezone
///
/// See `resolve_wall_clock` for the DST rules.
pub fn to_local_time_point(naive: NaiveDateTime) -> Option<TimePoint> {
    resolve_wall_clock(&Local, naive)
}

/// Resolve a wall-clock time in `tz`
///
/// Ambiguous times (DST fold) take the earlier instant. Times inside a DST
/// gap are moved forward by one hour.
pub fn resolve_wall_clock<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(ts) => Some(ts),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => tz
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest(),
    }
}

// ============================================================================
// Transformation 3: Epoch Conversion
// ============================================================================

/// Milliseconds since the Unix epoch, as the download endpoint expects
pub fn to_epoch_millis(ts: &TimePoint) -> i64 {
    ts.timestamp_millis()
}
